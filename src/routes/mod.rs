pub(crate) mod compatibility;
pub(crate) mod fortune;
pub(crate) mod health;
pub(crate) mod talisman;
