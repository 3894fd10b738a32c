pub mod compatibility_queries;
pub mod talisman_queries;
