mod compatibility;
mod fortune;
mod profile;
mod talisman;

pub use compatibility::{
    CompatibilityPayload, CompatibilityRecord, CompatibilityResult, CreateCompatibilityRecord,
};
pub use fortune::{
    DailyFortune, DailyFortunePayload, DataEnvelope, DirectFortunePayload, FortuneRequest,
    FortuneText, TopicFortunePayload,
};
pub use profile::{BirthTime, CalendarType, Gender, UserProfile};
pub use talisman::{CreateTalisman, Talisman, TalismanList};
