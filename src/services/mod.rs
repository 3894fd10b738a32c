pub mod compatibility_service;
pub mod fortune_service;
pub mod llm_service;
pub mod prompt_builder;
pub mod talisman_service;
pub mod validation;
