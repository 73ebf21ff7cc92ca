pub mod ai_parser;
pub mod ai_prompt;
pub mod language;
pub mod plan;
pub mod plan_generator;
pub mod plan_store;
pub mod preferences;
pub mod weekdays;
