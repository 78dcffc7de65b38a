//! Narrative application services.

pub mod orchestrator;
pub mod prompt;
