//! Narrative domain model.

pub mod history;
pub mod scene;
