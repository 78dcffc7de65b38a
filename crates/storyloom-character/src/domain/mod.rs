//! Character domain model.

pub mod character;
pub mod commands;
pub mod stats;
