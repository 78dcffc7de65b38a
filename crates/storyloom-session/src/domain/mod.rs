//! Session domain model.

pub mod commands;
pub mod saved;
pub mod state;
