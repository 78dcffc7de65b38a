//! Session application services.

pub mod command_handlers;
pub mod persistence;
pub mod query_handlers;
