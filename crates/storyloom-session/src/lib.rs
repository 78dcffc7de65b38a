//! Storyloom — session state machine.
//!
//! Responsible for the lifecycle of the single running story: character
//! creation, starting, turn submission, reset, and save/load through a
//! key-value store.

pub mod application;
pub mod domain;
pub mod handle;
