//! Storyloom — narrative orchestration.
//!
//! Owns the append-only history of a story and the turn orchestrator that
//! turns an origin story, that history, the player's action and character
//! into the next illustrated scene.

pub mod application;
pub mod domain;
