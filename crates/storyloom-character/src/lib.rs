//! Storyloom — character building.
//!
//! Responsible for the player character: its attributes and the fixed-sum
//! stat budget they must satisfy, and the pipelines that derive a character
//! from an uploaded image, from nothing, or from manual authoring.

pub mod application;
pub mod domain;
