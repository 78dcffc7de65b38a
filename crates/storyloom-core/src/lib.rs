//! Storyloom Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that every other
//! crate depends on: the content-provider capability, the key-value store
//! capability, the error taxonomy, and the randomness seam. It contains no
//! infrastructure code.

pub mod command;
pub mod error;
pub mod image;
pub mod provider;
pub mod rng;
pub mod storage;
