//! Route modules, one per intent group.

pub mod character;
pub mod health;
pub mod session;
