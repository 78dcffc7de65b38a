//! Shared test doubles and fixtures for the Storyloom narrative engine.

mod provider;
mod rng;
mod store;

pub use provider::{
    FailingProvider, GatedProvider, ProviderCall, ScriptedProvider, profile, scene_draft,
};
pub use rng::{MockRng, SequenceRng};
pub use store::{RejectingStore, UnavailableStore};
