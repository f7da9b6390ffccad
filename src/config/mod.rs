//! Configuration models for the loader and its resource manifest.

pub mod loader;

pub use loader::{LoaderConfig, ResourceEntry, TriggerPolicy};
