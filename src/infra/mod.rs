//! Infrastructure adapters implementing the host capabilities.

pub mod memory;

pub use memory::{InMemoryDocument, ManualGestures, ManualIdle, ManualViewport};
