//! In-memory host doubles for tests, benches and headless use.

pub mod document;
pub mod gestures;
pub mod idle;
pub mod viewport;

pub use document::InMemoryDocument;
pub use gestures::ManualGestures;
pub use idle::ManualIdle;
pub use viewport::ManualViewport;
