//! Runtime adapters and the page-composition API surface.

pub mod api;
pub mod timer;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{arm, arm_manifest, list_resources, status, LoadStatusResponse, ResourceSnapshot};
pub use timer::ThreadTimer;
#[cfg(feature = "tokio-runtime")]
pub use timer::TokioTimer;
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
