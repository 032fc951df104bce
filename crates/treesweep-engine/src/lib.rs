//! The engine collaborator used by the sweep, and a local backend that
//! trains, classifies and reduces over exported assets on disk.

mod engine;
mod error;
mod local;
mod surface;

pub use engine::{AlignedLabels, AssetHandle, AssetKind, CLASSIFICATION_BAND, Engine};
pub use error::EngineError;
pub use local::{LocalEngine, SessionUsage};
pub use surface::ClassSurface;
