//! Scene assembly for the Brickcast engine.

pub mod generation;
pub mod loader;

pub use generation::{ArenaConfig, ArenaGenerator};
pub use loader::{InMemorySource, LoaderConfig, ModelSource, SceneLoader, SceneManifest};
