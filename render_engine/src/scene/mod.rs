//! Scene management module
//!
//! Provides the scene type and the per-engine scene registry.

mod scene;
mod scene_registry;

pub use scene::Scene;
pub use scene_registry::SceneRegistry;
