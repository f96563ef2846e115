//! The render engine contract
//!
//! `RenderEngine` is the interface every concrete engine exposes: lifecycle
//! control (load, init, fini) and a registry of scenes addressable by id,
//! name, or creation index. `RenderBackend` is the smaller set of hooks a
//! backend implements to get that contract from `Engine<B>`.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::scene::Scene;

/// Shared, non-owning handle to a scene.
///
/// The engine that created the scene keeps it registered; once the scene is
/// destroyed the handle stays memory-safe but `Scene::is_valid` returns false.
pub type SceneHandle = Arc<Scene>;

/// Engine shared between threads, as handed out by `EngineManager`
pub type SharedEngine = Arc<Mutex<dyn RenderEngine>>;

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle state of a render engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Constructed, no backend resources acquired
    #[default]
    Unloaded,
    /// Backend resources acquired (`load` succeeded)
    Loaded,
    /// Ready to create scenes (`init` succeeded)
    Initialized,
    /// Torn down; the engine cannot be reused
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unloaded => "unloaded",
            LifecycleState::Loaded => "loaded",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Parameters passed to `RenderEngine::load`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadParams {
    /// Run without a window or display server. The backend must then
    /// report `Capabilities::HEADLESS` for the engine to be enabled.
    pub headless: bool,
    /// Extra directories the backend searches for resources
    pub resource_paths: Vec<PathBuf>,
    /// Capabilities the runtime must provide for the engine to be enabled
    pub required_capabilities: Capabilities,
    /// Backend-specific key/value options
    pub options: FxHashMap<String, String>,
}

impl LoadParams {
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_resource_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_paths.push(path.into());
        self
    }

    pub fn with_required_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.required_capabilities = capabilities;
        self
    }

    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }

    /// Get a backend-specific option
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|v| v.as_str())
    }

    /// Capabilities the backend must report: `required_capabilities`,
    /// plus `HEADLESS` when running headless
    pub fn effective_capabilities(&self) -> Capabilities {
        if self.headless {
            self.required_capabilities | Capabilities::HEADLESS
        } else {
            self.required_capabilities
        }
    }
}

// ============================================================================
// RenderEngine trait
// ============================================================================

/// A concrete render engine: lifecycle control plus a scene registry.
///
/// Lookups and destroys on missing scenes are soft misses (`None` or no-op).
/// Scene creation fails with an error when the id or name is already taken,
/// or when the engine is not initialized and enabled.
pub trait RenderEngine: Send {
    /// Acquire backend resources. Must be called before any other operation.
    ///
    /// Calling it again on a loaded or initialized engine succeeds without
    /// reloading. A destroyed engine cannot be loaded.
    fn load(&mut self, params: &LoadParams) -> Result<()>;

    /// Prepare the engine for scene creation. Requires a successful `load`.
    fn init(&mut self) -> Result<()>;

    /// Destroy every scene and release backend resources.
    ///
    /// The engine ends in the `Destroyed` state even if the backend reports
    /// a failure while releasing its resources. Calling it on a destroyed
    /// engine succeeds and does nothing.
    fn fini(&mut self) -> Result<()>;

    /// `fini` for callers that have no use for the outcome.
    ///
    /// Failures were already logged where they were raised.
    fn destroy(&mut self) {
        let _ = self.fini();
    }

    /// Current lifecycle state
    fn state(&self) -> LifecycleState;

    /// Whether `load` succeeded and the engine is not destroyed
    fn is_loaded(&self) -> bool {
        matches!(self.state(), LifecycleState::Loaded | LifecycleState::Initialized)
    }

    /// Whether `init` succeeded and the engine is not destroyed
    fn is_initialized(&self) -> bool {
        self.state() == LifecycleState::Initialized
    }

    /// Whether the engine can be used: initialized, and the runtime provides
    /// every required capability.
    fn is_enabled(&self) -> bool;

    /// Backend identifier (e.g. "headless")
    fn name(&self) -> &str;

    /// Number of live scenes
    fn scene_count(&self) -> usize;

    /// Whether this exact scene is managed by this engine
    fn has_scene(&self, scene: &SceneHandle) -> bool;

    fn has_scene_id(&self, id: u32) -> bool;

    fn has_scene_name(&self, name: &str) -> bool;

    fn scene_by_id(&self, id: u32) -> Option<SceneHandle>;

    fn scene_by_name(&self, name: &str) -> Option<SceneHandle>;

    /// Scene at `index` in creation order
    fn scene_by_index(&self, index: usize) -> Option<SceneHandle>;

    /// All live scenes in creation order
    fn scenes(&self) -> Vec<SceneHandle>;

    /// Create a scene with an engine-assigned id.
    ///
    /// An empty `name` gets an engine-generated one.
    fn create_scene(&mut self, name: &str) -> Result<SceneHandle>;

    /// Create a scene with a caller-supplied id.
    ///
    /// An empty `name` gets an engine-generated one.
    fn create_scene_with_id(&mut self, id: u32, name: &str) -> Result<SceneHandle>;

    fn destroy_scene(&mut self, scene: &SceneHandle);

    fn destroy_scene_by_id(&mut self, id: u32);

    fn destroy_scene_by_name(&mut self, name: &str);

    fn destroy_scene_by_index(&mut self, index: usize);

    /// Destroy every scene. The lifecycle state is unchanged.
    fn destroy_scenes(&mut self);
}

// ============================================================================
// RenderBackend trait
// ============================================================================

/// Hooks a concrete backend implements; `Engine<B>` supplies the rest.
///
/// Report failures with `engine_err!` or `engine_bail!`. They log at the
/// point of failure, and the engine passes the error on without logging it
/// again.
pub trait RenderBackend: Send {
    /// Backend identifier, constant for the lifetime of the backend
    fn name(&self) -> &str;

    /// Acquire driver handles, library state, etc.
    fn load(&mut self, params: &LoadParams) -> Result<()>;

    /// Finish setup after a successful `load`
    fn init(&mut self) -> Result<()>;

    /// Release everything acquired by `load` and `init`
    fn fini(&mut self) -> Result<()>;

    /// Probe what the runtime system provides
    fn capabilities(&self) -> Capabilities;

    /// Called before a new scene is registered. An error aborts creation.
    fn scene_created(&mut self, _scene: &Scene) -> Result<()> {
        Ok(())
    }

    /// Called after a scene has been removed from the registry
    fn scene_destroyed(&mut self, _scene: &Scene) {}
}
