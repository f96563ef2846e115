/// Engine - lifecycle state machine and scene registry over a backend.
///
/// `Engine<B>` implements `RenderEngine` for any `RenderBackend`. The backend
/// only supplies load/init/fini and a capability probe; state tracking,
/// id/name uniqueness and scene teardown live here so every backend
/// behaves the same way.

use crate::error::{Error, Result};
use crate::render_engine::{
    LifecycleState, LoadParams, RenderBackend, RenderEngine, SceneHandle,
};
use crate::scene::{Scene, SceneRegistry};

const SOURCE: &str = "rendering::Engine";

/// Render engine built on a backend `B`.
///
/// Not internally synchronized: mutation takes `&mut self`. Share it through
/// `EngineManager` (or your own `Arc<Mutex<_>>`) when several threads need it.
///
/// # Example
///
/// ```no_run
/// use render_engine::rendering::{Engine, LoadParams, RenderEngine};
/// # fn run<B: render_engine::rendering::RenderBackend>(backend: B) -> render_engine::rendering::Result<()> {
/// let mut engine = Engine::new(backend);
/// engine.load(&LoadParams::default())?;
/// engine.init()?;
/// let scene = engine.create_scene("main")?;
/// assert!(engine.has_scene(&scene));
/// engine.destroy();
/// # Ok(())
/// # }
/// ```
pub struct Engine<B: RenderBackend> {
    backend: B,
    state: LifecycleState,
    params: LoadParams,
    scenes: SceneRegistry,
}

impl<B: RenderBackend> Engine<B> {
    /// Create an unloaded engine around `backend`
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: LifecycleState::Unloaded,
            params: LoadParams::default(),
            scenes: SceneRegistry::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Parameters given to the last successful `load`
    pub fn params(&self) -> &LoadParams {
        &self.params
    }

    /// Log an error before returning it
    fn log_and_return_error(&self, error: Error) -> Error {
        crate::engine_error!(SOURCE, "'{}': {}", self.backend.name(), error);
        error
    }

    /// Fail unless scenes may be created right now
    fn require_enabled(&self) -> Result<()> {
        if self.state != LifecycleState::Initialized {
            return Err(Error::InvalidState {
                operation: "create scene",
                state: self.state,
            });
        }
        let missing = self
            .backend
            .capabilities()
            .missing(self.params.effective_capabilities());
        if !missing.is_empty() {
            return Err(Error::NotEnabled(format!(
                "'{}' lacks required capabilities {:?}",
                self.backend.name(),
                missing
            )));
        }
        Ok(())
    }

    /// Backend rejections are passed on as-is; they were logged by the backend
    fn register_scene(&mut self, id: u32, name: &str) -> Result<SceneHandle> {
        let name = if name.is_empty() {
            self.scenes.generate_name(id)
        } else {
            name.to_string()
        };
        self.scenes
            .check_available(id, &name)
            .map_err(|e| self.log_and_return_error(e))?;

        let scene = Scene::new(id, name, self.backend.name());
        self.backend.scene_created(&scene)?;
        let handle = self
            .scenes
            .insert(scene)
            .map_err(|e| self.log_and_return_error(e))?;

        crate::engine_debug!(SOURCE, "'{}' created scene '{}' (id {})",
            self.backend.name(), handle.name(), handle.id());
        Ok(handle)
    }

    fn release_scene(&mut self, scene: Option<SceneHandle>) {
        if let Some(scene) = scene {
            self.backend.scene_destroyed(&scene);
            crate::engine_debug!(SOURCE, "'{}' destroyed scene '{}' (id {})",
                self.backend.name(), scene.name(), scene.id());
        }
    }
}

impl<B: RenderBackend> RenderEngine for Engine<B> {
    fn load(&mut self, params: &LoadParams) -> Result<()> {
        match self.state {
            LifecycleState::Unloaded => {}
            LifecycleState::Loaded | LifecycleState::Initialized => {
                crate::engine_warn!(SOURCE, "'{}' is already loaded", self.backend.name());
                return Ok(());
            }
            LifecycleState::Destroyed => {
                return Err(self.log_and_return_error(Error::InvalidState {
                    operation: "load",
                    state: self.state,
                }));
            }
        }

        self.backend.load(params)?;

        self.params = params.clone();
        self.state = LifecycleState::Loaded;
        crate::engine_info!(SOURCE, "'{}' loaded", self.backend.name());
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Loaded => {}
            LifecycleState::Initialized => {
                crate::engine_warn!(SOURCE, "'{}' is already initialized", self.backend.name());
                return Ok(());
            }
            LifecycleState::Unloaded | LifecycleState::Destroyed => {
                return Err(self.log_and_return_error(Error::InvalidState {
                    operation: "init",
                    state: self.state,
                }));
            }
        }

        self.backend.init()?;

        self.state = LifecycleState::Initialized;

        let missing = self
            .backend
            .capabilities()
            .missing(self.params.effective_capabilities());
        if missing.is_empty() {
            crate::engine_info!(SOURCE, "'{}' initialized", self.backend.name());
        } else {
            crate::engine_warn!(SOURCE,
                "'{}' initialized but disabled: missing capabilities {:?}",
                self.backend.name(), missing);
        }
        Ok(())
    }

    fn fini(&mut self) -> Result<()> {
        let previous = self.state;
        if previous == LifecycleState::Destroyed {
            return Ok(());
        }

        self.destroy_scenes();
        self.state = LifecycleState::Destroyed;

        if previous == LifecycleState::Unloaded {
            return Ok(());
        }

        self.backend.fini()?;

        crate::engine_info!(SOURCE, "'{}' destroyed", self.backend.name());
        Ok(())
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn is_enabled(&self) -> bool {
        self.state == LifecycleState::Initialized
            && self
                .backend
                .capabilities()
                .satisfies(self.params.effective_capabilities())
    }

    fn name(&self) -> &str {
        self.backend.name()
    }

    fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    fn has_scene(&self, scene: &SceneHandle) -> bool {
        self.scenes.contains(scene)
    }

    fn has_scene_id(&self, id: u32) -> bool {
        self.scenes.contains_id(id)
    }

    fn has_scene_name(&self, name: &str) -> bool {
        self.scenes.contains_name(name)
    }

    fn scene_by_id(&self, id: u32) -> Option<SceneHandle> {
        self.scenes.get_by_id(id)
    }

    fn scene_by_name(&self, name: &str) -> Option<SceneHandle> {
        self.scenes.get_by_name(name)
    }

    fn scene_by_index(&self, index: usize) -> Option<SceneHandle> {
        self.scenes.get_by_index(index)
    }

    fn scenes(&self) -> Vec<SceneHandle> {
        self.scenes.handles()
    }

    fn create_scene(&mut self, name: &str) -> Result<SceneHandle> {
        self.require_enabled()
            .map_err(|e| self.log_and_return_error(e))?;

        if self.scenes.contains_name(name) {
            return Err(self.log_and_return_error(Error::DuplicateSceneName(name.to_string())));
        }

        let id = self
            .scenes
            .allocate_id()
            .map_err(|e| self.log_and_return_error(e))?;
        self.register_scene(id, name)
    }

    fn create_scene_with_id(&mut self, id: u32, name: &str) -> Result<SceneHandle> {
        self.require_enabled()
            .map_err(|e| self.log_and_return_error(e))?;

        self.register_scene(id, name)
    }

    fn destroy_scene(&mut self, scene: &SceneHandle) {
        let removed = self.scenes.remove(scene);
        self.release_scene(removed);
    }

    fn destroy_scene_by_id(&mut self, id: u32) {
        let removed = self.scenes.remove_by_id(id);
        self.release_scene(removed);
    }

    fn destroy_scene_by_name(&mut self, name: &str) {
        let removed = self.scenes.remove_by_name(name);
        self.release_scene(removed);
    }

    fn destroy_scene_by_index(&mut self, index: usize) {
        let removed = self.scenes.remove_by_index(index);
        self.release_scene(removed);
    }

    fn destroy_scenes(&mut self) {
        let removed = self.scenes.clear();
        if removed.is_empty() {
            return;
        }
        let count = removed.len();
        for scene in removed {
            self.release_scene(Some(scene));
        }
        crate::engine_debug!(SOURCE, "'{}' destroyed {} scenes", self.backend.name(), count);
    }
}

impl<B: RenderBackend> Drop for Engine<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
