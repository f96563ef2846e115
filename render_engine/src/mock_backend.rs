/// Mock render backend for unit tests (no GPU required)
///
/// Records every hook call in a shared log so tests can observe the
/// backend even after the owning engine has been dropped, and can be told
/// to fail load/init/fini or scene creation.

use std::sync::{Arc, Mutex};
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::engine_bail;
use crate::render_engine::{LoadParams, RenderBackend};
use crate::scene::Scene;

/// Hook calls observed by a MockBackend
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockCalls {
    pub load: usize,
    pub init: usize,
    pub fini: usize,
    /// Ids passed to scene_created, in order
    pub created: Vec<u32>,
    /// Ids passed to scene_destroyed, in order
    pub destroyed: Vec<u32>,
}

/// Mock backend with failure injection
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    pub capabilities: Capabilities,
    pub fail_load: bool,
    pub fail_init: bool,
    pub fail_fini: bool,
    pub reject_scenes: bool,
    pub calls: Arc<Mutex<MockCalls>>,
}

impl MockBackend {
    /// Create a mock backend that succeeds at everything
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capabilities: Capabilities::all(),
            fail_load: false,
            fail_init: false,
            fail_fini: false,
            reject_scenes: false,
            calls: Arc::new(Mutex::new(MockCalls::default())),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Shared call log (clone it before handing the backend to an engine)
    pub fn calls(&self) -> Arc<Mutex<MockCalls>> {
        Arc::clone(&self.calls)
    }
}

impl RenderBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, _params: &LoadParams) -> Result<()> {
        self.calls.lock().unwrap().load += 1;
        if self.fail_load {
            engine_bail!("rendering::mock", "'{}' load: injected failure", self.name);
        }
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        self.calls.lock().unwrap().init += 1;
        if self.fail_init {
            engine_bail!("rendering::mock", "'{}' init: injected failure", self.name);
        }
        Ok(())
    }

    fn fini(&mut self) -> Result<()> {
        self.calls.lock().unwrap().fini += 1;
        if self.fail_fini {
            engine_bail!("rendering::mock", "'{}' fini: injected failure", self.name);
        }
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn scene_created(&mut self, scene: &Scene) -> Result<()> {
        if self.reject_scenes {
            engine_bail!("rendering::mock", "scene '{}' rejected", scene.name());
        }
        self.calls.lock().unwrap().created.push(scene.id());
        Ok(())
    }

    fn scene_destroyed(&mut self, scene: &Scene) {
        self.calls.lock().unwrap().destroyed.push(scene.id());
    }
}
