/// Headless backend - renders nothing, needs no GPU or display
///
/// Useful for servers, CI and tests. It validates its load parameters,
/// tracks scene statistics, and can cap the number of live scenes through
/// the `max_scenes` option.

use std::path::PathBuf;
use render_engine::rendering::{Capabilities, LoadParams, RenderBackend, Result, Scene};
use render_engine::{engine_bail, engine_debug, engine_info};

/// Name under which the headless backend registers itself
pub const PLUGIN_NAME: &str = "headless";

/// Option key capping the number of live scenes
pub const MAX_SCENES_OPTION: &str = "max_scenes";

const SOURCE: &str = "rendering::headless";

/// Headless backend statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Scenes created since load
    pub scenes_created: u32,
    /// Scenes destroyed since load
    pub scenes_destroyed: u32,
}

impl HeadlessStats {
    /// Scenes currently alive
    pub fn live_scenes(&self) -> u32 {
        self.scenes_created - self.scenes_destroyed
    }
}

/// Null render backend
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    loaded: bool,
    initialized: bool,
    resource_paths: Vec<PathBuf>,
    max_scenes: Option<u32>,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource directories accepted by the last load
    pub fn resource_paths(&self) -> &[PathBuf] {
        &self.resource_paths
    }

    /// Scene cap from the `max_scenes` option, if any
    pub fn max_scenes(&self) -> Option<u32> {
        self.max_scenes
    }

    /// Whether load and init have both run since the last fini
    pub fn is_ready(&self) -> bool {
        self.loaded && self.initialized
    }

    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    fn parse_max_scenes(params: &LoadParams) -> Result<Option<u32>> {
        match params.option(MAX_SCENES_OPTION) {
            None => Ok(None),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => engine_bail!(SOURCE,
                    "invalid '{}' option: '{}' is not an unsigned integer", MAX_SCENES_OPTION, raw),
            },
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn load(&mut self, params: &LoadParams) -> Result<()> {
        for path in &params.resource_paths {
            if !path.is_dir() {
                engine_bail!(SOURCE, "resource path '{}' is not a directory", path.display());
            }
        }
        let max_scenes = Self::parse_max_scenes(params)?;

        self.resource_paths = params.resource_paths.clone();
        self.max_scenes = max_scenes;
        self.stats = HeadlessStats::default();
        self.loaded = true;

        engine_debug!(SOURCE, "loaded with {} resource paths", self.resource_paths.len());
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        if !self.loaded {
            engine_bail!(SOURCE, "init called before load");
        }
        self.initialized = true;
        Ok(())
    }

    fn fini(&mut self) -> Result<()> {
        engine_info!(SOURCE, "releasing backend ({} scenes created, {} destroyed)",
            self.stats.scenes_created, self.stats.scenes_destroyed);
        self.loaded = false;
        self.initialized = false;
        self.resource_paths.clear();
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::HEADLESS | Capabilities::RENDER_TO_TEXTURE | Capabilities::DEPTH_BUFFER
    }

    fn scene_created(&mut self, scene: &Scene) -> Result<()> {
        if let Some(max) = self.max_scenes {
            if self.stats.live_scenes() >= max {
                engine_bail!(SOURCE,
                    "cannot create scene '{}': limit of {} scenes reached", scene.name(), max);
            }
        }
        self.stats.scenes_created += 1;
        Ok(())
    }

    fn scene_destroyed(&mut self, _scene: &Scene) {
        self.stats.scenes_destroyed += 1;
    }
}
