/*!
# Render Engine - Headless Backend

Null implementation of the render_engine backend contract.

It acquires no GPU or window resources, so it runs anywhere. The backend
is registered as the `"headless"` plugin and can be selected at runtime
through `EngineManager`.
*/

mod headless_backend;

use render_engine::rendering::{Engine, EngineManager, Result};

pub use headless_backend::{HeadlessBackend, HeadlessStats, MAX_SCENES_OPTION, PLUGIN_NAME};

/// Engine running on the headless backend
pub type HeadlessEngine = Engine<HeadlessBackend>;

/// Create an unloaded headless engine
pub fn create_engine() -> HeadlessEngine {
    Engine::new(HeadlessBackend::new())
}

/// Register the headless backend with the engine manager
///
/// # Example
///
/// ```no_run
/// use render_engine::rendering::{EngineManager, LoadParams};
///
/// EngineManager::initialize()?;
/// render_engine_headless::register()?;
/// let engine = EngineManager::engine("headless", &LoadParams::default())?;
/// # Ok::<(), render_engine::rendering::Error>(())
/// ```
pub fn register() -> Result<()> {
    EngineManager::register_plugin(PLUGIN_NAME, create_engine)
}
