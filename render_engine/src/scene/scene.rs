/// Scene - a named, uniquely identified container owned by one engine.
///
/// The registry hands out `Arc<Scene>` handles. When the owning engine
/// destroys the scene it is invalidated: the handle stays safe to hold and
/// read, but mutations are ignored and no engine reports it as managed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use glam::{Vec3, Vec4};

/// Mutable per-scene settings, shared through the handle
#[derive(Debug, Clone, PartialEq)]
struct SceneProperties {
    /// RGBA clear color
    background_color: Vec4,
    /// RGB ambient light
    ambient_light: Vec3,
    /// Simulation time of the scene contents
    sim_time: Duration,
}

impl Default for SceneProperties {
    fn default() -> Self {
        Self {
            background_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient_light: Vec3::ZERO,
            sim_time: Duration::ZERO,
        }
    }
}

/// A scene managed by a render engine.
#[derive(Debug)]
pub struct Scene {
    id: u32,
    name: String,
    /// Name of the engine that created and owns this scene
    engine_name: String,
    /// Cleared when the owning engine destroys the scene
    valid: AtomicBool,
    properties: RwLock<SceneProperties>,
}

impl Scene {
    /// Create a new scene (internal: only via the engine's registry)
    pub(crate) fn new(id: u32, name: String, engine_name: &str) -> Self {
        Self {
            id,
            name,
            engine_name: engine_name.to_string(),
            valid: AtomicBool::new(true),
            properties: RwLock::new(SceneProperties::default()),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the engine that created this scene
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Whether the scene is still registered with its engine
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the scene as destroyed (internal: only via the engine's registry)
    pub(crate) fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    pub fn background_color(&self) -> Vec4 {
        self.read().background_color
    }

    /// Set the RGBA clear color. Ignored once the scene is destroyed.
    pub fn set_background_color(&self, color: Vec4) {
        if let Some(mut props) = self.write("set_background_color") {
            props.background_color = color;
        }
    }

    pub fn ambient_light(&self) -> Vec3 {
        self.read().ambient_light
    }

    /// Set the RGB ambient light. Ignored once the scene is destroyed.
    pub fn set_ambient_light(&self, color: Vec3) {
        if let Some(mut props) = self.write("set_ambient_light") {
            props.ambient_light = color;
        }
    }

    pub fn sim_time(&self) -> Duration {
        self.read().sim_time
    }

    /// Set the simulation time. Ignored once the scene is destroyed.
    pub fn set_sim_time(&self, time: Duration) {
        if let Some(mut props) = self.write("set_sim_time") {
            props.sim_time = time;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SceneProperties> {
        self.properties.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, operation: &str) -> Option<RwLockWriteGuard<'_, SceneProperties>> {
        if !self.is_valid() {
            crate::engine_warn!("rendering::Scene",
                "{} ignored: scene '{}' (id {}) was destroyed", operation, self.name, self.id);
            return None;
        }
        Some(self.properties.write().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
