//! Scene registry owned by each engine.
//!
//! Scenes are stored in a SlotMap with stable keys. Two hash maps give
//! O(1) lookup by id and by name, and a key list keeps creation order
//! for index-based access.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::render_engine::SceneHandle;
use super::scene::Scene;

new_key_type! {
    /// Stable key for a scene slot in the registry
    struct SceneKey;
}

/// Prefix of engine-generated scene names
const GENERATED_NAME_PREFIX: &str = "scene_";

/// Id/name/index maps for the scenes of one engine.
///
/// Ids and names are unique within a registry. Removing a scene
/// invalidates its handle before returning it.
pub struct SceneRegistry {
    scenes: SlotMap<SceneKey, SceneHandle>,
    /// Keys in creation order
    order: Vec<SceneKey>,
    by_id: FxHashMap<u32, SceneKey>,
    by_name: FxHashMap<String, SceneKey>,
    /// Next candidate for an engine-assigned id (counts down from u32::MAX)
    next_auto_id: u32,
}

impl SceneRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            scenes: SlotMap::with_key(),
            order: Vec::new(),
            by_id: FxHashMap::default(),
            by_name: FxHashMap::default(),
            next_auto_id: u32::MAX,
        }
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Whether this exact scene (not merely one with the same id) is registered
    pub fn contains(&self, scene: &SceneHandle) -> bool {
        self.by_id
            .get(&scene.id())
            .and_then(|key| self.scenes.get(*key))
            .is_some_and(|registered| Arc::ptr_eq(registered, scene))
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get_by_id(&self, id: u32) -> Option<SceneHandle> {
        self.by_id.get(&id).and_then(|key| self.scenes.get(*key)).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<SceneHandle> {
        self.by_name.get(name).and_then(|key| self.scenes.get(*key)).cloned()
    }

    /// Scene at `index` in creation order
    pub fn get_by_index(&self, index: usize) -> Option<SceneHandle> {
        self.order.get(index).and_then(|key| self.scenes.get(*key)).cloned()
    }

    /// All scenes in creation order
    pub fn handles(&self) -> Vec<SceneHandle> {
        self.order.iter().filter_map(|key| self.scenes.get(*key)).cloned().collect()
    }

    /// Fail if `id` or `name` is already taken
    pub fn check_available(&self, id: u32, name: &str) -> Result<()> {
        if self.contains_id(id) {
            return Err(Error::DuplicateSceneId(id));
        }
        if self.contains_name(name) {
            return Err(Error::DuplicateSceneName(name.to_string()));
        }
        Ok(())
    }

    /// Pick an unused id, counting down from `u32::MAX`.
    ///
    /// Does not reserve the id; `insert` does.
    pub fn allocate_id(&mut self) -> Result<u32> {
        if self.by_id.len() as u64 > u64::from(u32::MAX) {
            return Err(Error::SceneIdsExhausted);
        }
        let mut candidate = self.next_auto_id;
        while self.contains_id(candidate) {
            candidate = candidate.wrapping_sub(1);
        }
        self.next_auto_id = candidate.wrapping_sub(1);
        Ok(candidate)
    }

    /// Unused name for a scene with the given id: `scene_<id>`, then
    /// `scene_<id>_1`, `scene_<id>_2`, ...
    pub fn generate_name(&self, id: u32) -> String {
        let base = format!("{}{}", GENERATED_NAME_PREFIX, id);
        if !self.contains_name(&base) {
            return base;
        }
        (1u32..)
            .map(|n| format!("{}_{}", base, n))
            .find(|name| !self.contains_name(name))
            .unwrap_or(base)
    }

    /// Register a scene and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene's id or name is already taken.
    pub fn insert(&mut self, scene: Scene) -> Result<SceneHandle> {
        self.check_available(scene.id(), scene.name())?;

        let id = scene.id();
        let name = scene.name().to_string();
        let handle = Arc::new(scene);
        let key = self.scenes.insert(Arc::clone(&handle));
        self.order.push(key);
        self.by_id.insert(id, key);
        self.by_name.insert(name, key);
        Ok(handle)
    }

    /// Remove this exact scene. Returns `None` if it is not registered here.
    pub fn remove(&mut self, scene: &SceneHandle) -> Option<SceneHandle> {
        if !self.contains(scene) {
            return None;
        }
        self.remove_by_id(scene.id())
    }

    pub fn remove_by_id(&mut self, id: u32) -> Option<SceneHandle> {
        let key = *self.by_id.get(&id)?;
        self.remove_key(key)
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<SceneHandle> {
        let key = *self.by_name.get(name)?;
        self.remove_key(key)
    }

    pub fn remove_by_index(&mut self, index: usize) -> Option<SceneHandle> {
        let key = *self.order.get(index)?;
        self.remove_key(key)
    }

    /// Remove every scene, returning them in creation order
    pub fn clear(&mut self) -> Vec<SceneHandle> {
        let removed: Vec<SceneHandle> = self
            .order
            .drain(..)
            .filter_map(|key| self.scenes.remove(key))
            .collect();
        self.scenes.clear();
        self.by_id.clear();
        self.by_name.clear();
        for scene in &removed {
            scene.invalidate();
        }
        removed
    }

    fn remove_key(&mut self, key: SceneKey) -> Option<SceneHandle> {
        let scene = self.scenes.remove(key)?;
        self.order.retain(|k| *k != key);
        self.by_id.remove(&scene.id());
        self.by_name.remove(scene.name());
        scene.invalidate();
        Some(scene)
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_registry_tests.rs"]
mod tests;
