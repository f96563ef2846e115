//! Error types for the render engine layer
//!
//! This module defines the errors returned by engine lifecycle operations,
//! scene creation and the engine manager. Lookups and destroys on missing
//! scenes are not errors and never produce one of these.

use std::fmt;
use crate::render_engine::LifecycleState;

/// Result type for render engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (driver, context, library init, etc.)
    BackendError(String),

    /// Initialization failed (backend load or init)
    InitializationFailed(String),

    /// Operation not allowed in the engine's current lifecycle state
    InvalidState {
        /// Name of the rejected operation
        operation: &'static str,
        /// State the engine was in
        state: LifecycleState,
    },

    /// Engine is initialized but the runtime lacks a required capability
    NotEnabled(String),

    /// A scene with this id is already managed by the engine
    DuplicateSceneId(u32),

    /// A scene with this name is already managed by the engine
    DuplicateSceneName(String),

    /// Every scene id is in use
    SceneIdsExhausted,

    /// No backend plugin registered under this name
    PluginNotFound(String),

    /// A backend plugin is already registered under this name
    PluginAlreadyRegistered(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState { operation, state } => {
                write!(f, "Invalid state: cannot {} while engine is {}", operation, state)
            }
            Error::NotEnabled(msg) => write!(f, "Engine not enabled: {}", msg),
            Error::DuplicateSceneId(id) => write!(f, "Duplicate scene id: {}", id),
            Error::DuplicateSceneName(name) => write!(f, "Duplicate scene name: '{}'", name),
            Error::SceneIdsExhausted => write!(f, "No scene id available"),
            Error::PluginNotFound(name) => write!(f, "Plugin not found: '{}'", name),
            Error::PluginAlreadyRegistered(name) => {
                write!(f, "Plugin already registered: '{}'", name)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
