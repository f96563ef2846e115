/*!
# Render Engine

Backend-agnostic contract for pluggable 3D render engines.

A render engine loads and initializes a backend (GPU library adapter,
headless null backend, ...) and manages a registry of scenes addressable
by id, name, or creation index. Backends are selected at runtime by name
through the engine manager.

## Architecture

- **RenderEngine**: The lifecycle + scene registry contract
- **RenderBackend**: Hooks a concrete backend implements
- **Engine<B>**: Implements RenderEngine on top of any RenderBackend
- **Scene**: Named, uniquely identified scene owned by one engine
- **EngineManager**: Plugin registry, shared engine instances, global logger
*/

// Internal modules
mod capabilities;
mod engine;
mod engine_manager;
mod error;
pub mod log;
mod render_engine;
pub mod scene;

#[cfg(test)]
mod mock_backend;

// Main rendering namespace module
pub mod rendering {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine contract and the shared implementation
    pub use crate::render_engine::{
        LifecycleState, LoadParams, RenderBackend, RenderEngine, SceneHandle, SharedEngine,
    };
    pub use crate::engine::Engine;
    pub use crate::capabilities::Capabilities;

    // Manager singleton
    pub use crate::engine_manager::EngineManager;

    // Scene types
    pub use crate::scene::{Scene, SceneRegistry};

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }
}

// Re-export math library at crate root
pub use glam;
