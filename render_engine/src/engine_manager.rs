/// EngineManager - process-wide registry of render engine backends
///
/// Backends register a factory under their name. Consumers ask for an engine
/// by name and get a shared instance that has been loaded and initialized.
/// The manager also owns the global logger used by the `engine_*!` macros.
/// State lives in thread-safe statics guarded by RwLock.

use std::sync::{Arc, Mutex, OnceLock, RwLock};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::render_engine::{LoadParams, RenderEngine, SharedEngine};

const SOURCE: &str = "rendering::EngineManager";

// ===== INTERNAL STATE =====

/// Factory producing a fresh, unloaded engine
type EnginePluginFactory = Box<dyn Fn() -> SharedEngine + Send + Sync>;

/// Global manager state storage
static MANAGER_STATE: OnceLock<ManagerState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding plugins and live engines
struct ManagerState {
    /// Registered backend factories by name
    plugins: RwLock<FxHashMap<String, EnginePluginFactory>>,
    /// Engines created through `engine()`, by name
    engines: RwLock<FxHashMap<String, SharedEngine>>,
}

impl ManagerState {
    fn new() -> Self {
        Self {
            plugins: RwLock::new(FxHashMap::default()),
            engines: RwLock::new(FxHashMap::default()),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

// ===== PUBLIC API =====

/// Render engine manager singleton
///
/// # Example
///
/// ```ignore
/// use render_engine::rendering::{Engine, EngineManager, LoadParams, RenderEngine};
///
/// EngineManager::initialize()?;
/// EngineManager::register_plugin("headless", || Engine::new(HeadlessBackend::new()))?;
///
/// let engine = EngineManager::engine("headless", &LoadParams::default())?;
/// engine.lock().unwrap().create_scene("main")?;
///
/// EngineManager::shutdown();
/// # Ok::<(), render_engine::rendering::Error>(())
/// ```
pub struct EngineManager;

impl EngineManager {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!(SOURCE, "{}", error);
        error
    }

    fn state() -> Result<&'static ManagerState> {
        MANAGER_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed(
                "EngineManager not initialized. Call EngineManager::initialize() first.".to_string()
            )
        ))
    }

    fn poisoned(what: &str) -> Error {
        Self::log_and_return_error(Error::BackendError(format!("{} lock poisoned", what)))
    }

    /// Initialize the manager
    ///
    /// Idempotent. Must be called before registering plugins.
    pub fn initialize() -> Result<()> {
        MANAGER_STATE.get_or_init(ManagerState::new);
        Ok(())
    }

    /// Tear down every live engine and forget every plugin
    ///
    /// The manager stays initialized.
    pub fn shutdown() {
        let Some(state) = MANAGER_STATE.get() else {
            return;
        };

        let engines: Vec<(String, SharedEngine)> = match state.engines.write() {
            Ok(mut engines) => engines.drain().collect(),
            Err(_) => Vec::new(),
        };
        for (name, engine) in engines {
            // Teardown failures are logged where they are raised
            let _ = Self::teardown(&name, &engine);
        }

        if let Ok(mut plugins) = state.plugins.write() {
            plugins.clear();
        }

        crate::engine_info!(SOURCE, "EngineManager shut down");
    }

    fn teardown(name: &str, engine: &SharedEngine) -> Result<()> {
        let mut guard = engine.lock().map_err(|_| Self::poisoned(name))?;
        guard.fini()
    }

    // ===== PLUGIN API =====

    /// Register a backend factory under `name`
    ///
    /// # Errors
    ///
    /// Returns an error if the manager is not initialized or a plugin with
    /// the same name is already registered.
    pub fn register_plugin<F, E>(name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: RenderEngine + 'static,
    {
        let state = Self::state()?;
        let mut plugins = state.plugins.write().map_err(|_| Self::poisoned("Plugin"))?;

        if plugins.contains_key(name) {
            return Err(Self::log_and_return_error(
                Error::PluginAlreadyRegistered(name.to_string())
            ));
        }

        let wrapped: EnginePluginFactory = Box::new(move || -> SharedEngine {
            Arc::new(Mutex::new(factory()))
        });
        plugins.insert(name.to_string(), wrapped);

        crate::engine_info!(SOURCE, "Plugin '{}' registered", name);
        Ok(())
    }

    /// Remove a plugin. Returns false if none was registered under `name`.
    ///
    /// An engine already created from the plugin stays alive until unloaded.
    pub fn unregister_plugin(name: &str) -> bool {
        let Ok(state) = Self::state() else {
            return false;
        };
        match state.plugins.write() {
            Ok(mut plugins) => plugins.remove(name).is_some(),
            Err(_) => false,
        }
    }

    pub fn has_plugin(name: &str) -> bool {
        MANAGER_STATE
            .get()
            .and_then(|state| state.plugins.read().ok())
            .is_some_and(|plugins| plugins.contains_key(name))
    }

    /// Names of registered plugins, sorted
    pub fn plugin_names() -> Vec<String> {
        let mut names: Vec<String> = MANAGER_STATE
            .get()
            .and_then(|state| state.plugins.read().ok())
            .map(|plugins| plugins.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn plugin_count() -> usize {
        MANAGER_STATE
            .get()
            .and_then(|state| state.plugins.read().ok())
            .map_or(0, |plugins| plugins.len())
    }

    // ===== ENGINE API =====

    /// Get the engine registered under `name`, creating it on first use
    ///
    /// A new engine is loaded with `params` and initialized before it is
    /// returned. An engine that already exists is returned as-is and
    /// `params` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if no plugin is registered under `name`, or if the
    /// new engine fails to load or initialize (it is then torn down and not kept).
    pub fn engine(name: &str, params: &LoadParams) -> Result<SharedEngine> {
        let state = Self::state()?;

        if let Some(existing) = state
            .engines
            .read()
            .map_err(|_| Self::poisoned("Engine"))?
            .get(name)
        {
            return Ok(Arc::clone(existing));
        }

        let engine = {
            let plugins = state.plugins.read().map_err(|_| Self::poisoned("Plugin"))?;
            let factory = plugins.get(name).ok_or_else(|| Self::log_and_return_error(
                Error::PluginNotFound(name.to_string())
            ))?;
            factory()
        };

        {
            let mut guard = engine.lock().map_err(|_| Self::poisoned(name))?;
            let started = guard.load(params).and_then(|_| guard.init());
            if let Err(e) = started {
                guard.destroy();
                return Err(e);
            }
        }

        let mut engines = state.engines.write().map_err(|_| Self::poisoned("Engine"))?;
        // Another thread may have won the race while this one was loading
        let shared = engines
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&engine))
            .clone();
        if !Arc::ptr_eq(&shared, &engine) {
            if let Ok(mut guard) = engine.lock() {
                guard.destroy();
            }
        } else {
            crate::engine_info!(SOURCE, "Engine '{}' created", name);
        }
        Ok(shared)
    }

    /// Whether an engine can be obtained under `name` (registered plugin or live engine)
    pub fn has_engine(name: &str) -> bool {
        Self::has_plugin(name)
            || MANAGER_STATE
                .get()
                .and_then(|state| state.engines.read().ok())
                .is_some_and(|engines| engines.contains_key(name))
    }

    /// Whether a live engine exists under `name` and is loaded
    pub fn is_engine_loaded(name: &str) -> bool {
        let engine = MANAGER_STATE
            .get()
            .and_then(|state| state.engines.read().ok())
            .and_then(|engines| engines.get(name).cloned());
        engine
            .and_then(|engine| engine.lock().ok().map(|guard| guard.is_loaded()))
            .unwrap_or(false)
    }

    /// Names of live engines, sorted
    pub fn engine_names() -> Vec<String> {
        let mut names: Vec<String> = MANAGER_STATE
            .get()
            .and_then(|state| state.engines.read().ok())
            .map(|engines| engines.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of live engines
    pub fn engine_count() -> usize {
        MANAGER_STATE
            .get()
            .and_then(|state| state.engines.read().ok())
            .map_or(0, |engines| engines.len())
    }

    /// Tear down and forget the live engine under `name`
    ///
    /// Returns `Ok(false)` if there is no such engine. Handles obtained
    /// earlier stay valid as objects but refer to a destroyed engine.
    ///
    /// # Errors
    ///
    /// Returns the engine's teardown error; the engine is forgotten anyway.
    pub fn unload_engine(name: &str) -> Result<bool> {
        let state = Self::state()?;
        let removed = state
            .engines
            .write()
            .map_err(|_| Self::poisoned("Engine"))?
            .remove(name);

        let Some(engine) = removed else {
            return Ok(false);
        };
        Self::teardown(name, &engine)?;
        crate::engine_info!(SOURCE, "Engine '{}' unloaded", name);
        Ok(true)
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use render_engine::rendering::{EngineManager, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// EngineManager::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::new());
        }
    }

    /// Logging entry point for the `engine_*!` macros (no file:line)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry::new(severity, source, message));
        }
    }

    /// Logging entry point for `engine_error!` and friends (with file:line)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry::new(severity, source, message).with_location(file, line));
        }
    }
}

#[cfg(test)]
#[path = "engine_manager_tests.rs"]
mod tests;
