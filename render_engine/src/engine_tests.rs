//! Unit tests for Engine<B>
//!
//! Tests the lifecycle state machine, the enabled check, scene creation,
//! lookup and destruction against MockBackend.

use super::*;
use crate::capabilities::Capabilities;
use crate::mock_backend::{MockBackend, MockCalls};
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn ready_engine() -> Engine<MockBackend> {
    let mut engine = Engine::new(MockBackend::new("mock"));
    engine.load(&LoadParams::default()).unwrap();
    engine.init().unwrap();
    engine
}

fn calls_of(engine: &Engine<MockBackend>) -> Arc<Mutex<MockCalls>> {
    engine.backend().calls()
}

// ============================================================================
// LIFECYCLE TESTS
// ============================================================================

#[test]
fn test_new_engine_is_unloaded() {
    let engine = Engine::new(MockBackend::new("mock"));
    assert_eq!(engine.state(), LifecycleState::Unloaded);
    assert!(!engine.is_loaded());
    assert!(!engine.is_initialized());
    assert!(!engine.is_enabled());
    assert_eq!(engine.name(), "mock");
    assert_eq!(engine.scene_count(), 0);
}

#[test]
fn test_load_then_init_scenario() {
    let mut engine = Engine::new(MockBackend::new("mock"));
    assert!(!engine.is_loaded());

    engine.load(&LoadParams::default()).unwrap();
    assert!(engine.is_loaded());
    assert!(!engine.is_initialized());

    engine.init().unwrap();
    assert!(engine.is_initialized());
    assert!(engine.is_loaded());
    assert!(engine.is_enabled());

    engine.create_scene("main").unwrap();
    assert_eq!(engine.scene_count(), 1);
}

#[test]
fn test_load_failure_stays_unloaded() {
    let mut backend = MockBackend::new("mock");
    backend.fail_load = true;
    let mut engine = Engine::new(backend);

    assert!(engine.load(&LoadParams::default()).is_err());
    assert_eq!(engine.state(), LifecycleState::Unloaded);
    assert!(!engine.is_loaded());
}

#[test]
fn test_load_twice_is_idempotent() {
    let mut engine = Engine::new(MockBackend::new("mock"));
    engine.load(&LoadParams::default()).unwrap();
    engine.load(&LoadParams::default()).unwrap();

    assert_eq!(calls_of(&engine).lock().unwrap().load, 1);
    assert!(engine.is_loaded());
}

#[test]
fn test_load_after_init_keeps_initialized() {
    let mut engine = ready_engine();
    engine.load(&LoadParams::default()).unwrap();
    assert_eq!(engine.state(), LifecycleState::Initialized);
}

#[test]
fn test_load_stores_params() {
    let params = LoadParams::default()
        .with_headless(true)
        .with_option("vsync", "off");
    let mut engine = Engine::new(MockBackend::new("mock"));
    engine.load(&params).unwrap();

    assert_eq!(engine.params(), &params);
    assert_eq!(engine.params().option("vsync"), Some("off"));
    assert_eq!(engine.params().effective_capabilities(), Capabilities::HEADLESS);
}

#[test]
fn test_init_before_load_fails() {
    let mut engine = Engine::new(MockBackend::new("mock"));
    let err = engine.init().unwrap_err();

    assert_eq!(err, Error::InvalidState {
        operation: "init",
        state: LifecycleState::Unloaded,
    });
    assert_eq!(calls_of(&engine).lock().unwrap().init, 0);
}

#[test]
fn test_init_failure_stays_loaded() {
    let mut backend = MockBackend::new("mock");
    backend.fail_init = true;
    let mut engine = Engine::new(backend);
    engine.load(&LoadParams::default()).unwrap();

    assert!(engine.init().is_err());
    assert_eq!(engine.state(), LifecycleState::Loaded);
    assert!(engine.create_scene("main").is_err());
}

#[test]
fn test_init_twice_is_idempotent() {
    let mut engine = ready_engine();
    engine.init().unwrap();
    assert_eq!(calls_of(&engine).lock().unwrap().init, 1);
}

#[test]
fn test_fini_destroys_scenes_and_backend() {
    let mut engine = ready_engine();
    let calls = calls_of(&engine);
    let main = engine.create_scene("main").unwrap();
    let ui = engine.create_scene("ui").unwrap();

    engine.fini().unwrap();

    assert_eq!(engine.state(), LifecycleState::Destroyed);
    assert_eq!(engine.scene_count(), 0);
    assert!(!main.is_valid());
    assert!(!ui.is_valid());
    assert!(!engine.is_loaded());
    assert!(!engine.is_enabled());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.fini, 1);
    assert_eq!(calls.destroyed, vec![main.id(), ui.id()]);
}

#[test]
fn test_fini_is_idempotent() {
    let mut engine = ready_engine();
    engine.fini().unwrap();
    engine.fini().unwrap();
    engine.destroy();

    assert_eq!(calls_of(&engine).lock().unwrap().fini, 1);
}

#[test]
fn test_fini_unloaded_skips_backend() {
    let mut engine = Engine::new(MockBackend::new("mock"));
    engine.fini().unwrap();

    assert_eq!(engine.state(), LifecycleState::Destroyed);
    assert_eq!(calls_of(&engine).lock().unwrap().fini, 0);
}

#[test]
fn test_fini_failure_still_destroys() {
    let mut engine = ready_engine();
    engine.backend_mut().fail_fini = true;
    let scene = engine.create_scene("main").unwrap();

    assert!(engine.fini().is_err());
    assert_eq!(engine.state(), LifecycleState::Destroyed);
    assert!(!scene.is_valid());
}

#[test]
fn test_destroyed_engine_rejects_lifecycle_and_creation() {
    let mut engine = ready_engine();
    engine.destroy();

    assert!(matches!(
        engine.load(&LoadParams::default()),
        Err(Error::InvalidState { operation: "load", .. })
    ));
    assert!(matches!(
        engine.init(),
        Err(Error::InvalidState { operation: "init", .. })
    ));
    assert!(matches!(
        engine.create_scene("main"),
        Err(Error::InvalidState { state: LifecycleState::Destroyed, .. })
    ));
    assert!(engine.scene_by_index(0).is_none());
    engine.destroy_scene_by_id(0);
}

#[test]
fn test_drop_tears_down() {
    let engine = ready_engine();
    let calls = calls_of(&engine);
    let mut engine = engine;
    let scene = engine.create_scene("main").unwrap();

    drop(engine);

    assert!(!scene.is_valid());
    assert_eq!(calls.lock().unwrap().fini, 1);
}

// ============================================================================
// ENABLED CHECK TESTS
// ============================================================================

#[test]
fn test_missing_capability_disables_engine() {
    let backend = MockBackend::new("mock").with_capabilities(Capabilities::HEADLESS);
    let mut engine = Engine::new(backend);
    let params = LoadParams::default()
        .with_required_capabilities(Capabilities::HEADLESS | Capabilities::COMPUTE);
    engine.load(&params).unwrap();
    engine.init().unwrap();

    assert!(engine.is_initialized());
    assert!(!engine.is_enabled());
    assert!(matches!(engine.create_scene("main"), Err(Error::NotEnabled(_))));
    assert_eq!(engine.scene_count(), 0);
}

#[test]
fn test_satisfied_capabilities_enable_engine() {
    let backend = MockBackend::new("mock").with_capabilities(Capabilities::HEADLESS);
    let mut engine = Engine::new(backend);
    engine
        .load(&LoadParams::default().with_required_capabilities(Capabilities::HEADLESS))
        .unwrap();
    engine.init().unwrap();

    assert!(engine.is_enabled());
}

#[test]
fn test_headless_flag_requires_headless_backend() {
    let windowed = || MockBackend::new("windowed").with_capabilities(Capabilities::WINDOWED);

    let mut on_screen = Engine::new(windowed());
    on_screen.load(&LoadParams::default().with_headless(false)).unwrap();
    on_screen.init().unwrap();
    assert!(on_screen.is_enabled());

    let mut off_screen = Engine::new(windowed());
    off_screen.load(&LoadParams::default().with_headless(true)).unwrap();
    off_screen.init().unwrap();
    assert!(off_screen.is_initialized());
    assert!(!off_screen.is_enabled());
    assert!(matches!(off_screen.create_scene("main"), Err(Error::NotEnabled(_))));
}

#[test]
fn test_create_scene_before_init_fails() {
    let mut engine = Engine::new(MockBackend::new("mock"));
    assert!(engine.create_scene("main").is_err());

    engine.load(&LoadParams::default()).unwrap();
    assert!(matches!(
        engine.create_scene_with_id(1, "main"),
        Err(Error::InvalidState { state: LifecycleState::Loaded, .. })
    ));
    assert_eq!(engine.scene_count(), 0);
}

// ============================================================================
// SCENE CREATION TESTS
// ============================================================================

#[test]
fn test_create_scene_then_lookup_by_name() {
    let mut engine = ready_engine();
    let scene = engine.create_scene("main").unwrap();

    assert!(engine.has_scene_name("main"));
    assert!(engine.has_scene_id(scene.id()));
    assert!(engine.has_scene(&scene));
    assert_eq!(engine.scene_by_name("main").unwrap().name(), "main");
    assert_eq!(scene.engine_name(), "mock");
}

#[test]
fn test_create_scene_assigns_unique_ids() {
    let mut engine = ready_engine();
    let a = engine.create_scene("a").unwrap();
    let b = engine.create_scene("b").unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(a.id(), u32::MAX);
}

#[test]
fn test_create_scene_duplicate_name_fails() {
    let mut engine = ready_engine();
    engine.create_scene("main").unwrap();

    let err = engine.create_scene("main").unwrap_err();
    assert_eq!(err, Error::DuplicateSceneName("main".to_string()));
    assert_eq!(engine.scene_count(), 1);

    // The explicit-id overload enforces the same rule
    assert!(engine.create_scene_with_id(3, "main").is_err());
    assert_eq!(engine.scene_count(), 1);
}

#[test]
fn test_create_scene_duplicate_id_fails() {
    let mut engine = ready_engine();
    engine.create_scene_with_id(5, "a").unwrap();

    assert_eq!(engine.create_scene_with_id(5, "b").unwrap_err(), Error::DuplicateSceneId(5));
    assert_eq!(engine.scene_count(), 1);
}

#[test]
fn test_explicit_id_collision_scenario() {
    let mut engine = ready_engine();

    assert!(engine.create_scene_with_id(42, "alpha").is_ok());
    assert_eq!(engine.scene_count(), 1);

    assert!(engine.create_scene_with_id(42, "beta").is_err());
    assert_eq!(engine.scene_count(), 1);

    assert!(engine.create_scene_with_id(7, "alpha").is_err());
    assert_eq!(engine.scene_count(), 1);
}

#[test]
fn test_create_scene_empty_name_generates_one() {
    let mut engine = ready_engine();
    let auto = engine.create_scene("").unwrap();
    let explicit = engine.create_scene_with_id(9, "").unwrap();

    assert_eq!(auto.name(), format!("scene_{}", auto.id()));
    assert_eq!(explicit.name(), "scene_9");
    assert!(engine.has_scene_name("scene_9"));
}

#[test]
fn test_auto_id_skips_caller_ids() {
    let mut engine = ready_engine();
    engine.create_scene_with_id(u32::MAX, "taken").unwrap();

    let scene = engine.create_scene("next").unwrap();
    assert_eq!(scene.id(), u32::MAX - 1);
}

#[test]
fn test_backend_rejection_registers_nothing() {
    let mut engine = ready_engine();
    engine.backend_mut().reject_scenes = true;

    assert!(matches!(engine.create_scene("main"), Err(Error::BackendError(_))));
    assert_eq!(engine.scene_count(), 0);
    assert!(!engine.has_scene_name("main"));
}

// ============================================================================
// LOOKUP TESTS
// ============================================================================

#[test]
fn test_lookup_soft_misses() {
    let mut engine = ready_engine();
    engine.create_scene("main").unwrap();

    assert!(engine.scene_by_id(12345).is_none());
    assert!(engine.scene_by_name("missing").is_none());
    assert!(engine.scene_by_index(engine.scene_count()).is_none());
    assert!(engine.scene_by_index(99).is_none());
}

#[test]
fn test_scene_by_index_follows_creation_order() {
    let mut engine = ready_engine();
    engine.create_scene_with_id(30, "c").unwrap();
    engine.create_scene_with_id(10, "a").unwrap();

    assert_eq!(engine.scene_by_index(0).unwrap().name(), "c");
    assert_eq!(engine.scene_by_index(1).unwrap().name(), "a");

    let names: Vec<String> = engine.scenes().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["c", "a"]);
}

#[test]
fn test_has_scene_rejects_scene_of_other_engine() {
    let mut first = ready_engine();
    let mut second = ready_engine();
    let a = first.create_scene_with_id(1, "main").unwrap();
    second.create_scene_with_id(1, "main").unwrap();

    assert!(first.has_scene(&a));
    assert!(!second.has_scene(&a));
}

// ============================================================================
// DESTRUCTION TESTS
// ============================================================================

#[test]
fn test_destroy_scene() {
    let mut engine = ready_engine();
    let calls = calls_of(&engine);
    let main = engine.create_scene("main").unwrap();
    engine.create_scene("ui").unwrap();

    engine.destroy_scene(&main);

    assert!(!engine.has_scene(&main));
    assert!(!main.is_valid());
    assert_eq!(engine.scene_count(), 1);
    assert_eq!(calls.lock().unwrap().destroyed, vec![main.id()]);
}

#[test]
fn test_destroy_scene_by_id_name_index() {
    let mut engine = ready_engine();
    engine.create_scene_with_id(1, "a").unwrap();
    engine.create_scene_with_id(2, "b").unwrap();
    engine.create_scene_with_id(3, "c").unwrap();

    engine.destroy_scene_by_id(1);
    assert!(!engine.has_scene_id(1));
    assert_eq!(engine.scene_count(), 2);

    engine.destroy_scene_by_name("c");
    assert!(!engine.has_scene_name("c"));
    assert_eq!(engine.scene_count(), 1);

    engine.destroy_scene_by_index(0);
    assert!(!engine.has_scene_name("b"));
    assert_eq!(engine.scene_count(), 0);
}

#[test]
fn test_destroy_missing_scene_is_noop() {
    let mut engine = ready_engine();
    let calls = calls_of(&engine);
    engine.create_scene("main").unwrap();

    engine.destroy_scene_by_id(77);
    engine.destroy_scene_by_name("missing");
    engine.destroy_scene_by_index(5);

    let mut other = ready_engine();
    let foreign = other.create_scene("main").unwrap();
    engine.destroy_scene(&foreign);

    assert_eq!(engine.scene_count(), 1);
    assert!(foreign.is_valid());
    assert!(calls.lock().unwrap().destroyed.is_empty());
}

#[test]
fn test_destroy_scene_twice_is_noop() {
    let mut engine = ready_engine();
    let scene = engine.create_scene("main").unwrap();

    engine.destroy_scene(&scene);
    engine.destroy_scene(&scene);

    assert_eq!(engine.scene_count(), 0);
}

#[test]
fn test_destroy_scenes() {
    let mut engine = ready_engine();
    let created: Vec<SceneHandle> = ["a", "b", "c"]
        .iter()
        .map(|name| engine.create_scene(name).unwrap())
        .collect();

    engine.destroy_scenes();

    assert_eq!(engine.scene_count(), 0);
    assert_eq!(engine.state(), LifecycleState::Initialized);
    for scene in &created {
        assert!(!engine.has_scene_id(scene.id()));
        assert!(!engine.has_scene_name(scene.name()));
        assert!(!scene.is_valid());
    }

    // Engine remains usable
    assert!(engine.create_scene("a").is_ok());
}

#[test]
fn test_stale_handle_does_not_match_recreated_scene() {
    let mut engine = ready_engine();
    let old = engine.create_scene_with_id(1, "main").unwrap();
    engine.destroy_scene(&old);
    let new = engine.create_scene_with_id(1, "main").unwrap();

    assert!(!engine.has_scene(&old));
    assert!(engine.has_scene(&new));

    // Destroying through the stale handle leaves the new scene alone
    engine.destroy_scene(&old);
    assert!(new.is_valid());
    assert_eq!(engine.scene_count(), 1);
}

// ============================================================================
// TRAIT OBJECT TESTS
// ============================================================================

#[test]
fn test_engine_as_trait_object() {
    let mut engine: Box<dyn RenderEngine> = Box::new(Engine::new(MockBackend::new("boxed")));
    engine.load(&LoadParams::default()).unwrap();
    engine.init().unwrap();
    engine.create_scene("main").unwrap();

    assert_eq!(engine.name(), "boxed");
    assert_eq!(engine.scene_count(), 1);
    engine.destroy();
    assert_eq!(engine.scene_count(), 0);
}
