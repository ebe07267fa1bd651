//! Translates `SceneConfig` snapshots into scene-graph mutations and reads
//! live scene state back out for export.
//!
//! Subsystems apply in a fixed order (background, ground, lights, camera,
//! model transform, mesh overrides) and are independent of one another: an
//! absent model or an unresolved mesh name never blocks the rest.

use crate::config::{ConfigStore, SceneConfig, Subsystem};
use crate::scene_graph::SceneGraph;

/// Applies every subsystem of `config` to the scene, in canonical order.
/// Idempotent: applying the same config twice captures identically.
pub fn apply_all(config: &SceneConfig, scene: &mut SceneGraph) {
    for subsystem in Subsystem::ALL {
        apply_subsystem(config, scene, subsystem);
    }
}

/// Applies a single subsystem; the targeted path for dirty-field re-applies.
pub fn apply_subsystem(config: &SceneConfig, scene: &mut SceneGraph, subsystem: Subsystem) {
    match subsystem {
        Subsystem::Background => {
            scene.background.apply_config(&config.background);
        }
        Subsystem::Ground => {
            scene.ground.apply_config(&config.ground);
        }
        Subsystem::Lights => {
            scene.set_directional_light(&config.directional_light);
            scene.set_ambient_light(&config.ambient_light);
        }
        Subsystem::Camera => {
            scene.camera.apply_config(&config.camera);
        }
        Subsystem::ModelTransform => {
            // Nothing to move until a model is attached.
            if let (Some(transform), Some(model)) = (&config.model, scene.model_mut()) {
                model.apply_transform(transform);
            }
        }
        Subsystem::MeshOverrides => {
            if let Some(overrides) = &config.mesh_overrides {
                for (name, patch) in overrides {
                    scene.apply_mesh_override(name, patch);
                }
            }
        }
    }
}

/// Drains the store's dirty subsystems and re-applies only those. This is
/// the observer half of the control flow: UI setters mark subsystems dirty,
/// the next sync pushes them into the scene.
pub fn sync(store: &mut ConfigStore, scene: &mut SceneGraph) {
    for subsystem in store.take_dirty() {
        apply_subsystem(store.config(), scene, subsystem);
    }
}

/// Reads current live values out of the scene graph into a flat snapshot,
/// colors as hex strings and vectors as plain triples. Round-trips exactly
/// through the codec.
pub fn capture_all(scene: &SceneGraph) -> SceneConfig {
    SceneConfig {
        background: scene.background.capture_config(),
        ground: scene.ground.capture_config(),
        directional_light: scene.directional_light.capture_config(),
        ambient_light: scene.ambient_light.capture_config(),
        camera: scene.camera.capture_config(),
        model: scene.model().map(|model| model.capture_transform()),
        mesh_overrides: None,
    }
}
