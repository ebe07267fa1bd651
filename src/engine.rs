use glam::Vec3;

use crate::applier;
use crate::codec::{self, MalformedConfigError};
use crate::config::{ConfigStore, SceneConfig, Subsystem};
use crate::scene_graph::SceneGraph;

/// Default duration of the double-click focus transition, in seconds.
pub const FOCUS_DURATION: f32 = 1.0;

/// Owns the scene graph and the config store and wires them together the way
/// the UI loop does: control changes mutate the store, `update` runs once per
/// frame and pushes dirty subsystems into the scene.
pub struct Viewer {
    pub scene: SceneGraph,
    pub store: ConfigStore,
}

impl Viewer {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let mut scene = SceneGraph::new();
        applier::apply_all(&config, &mut scene);

        Self {
            scene,
            store: ConfigStore::new(config),
        }
    }

    /// One frame: flush dirty config, advance animation playback and the
    /// camera focus transition. Never blocks, never fails.
    pub fn update(&mut self, dt: f32) {
        applier::sync(&mut self.store, &mut self.scene);
        self.scene.camera.update(dt);

        if let Some(playback) = self
            .scene
            .model_mut()
            .and_then(|model| model.playback.as_mut())
        {
            playback.update(dt);
        }
    }

    /// Mutates one config field and marks its subsystem for the next frame.
    pub fn set(&mut self, subsystem: Subsystem, f: impl FnOnce(&mut SceneConfig)) {
        self.store.update(subsystem, f);
    }

    /// Imports a settings snapshot (clipboard JSON). Provided fields merge
    /// over current values; on parse failure the store is left untouched.
    pub fn import_settings(&mut self, text: &str) -> Result<(), MalformedConfigError> {
        let merged = codec::parse_with_base(text, self.store.config())?;
        self.store.replace(merged);
        applier::sync(&mut self.store, &mut self.scene);
        Ok(())
    }

    /// Exports the live scene state as settings JSON.
    pub fn export_settings(&self) -> String {
        codec::serialize(&applier::capture_all(&self.scene))
    }

    pub fn focus_camera_on(&mut self, point: Vec3, duration: f32) {
        self.scene.camera.focus_on(point, duration);
    }

    /// Debug affordance: dumps the current camera pose to the log, like the
    /// viewer's `C` key.
    pub fn log_camera_pose(&self) {
        let camera = &self.scene.camera;
        log::info!(
            "camera position: {:?}, rotation (radians): {:?}, target: {:?}",
            camera.position.to_array(),
            camera.rotation.to_array(),
            camera.target.to_array()
        );
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene_graph::ground::GroundMode;

    #[test]
    fn control_change_reaches_the_scene_on_next_frame() {
        let mut viewer = Viewer::new();
        viewer.set(Subsystem::Ground, |c| {
            c.ground.color = Color::new(0xaa, 0xbb, 0xcc)
        });

        viewer.update(1.0 / 60.0);
        assert_eq!(
            viewer.scene.ground.solid_material.color,
            Color::new(0xaa, 0xbb, 0xcc)
        );
    }

    #[test]
    fn failed_import_leaves_everything_untouched() {
        let mut viewer = Viewer::new();
        let before = viewer.export_settings();

        assert!(viewer.import_settings("{not json").is_err());

        assert_eq!(viewer.export_settings(), before);
        assert_eq!(viewer.store.config(), &SceneConfig::default());
    }

    #[test]
    fn import_applies_immediately() {
        let mut viewer = Viewer::new();
        viewer
            .import_settings(r#"{ "ground": { "mode": "Solid" } }"#)
            .unwrap();

        assert_eq!(viewer.scene.ground.mode(), GroundMode::Solid);
        assert_eq!(viewer.store.config().ground.mode, GroundMode::Solid);
    }

    #[test]
    fn update_advances_the_focus_transition() {
        let mut viewer = Viewer::new();
        let start = viewer.scene.camera.target;
        viewer.focus_camera_on(start + Vec3::X, FOCUS_DURATION);

        viewer.update(FOCUS_DURATION * 2.0);
        assert_eq!(viewer.scene.camera.target, start + Vec3::X);
    }
}
