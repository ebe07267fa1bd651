use std::path::Path;

use glam::Vec3;
use image::DynamicImage;

use crate::camera::Camera;
use crate::color::Color;
use crate::config::{AmbientLightConfig, DirectionalLightConfig, MeshOverride};
use crate::model::{AssetLoadError, Model};
use crate::scene_graph::background::Background;
use crate::scene_graph::ground::{Ground, GroundMode};
use crate::scene_graph::lights::{AmbientLight, DirectionalLight};

/// An equirectangular HDR environment map used for image-based lighting.
#[derive(Debug)]
pub struct EnvironmentMap {
    pub name: String,
    pub image: DynamicImage,
}

/// Ticket handed out when a model load starts. A load only attaches if its
/// ticket is still the newest one, so a stale slower response can never
/// clobber a model that already superseded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The render scene: lights, ground, camera, background, environment, and
/// the loaded model. Constructed once at startup and passed by reference to
/// the applier; there is no global state.
#[derive(Debug)]
pub struct SceneGraph {
    pub background: Background,
    pub ground: Ground,
    pub directional_light: DirectionalLight,
    pub ambient_light: AmbientLight,
    pub camera: Camera,
    environment: Option<EnvironmentMap>,
    model: Option<Model>,
    load_generation: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            background: Background::new(
                Color::new(0xff, 0x00, 0x00),
                Color::new(0x00, 0x00, 0xff),
                1.0,
            ),
            ground: Ground::new(),
            directional_light: DirectionalLight::new(),
            ambient_light: AmbientLight::new(),
            camera: Camera::new(),
            environment: None,
            model: None,
            load_generation: 0,
        }
    }

    pub fn set_background_gradient(&mut self, top: Color, bottom: Color, alpha: f32) {
        self.background.set_gradient(top, bottom, alpha);
    }

    pub fn set_ground_mode(&mut self, mode: GroundMode) {
        self.ground.set_mode(mode);
    }

    pub fn set_directional_light(&mut self, config: &DirectionalLightConfig) {
        self.directional_light.apply_config(config);
    }

    pub fn set_ambient_light(&mut self, config: &AmbientLightConfig) {
        self.ambient_light.apply_config(config);
    }

    pub fn set_camera_pose(&mut self, position: Vec3, rotation: Vec3, target: Vec3) {
        self.camera.set_pose(position, rotation, target);
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    /// Starts a model load, superseding any load still in flight. The
    /// previous model stays attached until the new one arrives.
    pub fn begin_model_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Attaches a loaded model if `ticket` is still current. Returns whether
    /// the model was attached; stale completions are dropped with a log line.
    pub fn finish_model_load(&mut self, ticket: LoadTicket, model: Model) -> bool {
        if ticket.0 != self.load_generation {
            log::info!(
                "dropping superseded model load {:?} (generation {} < {})",
                model.name,
                ticket.0,
                self.load_generation
            );
            return false;
        }

        self.model = Some(model);
        true
    }

    /// Convenience path for synchronous callers: load from disk and attach.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<(), AssetLoadError> {
        let ticket = self.begin_model_load();
        let model = Model::from_glb_path(path)?;
        self.finish_model_load(ticket, model);
        Ok(())
    }

    pub fn remove_model(&mut self) {
        self.model = None;
    }

    /// Partial material update on a named mesh. Unresolved names are a
    /// no-op, not an error; meshes vary per asset.
    pub fn apply_mesh_override(&mut self, mesh_name: &str, patch: &MeshOverride) -> bool {
        let Some(mesh) = self
            .model
            .as_mut()
            .and_then(|model| model.mesh_by_name_mut(mesh_name))
        else {
            log::debug!("mesh override target {mesh_name:?} not found, skipping");
            return false;
        };

        mesh.material.apply_override(patch);
        true
    }

    pub fn environment(&self) -> Option<&EnvironmentMap> {
        self.environment.as_ref()
    }

    /// Loads an equirectangular HDR environment map for image-based lighting.
    pub fn load_environment(&mut self, path: impl AsRef<Path>) -> Result<(), AssetLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)?;

        self.environment = Some(EnvironmentMap {
            name: path.display().to_string(),
            image,
        });
        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
