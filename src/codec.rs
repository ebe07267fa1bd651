//! Settings JSON import/export.
//!
//! Export writes the full canonical schema. Import is merge-based: every
//! recognized section patches the provided fields over a base config, so a
//! snapshot containing only `{"ground": {"color": "#112233"}}` changes
//! exactly that one field. Unknown fields are ignored; invalid JSON, bad hex
//! colors, and unknown enum variants reject the whole import before anything
//! is merged.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::color::Color;
use crate::config::{MeshOverride, SceneConfig, VecXyz};
use crate::scene_graph::ground::GroundMode;

#[derive(Error, Debug)]
pub enum MalformedConfigError {
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes a config snapshot as pretty-printed JSON, the exact shape the
/// clipboard export has always produced.
pub fn serialize(config: &SceneConfig) -> String {
    serde_json::to_string_pretty(config).expect("scene config serializes infallibly")
}

/// Parses settings JSON, merging provided fields over built-in defaults.
pub fn parse(text: &str) -> Result<SceneConfig, MalformedConfigError> {
    parse_with_base(text, &SceneConfig::default())
}

/// Parses settings JSON, merging provided fields over `base`. All-or-nothing:
/// a malformed document returns an error without producing a partial merge.
pub fn parse_with_base(
    text: &str,
    base: &SceneConfig,
) -> Result<SceneConfig, MalformedConfigError> {
    let patch: ScenePatch = serde_json::from_str(text)?;

    let mut config = base.clone();
    patch.merge_into(&mut config);
    clamp(&mut config);
    Ok(config)
}

/// Clamps every ranged numeric to its documented bounds. Import clamps
/// rather than rejects; the UI already clamps on its side, so out-of-range
/// values only appear in hand-edited snapshots.
fn clamp(config: &mut SceneConfig) {
    let background = &mut config.background;
    background.gradient_alpha = background.gradient_alpha.clamp(0.0, 1.0);

    let ground = &mut config.ground;
    ground.roughness = ground.roughness.clamp(0.0, 1.0);
    ground.metalness = ground.metalness.clamp(0.0, 1.0);
    ground.shadow_opacity = ground.shadow_opacity.clamp(0.0, 1.0);

    let light = &mut config.directional_light;
    light.intensity = light.intensity.max(0.0);
    light.shadow_blur = light.shadow_blur.max(0.0);
    light.shadow_map_width = light.shadow_map_width.clamp(256, 4096);
    light.shadow_map_height = light.shadow_map_height.clamp(256, 4096);

    config.ambient_light.intensity = config.ambient_light.intensity.max(0.0);

    if let Some(overrides) = &mut config.mesh_overrides {
        for patch in overrides.values_mut() {
            clamp_override(patch);
        }
    }
}

fn clamp_override(patch: &mut MeshOverride) {
    let unit = |v: f32| v.clamp(0.0, 1.0);
    patch.metalness = patch.metalness.map(unit);
    patch.roughness = patch.roughness.map(unit);
    patch.opacity = patch.opacity.map(unit);
    patch.alpha_test = patch.alpha_test.map(unit);
    patch.clearcoat = patch.clearcoat.map(unit);
    patch.clearcoat_roughness = patch.clearcoat_roughness.map(unit);
    patch.transmission = patch.transmission.map(unit);
    patch.ior = patch.ior.map(|v| v.clamp(1.0, 2.5));
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenePatch {
    background: Option<BackgroundPatch>,
    ground: Option<GroundPatch>,
    directional_light: Option<DirectionalLightPatch>,
    ambient_light: Option<AmbientLightPatch>,
    camera: Option<CameraPatch>,
    model: Option<ModelTransformPatch>,
    mesh_overrides: Option<BTreeMap<String, MeshOverride>>,
}

impl ScenePatch {
    fn merge_into(self, config: &mut SceneConfig) {
        if let Some(background) = self.background {
            background.merge_into(config);
        }
        if let Some(ground) = self.ground {
            ground.merge_into(config);
        }
        if let Some(light) = self.directional_light {
            light.merge_into(config);
        }
        if let Some(ambient) = self.ambient_light {
            ambient.merge_into(config);
        }
        if let Some(camera) = self.camera {
            camera.merge_into(config);
        }
        if let Some(model) = self.model {
            model.merge_into(config);
        }
        if let Some(overrides) = self.mesh_overrides {
            let merged = config.mesh_overrides.get_or_insert_with(BTreeMap::new);
            merged.extend(overrides);
        }
    }
}

macro_rules! merge_field {
    ($patch:expr, $target:expr) => {
        if let Some(value) = $patch {
            $target = value;
        }
    };
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackgroundPatch {
    gradient_top: Option<Color>,
    gradient_bottom: Option<Color>,
    gradient_alpha: Option<f32>,
}

impl BackgroundPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        merge_field!(self.gradient_top, config.background.gradient_top);
        merge_field!(self.gradient_bottom, config.background.gradient_bottom);
        merge_field!(self.gradient_alpha, config.background.gradient_alpha);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundPatch {
    mode: Option<GroundMode>,
    color: Option<Color>,
    roughness: Option<f32>,
    metalness: Option<f32>,
    shadow_opacity: Option<f32>,
    receive_shadow: Option<bool>,
    cast_shadow: Option<bool>,
    visible: Option<bool>,
}

impl GroundPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        merge_field!(self.mode, config.ground.mode);
        merge_field!(self.color, config.ground.color);
        merge_field!(self.roughness, config.ground.roughness);
        merge_field!(self.metalness, config.ground.metalness);
        merge_field!(self.shadow_opacity, config.ground.shadow_opacity);
        merge_field!(self.receive_shadow, config.ground.receive_shadow);
        merge_field!(self.cast_shadow, config.ground.cast_shadow);
        merge_field!(self.visible, config.ground.visible);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectionalLightPatch {
    intensity: Option<f32>,
    color: Option<Color>,
    cast_shadow: Option<bool>,
    shadow_bias: Option<f32>,
    shadow_blur: Option<f32>,
    shadow_map_width: Option<u32>,
    shadow_map_height: Option<u32>,
    position: Option<VecXyz>,
    show_helper: Option<bool>,
}

impl DirectionalLightPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        let light = &mut config.directional_light;
        merge_field!(self.intensity, light.intensity);
        merge_field!(self.color, light.color);
        merge_field!(self.cast_shadow, light.cast_shadow);
        merge_field!(self.shadow_bias, light.shadow_bias);
        merge_field!(self.shadow_blur, light.shadow_blur);
        merge_field!(self.shadow_map_width, light.shadow_map_width);
        merge_field!(self.shadow_map_height, light.shadow_map_height);
        merge_field!(self.position, light.position);
        merge_field!(self.show_helper, light.show_helper);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmbientLightPatch {
    intensity: Option<f32>,
    color: Option<Color>,
}

impl AmbientLightPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        merge_field!(self.intensity, config.ambient_light.intensity);
        merge_field!(self.color, config.ambient_light.color);
    }
}

#[derive(Debug, Default, Deserialize)]
struct CameraPatch {
    position: Option<Vec3>,
    rotation: Option<Vec3>,
    target: Option<Vec3>,
}

impl CameraPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        merge_field!(self.position, config.camera.position);
        merge_field!(self.rotation, config.camera.rotation);
        merge_field!(self.target, config.camera.target);
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModelTransformPatch {
    position: Option<Vec3>,
    rotation: Option<Vec3>,
    scale: Option<Vec3>,
}

impl ModelTransformPatch {
    fn merge_into(self, config: &mut SceneConfig) {
        let model = config
            .model
            .get_or_insert_with(crate::config::ModelTransformConfig::default);
        merge_field!(self.position, model.position);
        merge_field!(self.rotation, model.rotation);
        merge_field!(self.scale, model.scale);
    }
}
