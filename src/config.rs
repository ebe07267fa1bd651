use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::scene_graph::ground::GroundMode;

/// A light position on the wire is an `{x, y, z}` object rather than an
/// array; previously exported snapshots depend on that shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VecXyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for VecXyz {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<VecXyz> for Vec3 {
    fn from(v: VecXyz) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    pub gradient_top: Color,
    pub gradient_bottom: Color,
    pub gradient_alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundConfig {
    pub mode: GroundMode,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub shadow_opacity: f32,
    pub receive_shadow: bool,
    pub cast_shadow: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionalLightConfig {
    pub intensity: f32,
    pub color: Color,
    pub cast_shadow: bool,
    pub shadow_bias: f32,
    pub shadow_blur: f32,
    pub shadow_map_width: u32,
    pub shadow_map_height: u32,
    pub position: VecXyz,
    pub show_helper: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientLightConfig {
    pub intensity: f32,
    pub color: Color,
}

/// Canonical camera schema: position + rotation + target. Older snapshots
/// that carried only position + target are a migration concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransformConfig {
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransformConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -0.02, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaterialSide {
    Front,
    Back,
    Double,
}

/// A named-mesh-scoped partial material patch. Every field is optional;
/// only provided fields touch the target material.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_write: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_test: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<MaterialSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ior: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f32>,
}

/// The canonical settings object: one field per tunable in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub background: BackgroundConfig,
    pub ground: GroundConfig,
    pub directional_light: DirectionalLightConfig,
    pub ambient_light: AmbientLightConfig,
    pub camera: CameraConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelTransformConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_overrides: Option<BTreeMap<String, MeshOverride>>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: BackgroundConfig {
                gradient_top: Color::new(0x38, 0x65, 0xad),
                gradient_bottom: Color::new(0x62, 0x62, 0xcb),
                gradient_alpha: 1.0,
            },
            ground: GroundConfig {
                mode: GroundMode::InfiniteCanvas,
                color: Color::new(0x22, 0x22, 0x22),
                roughness: 1.0,
                metalness: 0.0,
                shadow_opacity: 0.4,
                receive_shadow: true,
                cast_shadow: false,
                visible: true,
            },
            directional_light: DirectionalLightConfig {
                intensity: 1.43,
                color: Color::WHITE,
                cast_shadow: true,
                shadow_bias: 0.0,
                shadow_blur: 1.0,
                shadow_map_width: 1024,
                shadow_map_height: 1024,
                position: VecXyz { x: 1.35, y: 1.57, z: 0.9 },
                show_helper: false,
            },
            ambient_light: AmbientLightConfig {
                intensity: 0.4,
                color: Color::WHITE,
            },
            camera: CameraConfig {
                position: Vec3::new(0.778_842_74, 1.279_603_8, 1.203_285_9),
                rotation: Vec3::new(-0.287_997_12, 0.440_409_48, 0.125_622),
                target: Vec3::new(0.143_200_9, 0.896_514, -0.089_919_05),
            },
            model: Some(ModelTransformConfig::default()),
            mesh_overrides: None,
        }
    }
}

/// One entry per independently re-appliable slice of the scene. Order is the
/// canonical apply order; later subsystems never depend on earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Background,
    Ground,
    Lights,
    Camera,
    ModelTransform,
    MeshOverrides,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::Background,
        Subsystem::Ground,
        Subsystem::Lights,
        Subsystem::Camera,
        Subsystem::ModelTransform,
        Subsystem::MeshOverrides,
    ];

    fn index(self) -> usize {
        match self {
            Subsystem::Background => 0,
            Subsystem::Ground => 1,
            Subsystem::Lights => 2,
            Subsystem::Camera => 3,
            Subsystem::ModelTransform => 4,
            Subsystem::MeshOverrides => 5,
        }
    }
}

/// Owns the current `SceneConfig` and tracks which subsystems changed since
/// the last sync. UI controls call `update` with the subsystem they belong
/// to; the applier drains the dirty set and re-applies only those.
///
/// The store performs no validation: range clamping happens in the codec on
/// import, and UI-bound setters are expected to clamp on their side.
#[derive(Debug, Default)]
pub struct ConfigStore {
    config: SceneConfig,
    dirty: [bool; Subsystem::ALL.len()],
}

impl ConfigStore {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            dirty: [false; Subsystem::ALL.len()],
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Mutates the config and marks `subsystem` dirty.
    pub fn update(&mut self, subsystem: Subsystem, f: impl FnOnce(&mut SceneConfig)) {
        f(&mut self.config);
        self.dirty[subsystem.index()] = true;
    }

    /// Wholesale replacement (import path); every subsystem becomes dirty.
    pub fn replace(&mut self, config: SceneConfig) {
        self.config = config;
        self.dirty = [true; Subsystem::ALL.len()];
    }

    pub fn is_dirty(&self, subsystem: Subsystem) -> bool {
        self.dirty[subsystem.index()]
    }

    /// Drains the dirty set in canonical apply order.
    pub fn take_dirty(&mut self) -> Vec<Subsystem> {
        let dirty = Subsystem::ALL
            .into_iter()
            .filter(|s| self.dirty[s.index()])
            .collect();
        self.dirty = [false; Subsystem::ALL.len()];
        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_preset() {
        let config = SceneConfig::default();
        assert_eq!(config.background.gradient_alpha, 1.0);
        assert_eq!(config.ground.mode, GroundMode::InfiniteCanvas);
        assert_eq!(config.directional_light.shadow_map_width, 1024);
        assert!(config.model.is_some());
        assert!(config.mesh_overrides.is_none());
    }

    #[test]
    fn update_marks_only_the_named_subsystem() {
        let mut store = ConfigStore::default();
        store.update(Subsystem::Ground, |c| c.ground.roughness = 0.5);

        assert!(store.is_dirty(Subsystem::Ground));
        assert!(!store.is_dirty(Subsystem::Camera));
        assert_eq!(store.take_dirty(), vec![Subsystem::Ground]);
        assert!(store.take_dirty().is_empty());
    }

    #[test]
    fn take_dirty_preserves_apply_order() {
        let mut store = ConfigStore::default();
        store.update(Subsystem::Camera, |_| {});
        store.update(Subsystem::Background, |_| {});

        assert_eq!(
            store.take_dirty(),
            vec![Subsystem::Background, Subsystem::Camera]
        );
    }
}
