use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::GroundConfig;

/// Which of the two mutually exclusive ground presentations is active.
///
/// The wire names ("Solid" / "Infinite Canvas") are fixed by previously
/// exported snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundMode {
    Solid,
    #[serde(rename = "Infinite Canvas")]
    InfiniteCanvas,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundGeometry {
    Circle { radius: f32, segments: u32 },
    Plane { width: f32, height: f32 },
}

impl GroundGeometry {
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            GroundGeometry::Circle { radius, .. } => radius,
            GroundGeometry::Plane { width, height } => {
                (width * width + height * height).sqrt() * 0.5
            }
        }
    }
}

/// Opaque PBR material for the solid disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

/// Shadow-catcher material for the "infinite canvas" plane; renders nothing
/// but received shadows at the given opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMaterial {
    pub opacity: f32,
}

/// The ground mesh. Both geometry/material pairs live for the whole session;
/// `mode` decides which pair is attached. Toggling back restores the very
/// same geometry and material objects, not equivalent copies.
#[derive(Debug)]
pub struct Ground {
    mode: GroundMode,
    circle: GroundGeometry,
    plane: GroundGeometry,
    pub solid_material: StandardMaterial,
    pub shadow_material: ShadowMaterial,
    pub receive_shadow: bool,
    pub cast_shadow: bool,
    pub visible: bool,
    bounding_radius: f32,
}

impl Ground {
    pub fn new() -> Self {
        let circle = GroundGeometry::Circle {
            radius: 5.0,
            segments: 64,
        };
        let plane = GroundGeometry::Plane {
            width: 30.0,
            height: 30.0,
        };

        Self {
            mode: GroundMode::Solid,
            bounding_radius: circle.bounding_radius(),
            circle,
            plane,
            solid_material: StandardMaterial {
                color: Color::new(0x22, 0x22, 0x22),
                roughness: 1.0,
                metalness: 0.0,
            },
            shadow_material: ShadowMaterial { opacity: 0.4 },
            receive_shadow: true,
            cast_shadow: false,
            visible: true,
        }
    }

    pub fn mode(&self) -> GroundMode {
        self.mode
    }

    /// Swaps the active geometry/material pair and recomputes the bounding
    /// volume. Infinite Canvas always catches shadows and never casts them;
    /// the per-config shadow flags only apply in Solid mode.
    pub fn set_mode(&mut self, mode: GroundMode) {
        self.mode = mode;
        if mode == GroundMode::InfiniteCanvas {
            self.receive_shadow = true;
            self.cast_shadow = false;
        }
        self.bounding_radius = self.active_geometry().bounding_radius();
    }

    pub fn active_geometry(&self) -> &GroundGeometry {
        match self.mode {
            GroundMode::Solid => &self.circle,
            GroundMode::InfiniteCanvas => &self.plane,
        }
    }

    pub fn circle_geometry(&self) -> &GroundGeometry {
        &self.circle
    }

    pub fn plane_geometry(&self) -> &GroundGeometry {
        &self.plane
    }

    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    pub fn apply_config(&mut self, config: &GroundConfig) {
        self.solid_material.color = config.color;
        self.solid_material.roughness = config.roughness;
        self.solid_material.metalness = config.metalness;
        self.shadow_material.opacity = config.shadow_opacity;
        self.receive_shadow = config.receive_shadow;
        self.cast_shadow = config.cast_shadow;
        self.visible = config.visible;
        // Last so the mode policy wins over the shadow flags above.
        self.set_mode(config.mode);
    }

    pub fn capture_config(&self) -> GroundConfig {
        GroundConfig {
            mode: self.mode,
            color: self.solid_material.color,
            roughness: self.solid_material.roughness,
            metalness: self.solid_material.metalness,
            shadow_opacity: self.shadow_material.opacity,
            receive_shadow: self.receive_shadow,
            cast_shadow: self.cast_shadow,
            visible: self.visible,
        }
    }
}

impl Default for Ground {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_exactly_one_pair() {
        let mut ground = Ground::new();

        ground.set_mode(GroundMode::InfiniteCanvas);
        assert!(matches!(
            ground.active_geometry(),
            GroundGeometry::Plane { .. }
        ));

        ground.set_mode(GroundMode::Solid);
        assert!(matches!(
            ground.active_geometry(),
            GroundGeometry::Circle { .. }
        ));
    }

    #[test]
    fn toggling_back_restores_the_same_geometry_object() {
        let mut ground = Ground::new();
        let original = ground.circle_geometry() as *const GroundGeometry;

        ground.set_mode(GroundMode::InfiniteCanvas);
        ground.set_mode(GroundMode::Solid);

        assert!(std::ptr::eq(ground.active_geometry(), original));
    }

    #[test]
    fn infinite_canvas_forces_shadow_policy() {
        let mut ground = Ground::new();
        ground.receive_shadow = false;
        ground.cast_shadow = true;

        ground.set_mode(GroundMode::InfiniteCanvas);
        assert!(ground.receive_shadow);
        assert!(!ground.cast_shadow);
    }

    #[test]
    fn mode_swap_recomputes_bounding_radius() {
        let mut ground = Ground::new();
        assert_eq!(ground.bounding_radius(), 5.0);

        ground.set_mode(GroundMode::InfiniteCanvas);
        let expected = (30.0f32 * 30.0 * 2.0).sqrt() * 0.5;
        assert!((ground.bounding_radius() - expected).abs() < 1e-4);
    }

    #[test]
    fn wire_names_are_stable() {
        assert_eq!(
            serde_json::to_string(&GroundMode::InfiniteCanvas).unwrap(),
            "\"Infinite Canvas\""
        );
        assert_eq!(
            serde_json::to_string(&GroundMode::Solid).unwrap(),
            "\"Solid\""
        );
        assert!(serde_json::from_str::<GroundMode>("\"Floating\"").is_err());
    }
}
