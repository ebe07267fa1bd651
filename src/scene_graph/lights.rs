use glam::Vec3;

use crate::color::Color;
use crate::config::{AmbientLightConfig, DirectionalLightConfig};

/// A baked shadow map. Only the dimensions matter to the configuration
/// pipeline; the texels live on the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowMap {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub bias: f32,
    pub blur: f32,
    pub map_width: u32,
    pub map_height: u32,
}

#[derive(Debug)]
pub struct DirectionalLight {
    pub intensity: f32,
    pub color: Color,
    pub cast_shadow: bool,
    pub shadow: ShadowSettings,
    pub position: Vec3,
    pub helper_visible: bool,
    baked_shadow_map: Option<ShadowMap>,
}

impl DirectionalLight {
    pub fn new() -> Self {
        Self {
            intensity: 1.43,
            color: Color::WHITE,
            cast_shadow: true,
            shadow: ShadowSettings {
                bias: 0.0,
                blur: 1.0,
                map_width: 1024,
                map_height: 1024,
            },
            position: Vec3::new(1.35, 1.57, 0.9),
            helper_visible: false,
            baked_shadow_map: None,
        }
    }

    /// Resizing disposes any previously baked map so the next frame bakes at
    /// the new resolution.
    pub fn set_shadow_map_size(&mut self, width: u32, height: u32) {
        if width != self.shadow.map_width || height != self.shadow.map_height {
            self.baked_shadow_map = None;
        }
        self.shadow.map_width = width;
        self.shadow.map_height = height;
    }

    pub fn bake_shadow_map(&mut self) {
        self.baked_shadow_map = Some(ShadowMap {
            width: self.shadow.map_width,
            height: self.shadow.map_height,
        });
    }

    pub fn baked_shadow_map(&self) -> Option<ShadowMap> {
        self.baked_shadow_map
    }

    pub fn apply_config(&mut self, config: &DirectionalLightConfig) {
        self.intensity = config.intensity;
        self.color = config.color;
        self.cast_shadow = config.cast_shadow;
        self.shadow.bias = config.shadow_bias;
        self.shadow.blur = config.shadow_blur;
        self.set_shadow_map_size(config.shadow_map_width, config.shadow_map_height);
        self.position = config.position.into();
        self.helper_visible = config.show_helper;
    }

    pub fn capture_config(&self) -> DirectionalLightConfig {
        DirectionalLightConfig {
            intensity: self.intensity,
            color: self.color,
            cast_shadow: self.cast_shadow,
            shadow_bias: self.shadow.bias,
            shadow_blur: self.shadow.blur,
            shadow_map_width: self.shadow.map_width,
            shadow_map_height: self.shadow.map_height,
            position: self.position.into(),
            show_helper: self.helper_visible,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
    pub color: Color,
}

impl AmbientLight {
    pub fn new() -> Self {
        Self {
            intensity: 0.4,
            color: Color::WHITE,
        }
    }

    pub fn apply_config(&mut self, config: &AmbientLightConfig) {
        self.intensity = config.intensity;
        self.color = config.color;
    }

    pub fn capture_config(&self) -> AmbientLightConfig {
        AmbientLightConfig {
            intensity: self.intensity,
            color: self.color,
        }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_disposes_baked_shadow_map() {
        let mut light = DirectionalLight::new();
        light.bake_shadow_map();
        assert!(light.baked_shadow_map().is_some());

        light.set_shadow_map_size(2048, 2048);
        assert!(light.baked_shadow_map().is_none());
        assert_eq!(light.shadow.map_width, 2048);
    }

    #[test]
    fn same_size_keeps_baked_shadow_map() {
        let mut light = DirectionalLight::new();
        light.bake_shadow_map();

        light.set_shadow_map_size(1024, 1024);
        assert!(light.baked_shadow_map().is_some());
    }
}
