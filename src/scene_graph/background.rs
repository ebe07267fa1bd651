use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::config::BackgroundConfig;

const GRADIENT_SIZE: u32 = 512;

/// The scene background: a vertical two-stop gradient rasterized into a
/// fixed-size off-screen texture. Regeneration is a pure raster operation
/// and always succeeds.
#[derive(Debug)]
pub struct Background {
    pub gradient_top: Color,
    pub gradient_bottom: Color,
    pub gradient_alpha: f32,
    texture: RgbaImage,
}

impl Background {
    pub fn new(top: Color, bottom: Color, alpha: f32) -> Self {
        let mut background = Self {
            gradient_top: top,
            gradient_bottom: bottom,
            gradient_alpha: alpha,
            texture: RgbaImage::new(GRADIENT_SIZE, GRADIENT_SIZE),
        };
        background.regenerate();
        background
    }

    pub fn set_gradient(&mut self, top: Color, bottom: Color, alpha: f32) {
        self.gradient_top = top;
        self.gradient_bottom = bottom;
        self.gradient_alpha = alpha;
        self.regenerate();
    }

    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }

    fn regenerate(&mut self) {
        let top = self.gradient_top.to_f32();
        let bottom = self.gradient_bottom.to_f32();
        let alpha = (self.gradient_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;

        for y in 0..GRADIENT_SIZE {
            let t = y as f32 / (GRADIENT_SIZE - 1) as f32;
            let pixel = Rgba([
                lerp_channel(top[0], bottom[0], t),
                lerp_channel(top[1], bottom[1], t),
                lerp_channel(top[2], bottom[2], t),
                alpha,
            ]);
            for x in 0..GRADIENT_SIZE {
                self.texture.put_pixel(x, y, pixel);
            }
        }
    }

    pub fn apply_config(&mut self, config: &BackgroundConfig) {
        self.set_gradient(
            config.gradient_top,
            config.gradient_bottom,
            config.gradient_alpha,
        );
    }

    pub fn capture_config(&self) -> BackgroundConfig {
        BackgroundConfig {
            gradient_top: self.gradient_top,
            gradient_bottom: self.gradient_bottom,
            gradient_alpha: self.gradient_alpha,
        }
    }
}

fn lerp_channel(a: f32, b: f32, t: f32) -> u8 {
    ((a + (b - a) * t) * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_top_to_bottom() {
        let background = Background::new(Color::new(255, 0, 0), Color::new(0, 0, 255), 1.0);
        let texture = background.texture();

        assert_eq!(texture.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(texture.get_pixel(0, GRADIENT_SIZE - 1).0, [0, 0, 255, 255]);

        let mid = texture.get_pixel(256, GRADIENT_SIZE / 2).0;
        assert!(mid[0] > 100 && mid[0] < 155);
        assert!(mid[2] > 100 && mid[2] < 155);
    }

    #[test]
    fn alpha_lands_in_the_alpha_channel() {
        let background = Background::new(Color::WHITE, Color::WHITE, 0.3);
        assert_eq!(background.texture().get_pixel(10, 10).0[3], 77);
    }
}
