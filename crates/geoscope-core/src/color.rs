//! RGBA colors.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// A color with floating point components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates a color from its components.
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Converts the color to normalized unsigned bytes, as stored in
    /// per-instance vertex attributes.
    pub fn to_bytes(self) -> [u8; 4] {
        [
            float_to_byte(self.red),
            float_to_byte(self.green),
            float_to_byte(self.blue),
            float_to_byte(self.alpha),
        ]
    }

    /// Returns the color as an `(r, g, b, a)` vector.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.red, self.green, self.blue, self.alpha)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_byte(value: f32) -> u8 {
    let value = value.clamp(0.0, 1.0);
    if value >= 1.0 {
        255
    } else {
        (value * 256.0) as u8
    }
}
