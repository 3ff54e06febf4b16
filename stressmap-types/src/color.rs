use serde::{Deserialize, Serialize};

/// 8-bit RGBA color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Opaque red.
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates a color from its components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Red component.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Alpha component.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the same color with alpha set from a `0.0..=1.0` opacity.
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..*self }
    }

    /// Components as `[r, g, b, a]`.
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `true` if the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// CSS `rgba()` notation, with alpha in `0..=1`.
    pub fn to_css(&self) -> String {
        let alpha = self.a as f32 / 255.0;
        format!("rgba({}, {}, {}, {alpha:.2})", self.r, self.g, self.b)
    }
}
