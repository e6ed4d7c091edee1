use crate::config::ConfigError;
use glam::DVec2;
use rand::Rng;
use std::fmt;

/// Cosmetic colour carried for an external renderer. Physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Draw a uniformly random 24-bit colour
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }

    /// `#RRGGBB` form, as a canvas fill style expects it
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A circular body in the arena
///
/// `radius` is also the mass weight used by collision response.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub color: Color,
}

impl Body {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            color: Color::default(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Fixed size of the arena rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    width: f64,
    height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the whole disc of `body` lies inside the rectangle
    pub fn contains(&self, body: &Body) -> bool {
        body.pos.x - body.radius >= 0.0
            && body.pos.x + body.radius <= self.width
            && body.pos.y - body.radius >= 0.0
            && body.pos.y + body.radius <= self.height
    }
}
