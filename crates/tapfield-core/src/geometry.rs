//! 2D points, sizes, and colors in scene coordinates

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// A position or offset in scene-local coordinates (origin at scene center, Y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Width and height of a scene or shape
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// Straight (non-premultiplied) RGBA color, components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Rgba = Rgba::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(15.0, 12.0);
        let b = Point::new(10.0, 10.0);
        assert_eq!(a - b, Point::new(5.0, 2.0));
        assert_eq!(b + (a - b), a);

        let mut c = Point::ZERO;
        c += Point::new(-3.0, 4.5);
        c += Point::new(1.0, 0.5);
        assert_eq!(c, Point::new(-2.0, 5.0));
    }

    #[test]
    fn test_color_alpha_defaults_to_opaque() {
        let color: Rgba = toml::from_str("r = 0.5\ng = 0.25\nb = 0.0").unwrap();
        assert_eq!(color.a, 1.0);
    }
}
