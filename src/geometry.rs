//! Millimeter geometry shared by the layout solver, fitter and surfaces.
//!
//! All coordinates are sheet coordinates: origin at the top-left corner of
//! the paper, x to the right, y downward. Surfaces with a different native
//! origin (PDF is bottom-up) convert at the edge.

use serde::{Deserialize, Serialize};

/// Width and height in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Axis-aligned rectangle in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// True if `other` lies entirely inside `self` (within `tolerance` mm).
    pub fn contains_rect(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }
}

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BLACK: Self = Self(0, 0, 0);
    /// Light gray used for cut guides.
    pub const GUIDE: Self = Self(200, 200, 200);

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_validity() {
        assert!(Dimensions::new(63.0, 88.0).is_valid());
        assert!(!Dimensions::new(0.0, 88.0).is_valid());
        assert!(!Dimensions::new(63.0, -1.0).is_valid());
        assert!(!Dimensions::new(f32::NAN, 88.0).is_valid());
        assert!(!Dimensions::new(f32::INFINITY, 88.0).is_valid());
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 63.0, 88.0);
        assert_eq!(r.right(), 73.0);
        assert_eq!(r.bottom(), 108.0);
        assert!(r.contains_rect(&Rect::new(10.0, 20.0, 63.0, 88.0), 0.0));
        assert!(!r.contains_rect(&Rect::new(9.0, 20.0, 63.0, 88.0), 0.0));
    }

    #[test]
    fn test_rgb_to_unit() {
        assert_eq!(Rgb::WHITE.to_unit(), (1.0, 1.0, 1.0));
        assert_eq!(Rgb::BLACK.to_unit(), (0.0, 0.0, 0.0));
    }
}
