//! Layout positioner.
//!
//! Places the editor panel in the right-hand strip of the viewport, level
//! with the sibling visualization panel so the primary view stays
//! uncovered. The result is computed once; nothing here observes resizes.

use serde::{Deserialize, Serialize};

/// Fraction of the viewport width at which the panel's left edge sits.
pub const DEFAULT_LEFT_FRACTION: f64 = 0.8;

/// Size of the browser viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Computes where the editor panel goes.
///
/// - left edge at `left_fraction` of the viewport width, right edge at the
///   viewport's right edge
/// - top and bottom edges level with `sibling`'s, clamped to the viewport
///
/// Negative or non-finite inputs count as zero and `left_fraction` is
/// clamped to `[0, 1]`, so the result always lies inside the viewport.
pub fn compute_geometry(viewport: Viewport, sibling: Geometry, left_fraction: f64) -> Geometry {
    let vw = non_negative(viewport.width);
    let vh = non_negative(viewport.height);
    let fraction = if left_fraction.is_finite() {
        left_fraction.clamp(0.0, 1.0)
    } else {
        DEFAULT_LEFT_FRACTION
    };

    let left = vw * fraction;
    let top = non_negative(sibling.top).min(vh);
    let bottom = non_negative(sibling.top + non_negative(sibling.height))
        .min(vh)
        .max(top);

    Geometry {
        top,
        left,
        width: vw - left,
        height: bottom - top,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_fifth_and_flush_bottom() {
        let viewport = Viewport::new(1000.0, 800.0);
        let sibling = Geometry::new(0.0, 0.0, 1000.0, 720.0);

        let g = compute_geometry(viewport, sibling, DEFAULT_LEFT_FRACTION);
        assert_eq!(g.left, 800.0);
        assert_eq!(g.width, 200.0);
        assert_eq!(g.right(), viewport.width);
        assert_eq!(g.bottom(), sibling.bottom());
    }

    #[test]
    fn test_sibling_past_viewport_is_clamped() {
        let g = compute_geometry(
            Viewport::new(500.0, 400.0),
            Geometry::new(50.0, 0.0, 500.0, 1000.0),
            0.8,
        );
        assert_eq!(g.top, 50.0);
        assert_eq!(g.bottom(), 400.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let g = compute_geometry(
            Viewport::new(-10.0, f64::NAN),
            Geometry::new(-5.0, 0.0, 10.0, 10.0),
            2.0,
        );
        assert_eq!(g, Geometry::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_fraction_is_honoured() {
        let g = compute_geometry(
            Viewport::new(1000.0, 100.0),
            Geometry::new(0.0, 0.0, 1000.0, 100.0),
            0.5,
        );
        assert_eq!(g.left, 500.0);
        assert_eq!(g.width, 500.0);
    }
}
