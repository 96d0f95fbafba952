//! Reflective surface shapes.
//!
//! Shapes live in the surface's local XY plane; the local normal is +Z.

use glam::{Vec2, Vec3};

/// Area below which a surface is treated as degenerate.
pub const DEGENERATE_AREA: f32 = 1e-8;

/// 2D shape of a reflective surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceGeometry {
    /// Axis-aligned rectangle centered on the local origin.
    Rectangle { width: f32, height: f32 },
    /// Simple convex polygon, counter-clockwise when seen from +Z.
    Polygon(Vec<Vec2>),
}

impl SurfaceGeometry {
    /// Creates a rectangle centered on the origin.
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height }
    }

    /// Creates a polygon from its outline.
    pub fn polygon(points: impl Into<Vec<Vec2>>) -> Self {
        Self::Polygon(points.into())
    }

    /// Returns the outline vertices.
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            Self::Rectangle { width, height } => {
                let hw = width * 0.5;
                let hh = height * 0.5;
                vec![
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]
            }
            Self::Polygon(points) => points.clone(),
        }
    }

    /// Returns the unsigned area (shoelace formula).
    pub fn area(&self) -> f32 {
        match self {
            Self::Rectangle { width, height } => (width * height).abs(),
            Self::Polygon(points) => {
                if points.len() < 3 {
                    return 0.0;
                }
                let twice: f32 = points
                    .iter()
                    .zip(points.iter().cycle().skip(1))
                    .map(|(a, b)| a.perp_dot(*b))
                    .sum();
                (twice * 0.5).abs()
            }
        }
    }

    /// Returns whether the surface covers no area.
    pub fn is_degenerate(&self) -> bool {
        let area = self.area();
        area.is_nan() || area <= DEGENERATE_AREA
    }

    /// Returns the local bounding rectangle, or `None` for an empty outline.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let outline = self.outline();
        let first = *outline.first()?;
        Some(
            outline
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Returns a triangle-list of local positions (fan triangulation, z = 0).
    pub fn triangle_vertices(&self) -> Vec<Vec3> {
        let outline = self.outline();
        if outline.len() < 3 {
            return Vec::new();
        }
        let anchor = outline[0].extend(0.0);
        outline
            .windows(2)
            .skip(1)
            .flat_map(|pair| [anchor, pair[0].extend(0.0), pair[1].extend(0.0)])
            .collect()
    }
}
