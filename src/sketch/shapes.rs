//! 2D Shapes as `Sketch`s

use crate::float_types::{Real, TAU};
use crate::sketch::Sketch;
use geo::{Coord, LineString, Polygon as GeoPolygon};

fn closed_ring(points: impl IntoIterator<Item = (Real, Real)>) -> LineString<Real> {
    LineString::new(points.into_iter().map(|(x, y)| Coord { x, y }).collect())
}

impl Sketch {
    /// Creates a 2D rectangle centred on the origin.
    ///
    /// # Parameters
    ///
    /// - `width`: extent along X
    /// - `length`: extent along Y
    ///
    /// # Example
    /// ```
    /// # use waddle_cad::sketch::Sketch;
    /// let plate = Sketch::rectangle(238.6, 86.2);
    /// assert!((plate.area() - 238.6 * 86.2).abs() < 1e-6);
    /// ```
    pub fn rectangle(width: Real, length: Real) -> Self {
        let (hw, hl) = (width / 2.0, length / 2.0);
        let outer = closed_ring([(-hw, -hl), (hw, -hl), (hw, hl), (-hw, hl)]);
        Sketch::from_polygons(vec![GeoPolygon::new(outer, vec![])])
    }

    /// A rectangle with its lower-left corner at `(x, y)`.
    pub fn rectangle_at(x: Real, y: Real, width: Real, length: Real) -> Self {
        Self::rectangle(width, length).translate_2d(x + width / 2.0, y + length / 2.0)
    }

    /// Creates a 2D circle centred on the origin, approximated by
    /// `segments` edges. The first vertex sits on +X.
    ///
    /// The polygon is inscribed, so the maximum radial error is
    /// `r·(1 - cos(π/n))`.
    pub fn circle(radius: Real, segments: usize) -> Self {
        if segments < 3 || radius <= 0.0 {
            return Sketch::empty();
        }
        let outer = closed_ring((0..segments).map(|i| {
            let theta = TAU * (i as Real) / (segments as Real);
            (radius * theta.cos(), radius * theta.sin())
        }));
        Sketch::from_polygons(vec![GeoPolygon::new(outer, vec![])])
    }

    /// Creates a 2D polygon from a list of `[x, y]` points describing the
    /// boundary in order. Either winding is accepted.
    pub fn polygon(points: &[[Real; 2]]) -> Self {
        if points.len() < 3 {
            return Sketch::empty();
        }
        let outer = closed_ring(points.iter().map(|&[x, y]| (x, y)));
        Sketch::from_polygons(vec![GeoPolygon::new(outer, vec![])])
    }

    /// A `width × length` rectangle whose short sides are fully rounded
    /// (a stadium). Equivalent to filleting every corner with a huge radius.
    pub fn slot(width: Real, length: Real, segments: usize) -> Self {
        Self::rectangle(width, length).fillet_corners(width.min(length) / 2.0, segments)
    }
}
