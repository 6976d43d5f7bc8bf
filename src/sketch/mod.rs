//! `Sketch` struct and implementations of the `CSG` trait for `Sketch`
//!
//! A sketch is a set of planar regions in the XY plane. It is what gets
//! extruded, lofted or used as a cutter profile.

use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::placement;
use crate::traits::CSG;
use geo::{
    Area, BooleanOps, BoundingRect, Coord, MapCoords, MultiPolygon, Orient, Polygon as GeoPolygon,
    orient::Direction,
};
use nalgebra::{Matrix4, Point2, Point3};

pub mod corners;
pub mod extrude;
pub mod profile;
pub mod shapes;

pub use extrude::EdgeTreatment;

#[derive(Clone, Debug, PartialEq)]
pub struct Sketch {
    /// Regions with counter-clockwise exteriors and clockwise holes
    pub geometry: MultiPolygon<Real>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::empty()
    }
}

impl Sketch {
    pub fn empty() -> Self {
        Sketch {
            geometry: MultiPolygon::new(Vec::new()),
        }
    }

    /// Wrap polygons, normalising ring orientation.
    pub fn from_geo(geometry: MultiPolygon<Real>) -> Self {
        Sketch {
            geometry: geometry.orient(Direction::Default),
        }
    }

    pub fn from_polygons(polygons: Vec<GeoPolygon<Real>>) -> Self {
        Self::from_geo(MultiPolygon::new(polygons))
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    /// Number of disjoint regions.
    pub fn region_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// Total number of holes across all regions.
    pub fn hole_count(&self) -> usize {
        self.geometry.0.iter().map(|p| p.interiors().len()).sum()
    }

    pub fn area(&self) -> Real {
        self.geometry.unsigned_area()
    }

    pub fn translate_2d(&self, dx: Real, dy: Real) -> Sketch {
        Sketch {
            geometry: self.geometry.map_coords(|c| Coord {
                x: c.x + dx,
                y: c.y + dy,
            }),
        }
    }

    /// Rotate counter-clockwise by `deg` about the origin.
    pub fn rotate_2d(&self, deg: Real) -> Sketch {
        let (s, c) = deg.to_radians().sin_cos();
        Sketch {
            geometry: self.geometry.map_coords(|p| Coord {
                x: c * p.x - s * p.y,
                y: s * p.x + c * p.y,
            }),
        }
    }

    /// A copy of this sketch at every point, fused into one sketch.
    pub fn push(&self, points: &[Point2<Real>]) -> Sketch {
        points.iter().fold(Sketch::empty(), |acc, p| {
            acc.union(&self.translate_2d(p.x, p.y))
        })
    }

    /// A copy at every point of a centred `x_count × y_count` grid.
    pub fn rarray(&self, x_spacing: Real, y_spacing: Real, x_count: usize, y_count: usize) -> Sketch {
        self.push(&placement::rarray(x_spacing, y_spacing, x_count, y_count))
    }
}

impl CSG for Sketch {
    fn new() -> Self {
        Sketch::empty()
    }

    fn union(&self, other: &Sketch) -> Sketch {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Sketch::from_geo(self.geometry.union(&other.geometry))
    }

    fn difference(&self, other: &Sketch) -> Sketch {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Sketch::from_geo(self.geometry.difference(&other.geometry))
    }

    fn intersection(&self, other: &Sketch) -> Sketch {
        if self.is_empty() || other.is_empty() {
            return Sketch::empty();
        }
        Sketch::from_geo(self.geometry.intersection(&other.geometry))
    }

    /// Apply the XY part of a 3D transform; Z is dropped.
    fn transform(&self, m: &Matrix4<Real>) -> Sketch {
        let geometry = self.geometry.map_coords(|c| {
            let p = m.transform_point(&Point3::new(c.x, c.y, 0.0));
            Coord { x: p.x, y: p.y }
        });
        Sketch::from_geo(geometry)
    }

    fn bounding_box(&self) -> Aabb {
        match self.geometry.bounding_rect() {
            Some(rect) => Aabb::new(
                Point3::new(rect.min().x, rect.min().y, 0.0),
                Point3::new(rect.max().x, rect.max().y, 0.0),
            ),
            None => Aabb::empty(),
        }
    }

    fn invalidate_bounding_box(&mut self) {}

    /// A sketch region has no inside/outside flip; this returns a copy.
    fn inverse(&self) -> Sketch {
        self.clone()
    }
}
