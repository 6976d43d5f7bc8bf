//! Convex planar polygons, the unit the BSP tree works on

use crate::aabb::Aabb;
use crate::float_types::{Real, tolerance};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix4, Point3, Vector3};

/// A convex, planar polygon with counter-clockwise winding seen from the
/// side its plane normal points to.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Wrap vertices that are already known to lie on `plane`.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Build a polygon from a loop of points.
    ///
    /// Consecutive duplicates (within tolerance) are dropped. Returns `None`
    /// if fewer than three distinct points remain or the loop has no area.
    pub fn from_points(points: &[Point3<Real>]) -> Option<Self> {
        let eps = tolerance();
        let mut pts: Vec<Point3<Real>> = Vec::with_capacity(points.len());
        for p in points {
            if pts.last().is_none_or(|q| (q - p).norm() > eps) {
                pts.push(*p);
            }
        }
        while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= eps {
            pts.pop();
        }
        if pts.len() < 3 {
            return None;
        }
        let plane = Plane::from_loop(&pts)?;
        let vertices = pts
            .into_iter()
            .map(|p| Vertex::new(p, plane.normal))
            .collect();
        Some(Polygon { vertices, plane })
    }

    /// Rebuild a polygon from vertices, recomputing its plane.
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        let points: Vec<Point3<Real>> = vertices.iter().map(|v| v.pos).collect();
        Self::from_points(&points)
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    pub fn flipped(&self) -> Self {
        let mut p = self.clone();
        p.flip();
        p
    }

    /// Fan triangulation (valid because polygons are convex).
    pub fn triangulate(&self) -> Vec<[Point3<Real>; 3]> {
        let v = &self.vertices;
        if v.len() < 3 {
            return Vec::new();
        }
        (1..v.len() - 1)
            .map(|i| [v[0].pos, v[i].pos, v[i + 1].pos])
            .collect()
    }

    /// Vector area (half the Newell normal); its norm is the polygon area.
    pub fn vector_area(&self) -> Vector3<Real> {
        let mut sum = Vector3::<Real>::zeros();
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i].pos.coords;
            let b = self.vertices[(i + 1) % n].pos.coords;
            sum += a.cross(&b);
        }
        sum * 0.5
    }

    pub fn area(&self) -> Real {
        self.vector_area().norm()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.pos))
    }

    pub fn centroid(&self) -> Point3<Real> {
        let sum: Vector3<Real> = self.vertices.iter().map(|v| v.pos.coords).sum();
        Point3::from(sum / self.vertices.len().max(1) as Real)
    }

    /// Transform every vertex by `matrix`. Pass `reverse = true` for
    /// orientation-reversing matrices so the polygon keeps facing outwards.
    pub fn transform(&self, matrix: &Matrix4<Real>, reverse: bool) -> Option<Polygon> {
        let mut points: Vec<Point3<Real>> = self
            .vertices
            .iter()
            .map(|v| v.transformed_pos(matrix))
            .collect();
        if reverse {
            points.reverse();
        }
        Polygon::from_points(&points)
    }
}
