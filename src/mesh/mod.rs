//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::aabb::Aabb;
use crate::float_types::{Real, tolerance};
use crate::mesh::{bsp::Node, polygon::Polygon};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed polygon soup describing one or more solids.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Convex polygons, outward facing
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

/// Coordinate axis, used by [`Mesh::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which side of a split plane to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Keep everything at coordinates below the plane
    Below,
    /// Keep everything at coordinates above the plane
    Above,
}

impl Mesh {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding‑box tests
    fn partition_polys(polys: &[Polygon], other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        let other_bb = other_bb.loosened(tolerance());
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(&other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    fn flip_all(polys: Vec<Polygon>) -> Vec<Polygon> {
        polys.into_iter().map(|p| p.flipped()).collect()
    }

    /// Helper to collect all vertex positions.
    #[cfg(not(feature = "parallel"))]
    pub fn vertices(&self) -> Vec<Point3<Real>> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().map(|v| v.pos))
            .collect()
    }

    /// Parallel helper to collect all vertex positions.
    #[cfg(feature = "parallel")]
    pub fn vertices(&self) -> Vec<Point3<Real>> {
        self.polygons
            .par_iter()
            .flat_map_iter(|p| p.vertices.iter().map(|v| v.pos))
            .collect()
    }

    /// Every polygon fanned into triangles.
    pub fn triangulate(&self) -> Vec<[Point3<Real>; 3]> {
        self.polygons.iter().flat_map(|p| p.triangulate()).collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Enclosed volume by the divergence theorem. Only meaningful for closed,
    /// outward-facing meshes.
    pub fn volume(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Total surface area.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// Concatenate two polygon sets without a boolean.
    pub fn merge(&self, other: &Mesh) -> Mesh {
        let mut polygons = Vec::with_capacity(self.polygons.len() + other.polygons.len());
        polygons.extend_from_slice(&self.polygons);
        polygons.extend_from_slice(&other.polygons);
        Mesh::from_polygons(polygons)
    }

    /// Concatenate any number of meshes.
    pub fn merge_all<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let polygons = meshes
            .into_iter()
            .flat_map(|m| m.polygons.iter().cloned())
            .collect();
        Mesh::from_polygons(polygons)
    }

    /// An axis-aligned box spanning `aabb`.
    pub fn from_aabb(aabb: &Aabb) -> Mesh {
        let e = aabb.extents();
        shapes::cuboid(e.x, e.y, e.z).translate(aabb.mins.x, aabb.mins.y, aabb.mins.z)
    }

    /// Keep the part of the solid on one side of the plane `axis = at`.
    pub fn split(&self, axis: Axis, at: Real, keep: Keep) -> Mesh {
        let bb = self.bounding_box();
        if bb.is_empty() {
            return Mesh::new();
        }
        let mut half = bb.loosened(1.0);
        let i = axis.index();
        match keep {
            Keep::Below => half.maxs[i] = at,
            Keep::Above => half.mins[i] = at,
        }
        if half.maxs[i] <= half.mins[i] {
            return Mesh::new();
        }
        tracing::debug!(?axis, at, ?keep, "mesh split");
        self.intersection(&Mesh::from_aabb(&half))
    }
}

impl CSG for Mesh {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh::default()
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh) -> Mesh {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let a_bb = self.bounding_box();
        let b_bb = other.bounding_box();
        if !a_bb.intersects(&b_bb) {
            return self.merge(other);
        }

        let (a_maybe, a_pass) = Self::partition_polys(&self.polygons, &b_bb);
        let (b_maybe, b_pass) = Self::partition_polys(&other.polygons, &a_bb);
        tracing::debug!(
            left = self.polygons.len(),
            right = other.polygons.len(),
            left_active = a_maybe.len(),
            right_active = b_maybe.len(),
            "mesh union"
        );

        let a_tree = Node::from_polygons(&self.polygons);
        let b_tree = Node::from_polygons(&other.polygons);

        let a_kept = b_tree.clip_polygons(&a_maybe);
        let b_clipped = a_tree.clip_polygons(&b_maybe);
        // drop faces of `other` that coincide with faces of `self`
        let b_kept = Self::flip_all(a_tree.clip_polygons(&Self::flip_all(b_clipped)));

        let mut polygons = a_pass;
        polygons.extend(a_kept);
        polygons.extend(b_pass);
        polygons.extend(b_kept);
        Mesh::from_polygons(polygons)
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh) -> Mesh {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let a_bb = self.bounding_box();
        let b_bb = other.bounding_box();
        if !a_bb.intersects(&b_bb) {
            return self.clone();
        }

        let (a_maybe, a_pass) = Self::partition_polys(&self.polygons, &b_bb);
        let (b_maybe, _b_outside) = Self::partition_polys(&other.polygons, &a_bb);
        tracing::debug!(
            left = self.polygons.len(),
            right = other.polygons.len(),
            left_active = a_maybe.len(),
            right_active = b_maybe.len(),
            "mesh difference"
        );

        let mut inv_a_tree = Node::from_polygons(&self.polygons);
        inv_a_tree.invert();
        let b_tree = Node::from_polygons(&other.polygons);

        let a_kept = b_tree.clip_polygons(&Self::flip_all(a_maybe));
        let b_inside = inv_a_tree.clip_polygons(&b_maybe);
        let b_kept = inv_a_tree.clip_polygons(&Self::flip_all(b_inside));

        let mut polygons = a_pass;
        polygons.extend(Self::flip_all(a_kept));
        polygons.extend(b_kept);
        Mesh::from_polygons(polygons)
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh) -> Mesh {
        if self.is_empty() || other.is_empty() {
            return Mesh::new();
        }
        let a_bb = self.bounding_box();
        let b_bb = other.bounding_box();
        if !a_bb.intersects(&b_bb) {
            return Mesh::new();
        }

        let (a_maybe, _) = Self::partition_polys(&self.polygons, &b_bb);
        let (b_maybe, _) = Self::partition_polys(&other.polygons, &a_bb);
        tracing::debug!(
            left = self.polygons.len(),
            right = other.polygons.len(),
            left_active = a_maybe.len(),
            right_active = b_maybe.len(),
            "mesh intersection"
        );

        let mut inv_a_tree = Node::from_polygons(&self.polygons);
        inv_a_tree.invert();
        let mut inv_b_tree = Node::from_polygons(&other.polygons);
        inv_b_tree.invert();

        let b_inside = inv_a_tree.clip_polygons(&b_maybe);
        let a_inside = inv_b_tree.clip_polygons(&Self::flip_all(a_maybe));
        let b_kept = inv_a_tree.clip_polygons(&Self::flip_all(b_inside));

        let mut polygons = Self::flip_all(a_inside);
        polygons.extend(Self::flip_all(b_kept));
        Mesh::from_polygons(polygons)
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the Mesh.
    /// Mirroring transforms reverse the winding so faces stay outward.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh {
        let reverse = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        let polygons = self
            .polygons
            .iter()
            .filter_map(|p| p.transform(mat, reverse))
            .collect();
        Mesh::from_polygons(polygons)
    }

    /// Returns an [`Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            Aabb::from_points(
                self.polygons
                    .iter()
                    .flat_map(|p| p.vertices.iter().map(|v| &v.pos)),
            )
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh {
        Mesh::from_polygons(Self::flip_all(self.polygons.clone()))
    }
}
