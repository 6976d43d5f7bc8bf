//! Grid placement and rigid locations

use crate::float_types::Real;
use nalgebra::{Isometry3, Matrix3, Matrix4, Point2, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

/// A rectangular grid of `x_count × y_count` points centred on the origin.
pub fn rarray(x_spacing: Real, y_spacing: Real, x_count: usize, y_count: usize) -> Vec<Point2<Real>> {
    rarray_aligned(x_spacing, y_spacing, x_count, y_count, (true, true))
}

/// Like [`rarray`] with per-axis centring. A `false` flag puts the first
/// point at 0 on that axis. Points are ordered column by column.
pub fn rarray_aligned(
    x_spacing: Real,
    y_spacing: Real,
    x_count: usize,
    y_count: usize,
    center: (bool, bool),
) -> Vec<Point2<Real>> {
    let x0 = if center.0 {
        -(x_count.saturating_sub(1) as Real) * x_spacing / 2.0
    } else {
        0.0
    };
    let y0 = if center.1 {
        -(y_count.saturating_sub(1) as Real) * y_spacing / 2.0
    } else {
        0.0
    };

    let mut points = Vec::with_capacity(x_count * y_count);
    for i in 0..x_count {
        for j in 0..y_count {
            points.push(Point2::new(
                x0 + i as Real * x_spacing,
                y0 + j as Real * y_spacing,
            ));
        }
    }
    points
}

/// A rigid placement: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub isometry: Isometry3<Real>,
}

impl Default for Location {
    fn default() -> Self {
        Self::identity()
    }
}

impl Location {
    pub fn identity() -> Self {
        Location {
            isometry: Isometry3::identity(),
        }
    }

    pub fn translation(x: Real, y: Real, z: Real) -> Self {
        Location {
            isometry: Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity()),
        }
    }

    /// Rotation of `deg` degrees about `axis` through the origin.
    pub fn rotation(axis: Vector3<Real>, deg: Real) -> Self {
        if axis.norm() <= Real::EPSILON {
            return Self::identity();
        }
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), deg.to_radians());
        Location {
            isometry: Isometry3::from_parts(Translation3::identity(), rotation),
        }
    }

    /// A frame whose local X is `x_dir` and local Z is `normal`, with its
    /// origin at `origin`. Local Y completes a right-handed frame. Sketches
    /// drawn in the XY plane and extruded along +Z land on that workplane.
    pub fn workplane(origin: Point3<Real>, x_dir: Vector3<Real>, normal: Vector3<Real>) -> Self {
        let z = normal.normalize();
        let x = (x_dir - z * x_dir.dot(&z)).normalize();
        let y = z.cross(&x);
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
        Location {
            isometry: Isometry3::from_parts(
                Translation3::from(origin.coords),
                UnitQuaternion::from_rotation_matrix(&rotation),
            ),
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Location) -> Location {
        Location {
            isometry: next.isometry * self.isometry,
        }
    }

    pub fn matrix(&self) -> Matrix4<Real> {
        self.isometry.to_homogeneous()
    }

    pub fn transform_point(&self, p: &Point3<Real>) -> Point3<Real> {
        self.isometry.transform_point(p)
    }

    pub fn translation_vector(&self) -> Vector3<Real> {
        self.isometry.translation.vector
    }
}
