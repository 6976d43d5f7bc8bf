use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::placement::Location;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Translation3, Unit, Vector3};

/// Boolean operations + transformations
pub trait CSG: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin (0,0,0).
    fn center(&self) -> Self {
        let aabb = self.bounding_box();
        if aabb.is_empty() {
            return self.clone();
        }
        let c = aabb.center();
        self.translate(-c.x, -c.y, -c.z)
    }

    /// Translates the object so that its bottommost point(s) sit exactly at z=0.
    fn float(&self) -> Self {
        let aabb = self.bounding_box();
        if aabb.is_empty() {
            return self.clone();
        }
        self.translate(0.0, 0.0, -aabb.mins.z)
    }

    /// Rotates by x_degrees, y_degrees, z_degrees (applied X, then Y, then Z)
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Rotate by `deg` about the axis through `origin` along `axis`.
    fn rotate_about_axis(&self, origin: Point3<Real>, axis: Vector3<Real>, deg: Real) -> Self {
        if axis.norm() <= Real::EPSILON {
            return self.clone();
        }
        let rot = Rotation3::from_axis_angle(&Unit::new_normalize(axis), deg.to_radians());
        let to_origin = Translation3::from(-origin.coords).to_homogeneous();
        let back = Translation3::from(origin.coords).to_homogeneous();
        self.transform(&(back * rot.to_homogeneous() * to_origin))
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }

    /// Reflect (mirror) about `plane`.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len <= Real::EPSILON {
            return self.clone();
        }

        let n = plane.normal() / len;
        let w = plane.offset() / len;

        // Translate so the plane crosses the origin
        let offset = n * w;
        let t1 = Translation3::from(-offset).to_homogeneous();

        // R = I - 2 n n^T
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        let t2 = Translation3::from(offset).to_homogeneous();

        self.transform(&(t2 * reflect_4 * t1))
    }

    /// Apply a placement.
    fn moved(&self, location: &Location) -> Self {
        self.transform(&location.matrix())
    }

    /// Distribute `rows x cols` copies with spacing dx, dy in the XY plane,
    /// starting at the current position.
    fn distribute_grid(&self, rows: usize, cols: usize, dx: Real, dy: Real) -> Self {
        if rows < 1 || cols < 1 {
            return self.clone();
        }
        let step_x = Vector3::new(dx, 0.0, 0.0);
        let step_y = Vector3::new(0.0, dy, 0.0);

        let mut all = Self::new();

        for r in 0..rows {
            for c in 0..cols {
                let offset = step_x * (c as Real) + step_y * (r as Real);
                all = all.union(&self.translate_vector(offset));
            }
        }
        all.invalidate_bounding_box();

        all
    }
}
