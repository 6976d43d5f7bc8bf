//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::Point3;
use waddle_cad::{
    aabb::Aabb,
    float_types::Real,
    mesh::{Mesh, polygon::Polygon},
};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let pts: Vec<Point3<Real>> = points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect();
    Polygon::from_points(&pts).expect("test polygon must be non-degenerate")
}

/// Assert that `bb` spans `mins..maxs` within `eps` on every axis.
#[track_caller]
pub fn assert_bbox(bb: &Aabb, mins: [Real; 3], maxs: [Real; 3], eps: Real) {
    for i in 0..3 {
        assert!(
            approx_eq(bb.mins[i], mins[i], eps) && approx_eq(bb.maxs[i], maxs[i], eps),
            "axis {i}: expected [{}, {}], got [{}, {}]",
            mins[i],
            maxs[i],
            bb.mins[i],
            bb.maxs[i]
        );
    }
}

/// Assert the enclosed volume of `mesh` is `expected` within a relative `rel`.
#[track_caller]
pub fn assert_volume(mesh: &Mesh, expected: Real, rel: Real) {
    let v = mesh.volume();
    assert!(
        (v - expected).abs() <= rel * expected.abs().max(1e-9),
        "expected volume {expected}, got {v}"
    );
}

/// Every vertex of `mesh` satisfies `pred`.
pub fn all_vertices(mesh: &Mesh, pred: impl Fn(&Point3<Real>) -> bool) -> bool {
    mesh.vertices().iter().all(pred)
}
