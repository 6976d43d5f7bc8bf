//! 3D primitive shapes

use crate::errors::{CadError, CadResult};
use crate::float_types::{Real, TAU, tolerance};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::traits::CSG;
use nalgebra::Point3;

/// Build a mesh from faces given as point loops, skipping degenerate ones.
pub(crate) fn mesh_from_loops(loops: Vec<Vec<Point3<Real>>>) -> Mesh {
    let mut skipped = 0usize;
    let polygons: Vec<Polygon> = loops
        .iter()
        .filter_map(|l| {
            let p = Polygon::from_points(l);
            if p.is_none() {
                skipped += 1;
            }
            p
        })
        .collect();
    if skipped > 0 {
        tracing::trace!(skipped, "dropped degenerate faces");
    }
    Mesh::from_polygons(polygons)
}

/// Create a right prism (a box) that spans from (0, 0, 0)
/// to (width, length, height). All dimensions must be >= 0.
pub fn cuboid(width: Real, length: Real, height: Real) -> Mesh {
    let p = |x: Real, y: Real, z: Real| Point3::new(x * width, y * length, z * height);

    let faces = vec![
        // bottom (z=0), normal -Z
        vec![p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
        // top (z=h), normal +Z
        vec![p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
        // front (y=0), normal -Y
        vec![p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
        // back (y=l), normal +Y
        vec![p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
        // left (x=0), normal -X
        vec![p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
        // right (x=w), normal +X
        vec![p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
    ];
    mesh_from_loops(faces)
}

/// A box centred on the origin in all three axes.
pub fn centered_box(width: Real, length: Real, height: Real) -> Mesh {
    cuboid(width, length, height).translate(-width / 2.0, -length / 2.0, -height / 2.0)
}

/// Cylinder of `radius` along +Z from z=0 to z=`height`.
pub fn cylinder(radius: Real, height: Real, segments: usize) -> Mesh {
    frustum(radius, radius, height, segments)
}

/// Tapered cylinder from `r1` at z=0 to `r2` at z=`height`. Either radius
/// may be zero, which gives a cone.
pub fn frustum(r1: Real, r2: Real, height: Real, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let ring = |r: Real, z: Real| -> Vec<Point3<Real>> {
        (0..segments)
            .map(|i| {
                let a = TAU * i as Real / segments as Real;
                Point3::new(r * a.cos(), r * a.sin(), z)
            })
            .collect()
    };
    let (z0, z1) = if height >= 0.0 { (0.0, height) } else { (height, 0.0) };
    let (r_lo, r_hi) = if height >= 0.0 { (r1, r2) } else { (r2, r1) };
    let bottom = ring(r_lo, z0);
    let top = ring(r_hi, z1);

    let mut faces = Vec::with_capacity(segments + 2);
    if r_lo > tolerance() {
        faces.push(bottom.iter().rev().copied().collect());
    }
    if r_hi > tolerance() {
        faces.push(top.clone());
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        faces.push(vec![bottom[i], bottom[j], top[j], top[i]]);
    }
    mesh_from_loops(faces)
}

/// UV sphere of `radius` centred on the origin.
pub fn sphere(radius: Real, segments: usize, stacks: usize) -> Mesh {
    let segments = segments.max(3);
    let stacks = stacks.max(2);
    let vertex = |theta: Real, phi: Real| {
        Point3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    };

    let mut faces = Vec::with_capacity(segments * stacks);
    for i in 0..segments {
        for j in 0..stacks {
            let t0 = i as Real / segments as Real;
            let t1 = (i + 1) as Real / segments as Real;
            let p0 = j as Real / stacks as Real;
            let p1 = (j + 1) as Real / stacks as Real;

            let theta0 = t0 * TAU;
            let theta1 = t1 * TAU;
            let phi0 = p0 * crate::float_types::PI;
            let phi1 = p1 * crate::float_types::PI;

            let mut face = vec![vertex(theta0, phi0), vertex(theta0, phi1)];
            if j < stacks - 1 {
                face.push(vertex(theta1, phi1));
            }
            if j > 0 {
                face.push(vertex(theta1, phi0));
            }
            faces.push(face);
        }
    }

    // Keep every face pointing away from the centre.
    let mesh = mesh_from_loops(faces);
    let polygons = mesh
        .polygons
        .into_iter()
        .map(|p| {
            if p.plane.normal.dot(&p.centroid().coords) < 0.0 {
                p.flipped()
            } else {
                p
            }
        })
        .collect();
    Mesh::from_polygons(polygons)
}

/// Construct a polyhedron from a point list and faces that index into it.
/// Faces must be convex and wound counter-clockwise seen from outside.
pub fn polyhedron(points: &[[Real; 3]], faces: &[Vec<usize>]) -> CadResult<Mesh> {
    let mut loops = Vec::with_capacity(faces.len());
    for face in faces {
        if face.len() < 3 {
            continue;
        }
        let mut face_loop = Vec::with_capacity(face.len());
        for &idx in face {
            let [x, y, z] = *points.get(idx).ok_or(CadError::FaceIndexOutOfRange {
                index: idx,
                len: points.len(),
            })?;
            face_loop.push(Point3::new(x, y, z));
        }
        loops.push(face_loop);
    }
    Ok(mesh_from_loops(loops))
}
