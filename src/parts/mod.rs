//! Parametric keyboard parts
//!
//! Every generator is a small parameter struct whose methods return solids
//! ([`Mesh`]) or a finished [`Assembly`](crate::assembly::Assembly). The
//! helpers in this module are the features the generators share: boxes given
//! by their extents, profiles pushed along Y, copies on a key grid, and the
//! switch cut-out.

use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::placement::Location;
use crate::sketch::Sketch;
use crate::traits::CSG;
use nalgebra::{Point2, Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod cap;
pub mod pro_micro;
pub mod reference;
pub mod socket;
pub mod waddle;
pub mod waddle_alt;

pub use cap::{Cap, CornerOp, StemType};
pub use pro_micro::{ProMicro, ProMicroVariant};
pub use reference::{ReferenceModel, ReferenceModels};
pub use socket::Socket;
pub use waddle::{KeyboardPart, KeyboardParts, Waddle};
pub use waddle_alt::WaddleAlt;

/// Axis-aligned box spanning `[x0, x1] × [y0, y1] × [z0, z1]`.
pub fn block(x: (Real, Real), y: (Real, Real), z: (Real, Real)) -> Mesh {
    Mesh::from_aabb(&Aabb::new(
        Point3::new(x.0.min(x.1), y.0.min(y.1), z.0.min(z.1)),
        Point3::new(x.0.max(x.1), y.0.max(y.1), z.0.max(z.1)),
    ))
}

/// Sketch in the XZ plane (sketch y is world Z) pushed along Y between `y0`
/// and `y1`.
pub fn along_y(profile: &Sketch, y0: Real, y1: Real) -> Mesh {
    let (lo, hi) = (y0.min(y1), y0.max(y1));
    let frame = Location::workplane(Point3::new(0.0, hi, 0.0), Vector3::x(), -Vector3::y());
    profile.extrude(hi - lo).moved(&frame)
}

/// Sketch in the YZ plane (sketch x is world Y, sketch y is world Z) pushed
/// along X between `x0` and `x1`.
pub fn along_x(profile: &Sketch, x0: Real, x1: Real) -> Mesh {
    let (lo, hi) = (x0.min(x1), x0.max(x1));
    let frame = Location::workplane(Point3::new(lo, 0.0, 0.0), Vector3::y(), Vector3::x());
    profile.extrude(hi - lo).moved(&frame)
}

/// A copy of `mesh` at every point, merged without fusing.
pub fn copies_at(mesh: &Mesh, points: &[Point2<Real>]) -> Mesh {
    #[cfg(feature = "parallel")]
    let copies: Vec<Mesh> = points.par_iter().map(|p| mesh.translate(p.x, p.y, 0.0)).collect();
    #[cfg(not(feature = "parallel"))]
    let copies: Vec<Mesh> = points.iter().map(|p| mesh.translate(p.x, p.y, 0.0)).collect();
    Mesh::merge_all(&copies)
}

/// Which switch cut-out a plate gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutKind {
    /// Plain square hole
    Simple,
    /// Square hole with side notches for the clip-in tabs
    #[default]
    Cherry,
}

/// Outline of one switch hole in the plate, centred on the origin.
pub fn cut_profile(kind: CutKind, size: Real) -> Sketch {
    let square = Sketch::rectangle(size, size);
    match kind {
        CutKind::Simple => square,
        CutKind::Cherry => {
            let half = size / 2.0;
            let notches = Sketch::rectangle(1.0, 4.0)
                .push(&[Point2::new(-half, 0.0), Point2::new(half, 0.0)]);
            square.difference(&notches)
        },
    }
}

/// Clip reliefs on the front and back of the cherry cut-out body: 4 wide,
/// 1 deep and centred on the ±Y faces, rising from the bottom of the body
/// to one below its top. The top outer edge carries a 0.2 × 0.4 chamfer.
pub fn cherry_protrusions(size: Real, height: Real) -> Mesh {
    let half = size / 2.0;
    let bottom = -height / 2.0;
    let top = bottom + height - 1.0;
    // (y, z) outline for the +Y side
    let outline = Sketch::polygon(&[
        [half - 0.5, bottom],
        [half + 0.5, bottom],
        [half + 0.5, top - 0.4],
        [half + 0.3, top],
        [half - 0.5, top],
    ]);
    let back = along_x(&outline, -2.0, 2.0);
    let front = back.rotate(0.0, 0.0, 180.0);
    back.merge(&front)
}

/// The switch cut-out body: a `size × size × height` box centred on the
/// origin, minus the notches, plus the protrusions.
pub fn cut_body(kind: CutKind, size: Real, height: Real) -> Mesh {
    let body = cut_profile(kind, size)
        .extrude(height)
        .translate(0.0, 0.0, -height / 2.0);
    match kind {
        CutKind::Simple => body,
        CutKind::Cherry => body.union(&cherry_protrusions(size, height)),
    }
}

/// A `thickness` plate from `outline` with one switch hole at every point.
/// Holes are cut in 2D; for cherry holes the clip reliefs are then cut from
/// a cutter body centred at `cutter_z`.
pub fn cut_plate(
    outline: &Sketch,
    kind: CutKind,
    size: Real,
    thickness: Real,
    positions: &[Point2<Real>],
    cutter_z: Real,
) -> Mesh {
    let holes = cut_profile(kind, size).push(positions);
    let plate = outline.difference(&holes).extrude(thickness);
    match kind {
        CutKind::Simple => plate,
        CutKind::Cherry => {
            let reliefs = copies_at(&cherry_protrusions(size, thickness + 2.0), positions)
                .translate(0.0, 0.0, cutter_z);
            plate.difference(&reliefs)
        },
    }
}
