//! Extrusions and lofts from a `Sketch` into a `Mesh`
//!
//! Everything here goes through [`loft_profiles`]: a stack of sections, each a
//! list of [`Profile`]s at some height, stitched together ring by ring with
//! wall quads and closed with ear-cut caps. A plain extrusion is a two
//! section loft of the same profiles; edge treatments add extra sections near
//! the ends, each one an inset of the blended profile.

use crate::errors::{CadError, CadResult};
use crate::float_types::{FRAC_PI_2, Real, tolerance};
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::sketch::Sketch;
use crate::sketch::corners::offset_profile;
use crate::sketch::profile::{Profile, Ring, lerp_profile, pair_profiles};
use crate::traits::CSG;
use geo::TriangulateEarcut;
use nalgebra::{Point2, Point3};

/// Quarter-circle steps used for a filleted end.
const FILLET_STEPS: usize = 6;

/// How the edge between a loft's side walls and one of its end faces is
/// finished.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EdgeTreatment {
    #[default]
    None,
    /// Quarter-round of the given radius.
    Fillet(Real),
    /// 45° bevel of the given size.
    Chamfer(Real),
}

impl EdgeTreatment {
    /// How far the treatment reaches along the loft axis.
    pub fn depth(&self) -> Real {
        match *self {
            EdgeTreatment::None => 0.0,
            EdgeTreatment::Fillet(r) | EdgeTreatment::Chamfer(r) => r.max(0.0),
        }
    }

    fn with_depth(self, depth: Real) -> Self {
        match self {
            EdgeTreatment::None => EdgeTreatment::None,
            EdgeTreatment::Fillet(_) => EdgeTreatment::Fillet(depth),
            EdgeTreatment::Chamfer(_) => EdgeTreatment::Chamfer(depth),
        }
    }

    /// `(distance from the end face, inset)` pairs, starting on the end face.
    fn samples(&self) -> Vec<(Real, Real)> {
        match *self {
            _ if self.depth() <= 0.0 => vec![(0.0, 0.0)],
            EdgeTreatment::Fillet(r) => (0..=FILLET_STEPS)
                .map(|k| {
                    let phi = FRAC_PI_2 * k as Real / FILLET_STEPS as Real;
                    (r * (1.0 - phi.cos()), r * (1.0 - phi.sin()))
                })
                .collect(),
            EdgeTreatment::Chamfer(d) => vec![(0.0, d), (d, 0.0)],
            EdgeTreatment::None => vec![(0.0, 0.0)],
        }
    }
}

impl Sketch {
    /// Straight extrusion along Z. A negative height extrudes downwards.
    /// An empty sketch or a zero height gives an empty mesh.
    pub fn extrude(&self, height: Real) -> Mesh {
        let profiles = self.profiles();
        if profiles.is_empty() || height.abs() <= tolerance() {
            return Mesh::new();
        }
        let (z0, z1) = if height > 0.0 { (0.0, height) } else { (height, 0.0) };
        // identical sections are aligned already
        stitch(&[(profiles.clone(), z0), (profiles, z1)])
    }

    /// Extrusion whose walls lean inwards by `angle_deg` (outwards for a
    /// negative angle).
    pub fn extrude_tapered(&self, height: Real, angle_deg: Real) -> CadResult<Mesh> {
        CadError::check_positive("extrusion height", height.abs())?;
        let inset = height.abs() * angle_deg.to_radians().tan();
        let base = self.profiles();
        let top = base
            .iter()
            .map(|p| offset_profile(p, -inset))
            .collect::<CadResult<Vec<_>>>()?;
        loft_profiles(vec![(base, 0.0), (top, height)])
    }

    /// Ruled loft from this sketch at `z = 0` to `top` at `z = height`. Both
    /// must have the same regions, holes and vertex counts.
    pub fn loft(&self, top: &Sketch, height: Real) -> CadResult<Mesh> {
        CadError::check_positive("loft height", height.abs())?;
        loft_profiles(vec![(self.profiles(), 0.0), (top.profiles(), height)])
    }

    /// Extrusion with a finished edge at the start face (`z = 0`) and/or the
    /// end face (`z = height`).
    pub fn extrude_with_edges(&self, height: Real, start: EdgeTreatment, end: EdgeTreatment) -> CadResult<Mesh> {
        self.loft_with_edges(self, height, start, end)
    }

    /// Loft towards `top` with finished edges. When the two treatments are
    /// deeper than the loft is tall they are scaled down together.
    pub fn loft_with_edges(
        &self,
        top: &Sketch,
        height: Real,
        start: EdgeTreatment,
        end: EdgeTreatment,
    ) -> CadResult<Mesh> {
        let total = height.abs();
        CadError::check_positive("loft height", total)?;
        let direction = height.signum();

        let (mut ds, mut de) = (start.depth(), end.depth());
        let limit = 0.999 * total;
        if ds + de > limit {
            let k = limit / (ds + de);
            ds *= k;
            de *= k;
        }
        let (start, end) = (start.with_depth(ds), end.with_depth(de));

        let base = self.profiles();
        let target = pair_profiles(&base, &top.profiles())?;

        let mut stations = start.samples();
        stations.extend(end.samples().into_iter().rev().map(|(dz, inset)| (total - dz, inset)));

        let mut sections = Vec::with_capacity(stations.len());
        for (dz, inset) in stations {
            let t = dz / total;
            let profiles = base
                .iter()
                .zip(&target)
                .map(|(a, b)| offset_profile(&lerp_profile(a, b, t), -inset))
                .collect::<CadResult<Vec<_>>>()?;
            sections.push((profiles, direction * dz));
        }
        loft_profiles(sections)
    }

    /// Loft through several sketches, each at its own height. Heights must
    /// be strictly monotonic.
    pub fn loft_sections(sections: &[(Sketch, Real)]) -> CadResult<Mesh> {
        loft_profiles(sections.iter().map(|(s, z)| (s.profiles(), *z)).collect())
    }
}

/// Stitch `(profiles, z)` sections into a closed solid.
pub fn loft_profiles(mut sections: Vec<(Vec<Profile>, Real)>) -> CadResult<Mesh> {
    if sections.len() < 2 {
        return Err(CadError::DegenerateProfile(
            "a loft needs at least two sections".into(),
        ));
    }
    if sections[0].1 > sections[sections.len() - 1].1 {
        sections.reverse();
    }
    for pair in sections.windows(2) {
        let step = pair[1].1 - pair[0].1;
        if step <= tolerance() {
            return Err(CadError::InvalidDimension {
                name: "section spacing",
                value: step,
            });
        }
    }
    for k in 1..sections.len() {
        let aligned = pair_profiles(&sections[k - 1].0, &sections[k].0)?;
        sections[k].0 = aligned;
    }
    Ok(stitch(&sections))
}

/// Walls and caps through aligned sections in ascending z.
fn stitch(sections: &[(Vec<Profile>, Real)]) -> Mesh {
    let mut polygons = Vec::new();
    for pair in sections.windows(2) {
        let ((lower, z0), (upper, z1)) = (&pair[0], &pair[1]);
        for (pa, pb) in lower.iter().zip(upper) {
            for (ra, rb) in pa.rings().zip(pb.rings()) {
                wall(ra, *z0, rb, *z1, &mut polygons);
            }
        }
    }

    let (bottom, z_bottom) = &sections[0];
    let (top, z_top) = &sections[sections.len() - 1];
    for profile in bottom {
        cap(profile, *z_bottom, false, &mut polygons);
    }
    for profile in top {
        cap(profile, *z_top, true, &mut polygons);
    }

    tracing::trace!(sections = sections.len(), polygons = polygons.len(), "lofted");
    Mesh::from_polygons(polygons)
}

fn at(p: &Point2<Real>, z: Real) -> Point3<Real> {
    Point3::new(p.x, p.y, z)
}

/// Side faces between two aligned rings. Exteriors run counter-clockwise and
/// holes clockwise, so `(a_i, a_j, b_j, b_i)` faces away from the material.
fn wall(lower: &Ring, z0: Real, upper: &Ring, z1: Real, out: &mut Vec<Polygon>) {
    let n = lower.len();
    let eps = tolerance();
    for i in 0..n {
        let j = (i + 1) % n;
        let quad = [at(&lower[i], z0), at(&lower[j], z0), at(&upper[j], z1), at(&upper[i], z1)];
        let Some(plane) = Plane::from_loop(&quad) else {
            continue;
        };
        if quad.iter().all(|p| plane.signed_distance(p).abs() <= eps) {
            out.extend(Polygon::from_points(&quad));
        } else {
            out.extend(Polygon::from_points(&[quad[0], quad[1], quad[2]]));
            out.extend(Polygon::from_points(&[quad[0], quad[2], quad[3]]));
        }
    }
}

/// Ear-cut cap of one region at height `z`, facing +Z when `up`.
fn cap(profile: &Profile, z: Real, up: bool, out: &mut Vec<Polygon>) {
    let triangulation = profile.to_geo().earcut_triangles_raw();
    let vertices = triangulation.vertices;
    let point = |i: usize| Point2::new(vertices[2 * i], vertices[2 * i + 1]);

    for tri in triangulation.triangle_indices.chunks_exact(3) {
        let (a, b, c) = (point(tri[0]), point(tri[1]), point(tri[2]));
        let ccw = (b - a).perp(&(c - a)) > 0.0;
        let mut pts = [at(&a, z), at(&b, z), at(&c, z)];
        if ccw != up {
            pts.swap(1, 2);
        }
        out.extend(Polygon::from_points(&pts));
    }
}
