//! Ring-level view of a sketch, shared by corner treatments, offsets and lofts

use crate::errors::{CadError, CadResult};
use crate::float_types::{Real, tolerance};
use crate::sketch::Sketch;
use geo::{Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use nalgebra::Point2;

/// An open ring of points (the closing point is implied).
pub type Ring = Vec<Point2<Real>>;

/// One region of a sketch: a counter-clockwise exterior and clockwise holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2<Real>]) -> Real {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<Real>()
        / 2.0
}

/// Vertex average of a ring.
pub fn ring_centroid(ring: &[Point2<Real>]) -> Point2<Real> {
    let n = ring.len().max(1) as Real;
    let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Drop consecutive points closer than the tolerance, including across the seam.
pub fn dedup_ring(ring: Ring) -> Ring {
    let eps = tolerance();
    let mut out: Ring = Vec::with_capacity(ring.len());
    for p in ring {
        if out.last().is_none_or(|q| (q - p).norm() > eps) {
            out.push(p);
        }
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= eps {
        out.pop();
    }
    out
}

fn ring_points(ls: &LineString<Real>) -> Ring {
    let mut pts: Ring = ls.0.iter().map(|c| Point2::new(c.x, c.y)).collect();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    dedup_ring(pts)
}

fn to_line_string(ring: &[Point2<Real>]) -> LineString<Real> {
    LineString::new(ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

impl Profile {
    /// Exterior first, then every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    pub fn centroid(&self) -> Point2<Real> {
        ring_centroid(&self.exterior)
    }

    /// Apply `f` to every ring; `f` receives `true` for holes.
    pub fn map_rings(&self, mut f: impl FnMut(&Ring, bool) -> Ring) -> Profile {
        Profile {
            exterior: f(&self.exterior, false),
            holes: self.holes.iter().map(|h| f(h, true)).collect(),
        }
    }

    pub fn to_geo(&self) -> GeoPolygon<Real> {
        GeoPolygon::new(
            to_line_string(&self.exterior),
            self.holes.iter().map(|h| to_line_string(h)).collect(),
        )
    }
}

impl Sketch {
    /// The regions of this sketch as point rings, exteriors counter-clockwise
    /// and holes clockwise.
    pub fn profiles(&self) -> Vec<Profile> {
        self.geometry
            .0
            .iter()
            .filter_map(|poly| {
                let mut exterior = ring_points(poly.exterior());
                if exterior.len() < 3 {
                    return None;
                }
                if signed_area(&exterior) < 0.0 {
                    exterior.reverse();
                }
                let holes = poly
                    .interiors()
                    .iter()
                    .map(ring_points)
                    .filter(|h| h.len() >= 3)
                    .map(|mut h| {
                        if signed_area(&h) > 0.0 {
                            h.reverse();
                        }
                        h
                    })
                    .collect();
                Some(Profile { exterior, holes })
            })
            .collect()
    }

    /// Rebuild a sketch from rings, keeping their vertex order as given.
    pub fn from_profiles(profiles: &[Profile]) -> Sketch {
        Sketch {
            geometry: MultiPolygon::new(profiles.iter().map(Profile::to_geo).collect()),
        }
    }

    /// Apply `f` to every ring of every region.
    pub fn map_rings(&self, mut f: impl FnMut(&Ring, bool) -> Ring) -> Sketch {
        let profiles: Vec<Profile> = self
            .profiles()
            .iter()
            .map(|p| p.map_rings(&mut f))
            .collect();
        Sketch::from_profiles(&profiles)
    }

    /// Point-wise blend between this sketch (`t = 0`) and `other` (`t = 1`).
    /// Both need the same ring structure.
    pub fn lerp(&self, other: &Sketch, t: Real) -> CadResult<Sketch> {
        let a = self.profiles();
        let b = pair_profiles(&a, &other.profiles())?;
        let blended: Vec<Profile> = a.iter().zip(&b).map(|(pa, pb)| lerp_profile(pa, pb, t)).collect();
        Ok(Sketch::from_profiles(&blended))
    }
}

/// Blend two already paired profiles point by point.
pub fn lerp_profile(a: &Profile, b: &Profile, t: Real) -> Profile {
    let mix = |ra: &Ring, rb: &Ring| -> Ring {
        ra.iter()
            .zip(rb)
            .map(|(p, q)| Point2::from(p.coords + (q.coords - p.coords) * t))
            .collect()
    };
    Profile {
        exterior: mix(&a.exterior, &b.exterior),
        holes: a.holes.iter().zip(&b.holes).map(|(ha, hb)| mix(ha, hb)).collect(),
    }
}

/// Rotate `ring` so it lines up with `reference` point for point: the start
/// offset minimising the summed squared distance between corresponding
/// vertices (both rings taken relative to their centroids).
pub fn align_ring(reference: &[Point2<Real>], ring: &[Point2<Real>]) -> Ring {
    let n = ring.len();
    if n == 0 || n != reference.len() {
        return ring.to_vec();
    }
    let ca = ring_centroid(reference);
    let cb = ring_centroid(ring);

    let mut best_shift = 0;
    let mut best_cost = Real::MAX;
    for shift in 0..n {
        let cost: Real = (0..n)
            .map(|i| ((ring[(i + shift) % n] - cb) - (reference[i] - ca)).norm_squared())
            .sum();
        if cost < best_cost {
            best_cost = cost;
            best_shift = shift;
        }
    }
    (0..n).map(|i| ring[(i + best_shift) % n]).collect()
}

fn check_ring(what: &str, a: &[Point2<Real>], b: &[Point2<Real>]) -> CadResult<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(CadError::ProfileMismatch(format!(
            "{what} has {} vertices on one side and {} on the other",
            a.len(),
            b.len()
        )))
    }
}

/// Pick, for every profile of `a`, the profile of `b` with the nearest
/// centroid, and align its rings to `a`'s.
pub fn pair_profiles(a: &[Profile], b: &[Profile]) -> CadResult<Vec<Profile>> {
    if a.len() != b.len() {
        return Err(CadError::ProfileMismatch(format!(
            "{} regions on one side and {} on the other",
            a.len(),
            b.len()
        )));
    }

    fn nearest<'a>(target: Point2<Real>, pool: &'a [Ring], used: &[bool]) -> Option<(usize, &'a Ring)> {
        pool.iter()
            .enumerate()
            .filter(|(i, _)| !used[*i])
            .min_by(|(_, x), (_, y)| {
                let dx = (ring_centroid(x) - target).norm_squared();
                let dy = (ring_centroid(y) - target).norm_squared();
                dx.total_cmp(&dy)
            })
    }

    let exteriors: Vec<Ring> = b.iter().map(|p| p.exterior.clone()).collect();
    let mut used = vec![false; b.len()];
    let mut paired = Vec::with_capacity(a.len());

    for pa in a {
        let (idx, _) = nearest(pa.centroid(), &exteriors, &used)
            .ok_or_else(|| CadError::ProfileMismatch("no region left to pair".into()))?;
        used[idx] = true;
        let pb = &b[idx];

        check_ring("exterior ring", &pa.exterior, &pb.exterior)?;
        if pa.holes.len() != pb.holes.len() {
            return Err(CadError::ProfileMismatch(format!(
                "{} holes on one side and {} on the other",
                pa.holes.len(),
                pb.holes.len()
            )));
        }

        let mut hole_used = vec![false; pb.holes.len()];
        let mut holes = Vec::with_capacity(pa.holes.len());
        for ha in &pa.holes {
            let (hidx, hb) = nearest(ring_centroid(ha), &pb.holes, &hole_used)
                .ok_or_else(|| CadError::ProfileMismatch("no hole left to pair".into()))?;
            hole_used[hidx] = true;
            check_ring("hole ring", ha, hb)?;
            holes.push(align_ring(ha, hb));
        }

        paired.push(Profile {
            exterior: align_ring(&pa.exterior, &pb.exterior),
            holes,
        });
    }
    Ok(paired)
}
