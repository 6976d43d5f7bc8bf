//! Corner chamfers, corner fillets and mitered offsets on sketch rings

use crate::errors::{CadError, CadResult};
use crate::float_types::{PI, Real, TAU, tolerance};
use crate::sketch::Sketch;
use crate::sketch::profile::{Profile, Ring, dedup_ring, signed_area};
use nalgebra::{Point2, Vector2};

/// Vertices turning less than this are treated as part of a curve, not a corner.
const MIN_CORNER_TURN: Real = 25.0 * PI / 180.0;
/// Miter length cap for very sharp corners, as a multiple of the offset.
const MITER_LIMIT: Real = 4.0;
/// Reversed edges shorter than this fraction of the offset count as collapsed.
const COLLAPSE_SLACK: Real = 0.02;

struct Corner {
    u: Vector2<Real>,
    v: Vector2<Real>,
    /// Largest setback that leaves room for the neighbouring corners
    max_setback: Real,
    turn: Real,
}

/// Describe the convex corner at `cur`, or `None` for straight or concave
/// vertices. `orientation` is the sign of the ring's area.
fn convex_corner(prev: Point2<Real>, cur: Point2<Real>, next: Point2<Real>, orientation: Real) -> Option<Corner> {
    let to_prev = prev - cur;
    let to_next = next - cur;
    let (lu, lv) = (to_prev.norm(), to_next.norm());
    if lu <= Real::EPSILON || lv <= Real::EPSILON {
        return None;
    }
    let e_in = -to_prev / lu;
    let e_out = to_next / lv;
    let cross = e_in.x * e_out.y - e_in.y * e_out.x;
    let turn = e_in.dot(&e_out).clamp(-1.0, 1.0).acos();
    if turn < MIN_CORNER_TURN || cross * orientation <= 0.0 {
        return None;
    }
    Some(Corner {
        u: to_prev / lu,
        v: e_out,
        max_setback: 0.5 * lu.min(lv),
        turn,
    })
}

fn treat_ring(ring: &Ring, mut corner_fn: impl FnMut(Point2<Real>, &Corner) -> Vec<Point2<Real>>) -> Ring {
    let n = ring.len();
    if n < 3 {
        return ring.clone();
    }
    let orientation = signed_area(ring).signum();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        match convex_corner(prev, cur, next, orientation) {
            Some(corner) => out.extend(corner_fn(cur, &corner)),
            None => out.push(cur),
        }
    }
    dedup_ring(out)
}

impl Sketch {
    /// Cut every convex corner with a symmetric chamfer of `d`
    /// (`vertices().chamfer(d)`). The setback is capped at half the shorter
    /// adjacent edge.
    pub fn chamfer_corners(&self, d: Real) -> Sketch {
        if d <= 0.0 {
            return self.clone();
        }
        self.map_rings(|ring, _| {
            treat_ring(ring, |cur, c| {
                let t = d.min(c.max_setback);
                vec![cur + c.u * t, cur + c.v * t]
            })
        })
    }

    /// Round every convex corner with radius `r` (`vertices().fillet(r)`).
    /// A radius too large for the adjacent edges shrinks to fit, so a huge
    /// radius on a rectangle yields a slot.
    pub fn fillet_corners(&self, r: Real, segments: usize) -> Sketch {
        if r <= 0.0 {
            return self.clone();
        }
        let segments = segments.max(4);
        self.map_rings(|ring, _| {
            treat_ring(ring, |cur, c| {
                let half = (PI - c.turn) / 2.0;
                let t = (r / half.tan()).min(c.max_setback);
                let radius = t * half.tan();
                let bisector = (c.u + c.v).normalize();
                let center = cur + bisector * (radius / half.sin());

                let start = cur + c.u * t;
                let end = cur + c.v * t;
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                let a1 = (end.y - center.y).atan2(end.x - center.x);
                let mut sweep = a1 - a0;
                if sweep > PI {
                    sweep -= TAU;
                } else if sweep <= -PI {
                    sweep += TAU;
                }

                let steps = ((segments as Real) * c.turn / TAU).ceil().max(1.0) as usize;
                (0..=steps)
                    .map(|k| {
                        let a = a0 + sweep * k as Real / steps as Real;
                        Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
                    })
                    .collect()
            })
        })
    }

    /// Mitered offset: positive `d` grows the regions, negative shrinks them.
    /// Every ring keeps its vertex count, so the result can be lofted against
    /// the original. An inset equal to a fillet radius collapses that arc
    /// onto its corner, which is allowed.
    ///
    /// Fails with [`CadError::DegenerateProfile`] when an inset folds a ring
    /// over itself.
    pub fn offset(&self, d: Real) -> CadResult<Sketch> {
        if d == 0.0 {
            return Ok(self.clone());
        }
        let profiles = self
            .profiles()
            .iter()
            .map(|p| offset_profile(p, d))
            .collect::<CadResult<Vec<Profile>>>()?;
        Ok(Sketch::from_profiles(&profiles))
    }
}

/// Offset every ring of one region; see [`Sketch::offset`].
pub fn offset_profile(profile: &Profile, d: Real) -> CadResult<Profile> {
    if d == 0.0 {
        return Ok(profile.clone());
    }
    let mut failure = None;
    let moved = profile.map_rings(|ring, is_hole| {
        let moved = offset_ring(ring, d);
        if failure.is_none() && !same_shape_sense(ring, &moved, d) {
            failure = Some(format!(
                "offset of {d} collapses a {} ring of {} vertices",
                if is_hole { "hole" } else { "boundary" },
                ring.len()
            ));
        }
        moved
    });
    match failure {
        Some(msg) => Err(CadError::DegenerateProfile(msg)),
        None => Ok(moved),
    }
}

/// Move every vertex along its miter. Exterior rings are counter-clockwise
/// and holes clockwise, so the right-hand edge normal always points away
/// from the material.
pub fn offset_ring(ring: &Ring, d: Real) -> Ring {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let e1 = (cur - prev).normalize();
            let e2 = (next - cur).normalize();
            let n1 = Vector2::new(e1.y, -e1.x);
            let n2 = Vector2::new(e2.y, -e2.x);
            let m = n1 + n2;
            let m = if m.norm() <= 1e-9 { n1 } else { m.normalize() };
            let cosine = m.dot(&n1).max(1.0 / MITER_LIMIT);
            cur + m * (d / cosine)
        })
        .collect()
}

/// True if no edge reversed and the ring kept its winding. Edges that
/// shrink to (almost) nothing are fine: insetting a polygonal arc by its
/// radius overshoots the centre by a hair.
fn same_shape_sense(before: &Ring, after: &Ring, d: Real) -> bool {
    let n = before.len();
    if n < 3 || after.len() != n {
        return false;
    }
    let slack = tolerance() + COLLAPSE_SLACK * d.abs();
    let edges_ok = (0..n).all(|i| {
        let j = (i + 1) % n;
        let moved = after[j] - after[i];
        moved.norm() <= slack || (before[j] - before[i]).dot(&moved) > 0.0
    });
    let a0 = signed_area(before);
    let a1 = signed_area(after);
    edges_ok && a0.signum() == a1.signum() && a1.abs() > Real::EPSILON
}
