//! Oriented planes and the four-way polygon classification used by the BSP tree

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use nalgebra::{Point3, Vector3};

// Plane classification bits; `FRONT | BACK == SPANNING`.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// The four buckets produced by [`Plane::split_polygon`].
pub type SplitResult = (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>);

impl Plane {
    /// Build a plane from a (possibly non-unit) normal and offset. The pair is
    /// rescaled so the stored normal has unit length.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len > Real::EPSILON {
            Plane {
                normal: normal / len,
                w: w / len,
            }
        } else {
            Plane { normal, w }
        }
    }

    /// Plane through three points, counter-clockwise seen from the front.
    /// Returns `None` when the points are collinear.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len <= Real::EPSILON {
            return None;
        }
        let n = n / len;
        Some(Plane {
            normal: n,
            w: n.dot(&a.coords),
        })
    }

    /// Best-fit plane of a closed loop (Newell's method). Robust against
    /// nearly collinear leading vertices.
    pub fn from_loop(points: &[Point3<Real>]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let mut n = Vector3::<Real>::zeros();
        let mut centroid = Vector3::<Real>::zeros();
        for (i, cur) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            n.x += (cur.y - next.y) * (cur.z + next.z);
            n.y += (cur.z - next.z) * (cur.x + next.x);
            n.z += (cur.x - next.x) * (cur.y + next.y);
            centroid += cur.coords;
        }
        let len = n.norm();
        if len <= Real::EPSILON {
            return None;
        }
        let n = n / len;
        let centroid = centroid / points.len() as Real;
        Some(Plane {
            normal: n,
            w: n.dot(&centroid),
        })
    }

    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    pub fn offset(&self) -> Real {
        self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as FRONT, BACK or COPLANAR within [`tolerance`].
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let d = self.signed_distance(point);
        let eps = tolerance();
        if d > eps {
            FRONT
        } else if d < -eps {
            BACK
        } else {
            COPLANAR
        }
    }

    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane.
    ///
    /// Returns `(coplanar_front, coplanar_back, front, back)`. Coplanar
    /// polygons go to the front bucket when they face the same way as the
    /// plane. Spanning polygons are cut in two; each piece keeps the source
    /// polygon's plane.
    pub fn split_polygon(&self, polygon: &Polygon) -> SplitResult {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if ti != BACK {
                        split_front.push(vi.clone());
                    }
                    if ti != FRONT {
                        split_back.push(vi.clone());
                    }

                    if (ti | tj) == SPANNING {
                        let denom = self.normal.dot(&(vj.pos - vi.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.pos.coords)) / denom;
                            let v = vi.interpolate(vj, t);
                            split_front.push(v.clone());
                            split_back.push(v);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
