//! Keycaps

use crate::errors::{CadError, CadResult};
use crate::float_types::{DEFAULT_SEGMENTS, Real};
use crate::mesh::Mesh;
use crate::mesh::shapes::sphere;
use crate::sketch::{EdgeTreatment, Sketch};
use crate::traits::CSG;
use nalgebra::{Point3, Vector3};

/// Corner treatment of a cap outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerOp {
    #[default]
    Chamfer,
    Fillet,
    None,
}

/// Stem profile. Only the cross (MX) stem exists for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StemType {
    #[default]
    Cherry,
}

/// Keycap generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    pub segments: usize,
}

impl Default for Cap {
    fn default() -> Self {
        Cap {
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl Cap {
    /// A centred `width × depth` rectangle with every corner treated by `delta`.
    pub fn srect(&self, width: Real, depth: Real, delta: Real, op: CornerOp) -> Sketch {
        let rect = Sketch::rectangle(width, depth);
        match op {
            CornerOp::Chamfer => rect.chamfer_corners(delta),
            CornerOp::Fillet => rect.fillet_corners(delta, self.segments),
            CornerOp::None => rect,
        }
    }

    /// Loft from a `width × depth` outline at z = 0 to one grown by `diff`
    /// at z = `height`.
    #[allow(clippy::too_many_arguments)]
    pub fn lofted_box(
        &self,
        width: Real,
        depth: Real,
        height: Real,
        diff: Real,
        delta_a: Real,
        delta_b: Real,
        op: CornerOp,
    ) -> CadResult<Mesh> {
        let a = self.srect(width, depth, delta_a, op);
        let b = self.srect(width + diff, depth + diff, delta_b, op);
        a.loft(&b, height)
    }

    /// Loft between two circles.
    pub fn tapered_cylinder(&self, width_a: Real, width_b: Real, height: Real) -> CadResult<Mesh> {
        let a = Sketch::circle(width_a / 2.0, self.segments);
        let b = Sketch::circle(width_b / 2.0, self.segments);
        a.loft(&b, height)
    }

    /// Round stem of diameter `d` with a cross slot, chamfered at the bottom.
    pub fn stem(&self, h: Real, d: Real, stem: StemType) -> CadResult<Mesh> {
        CadError::check_positive("stem height", h)?;
        let profile = match stem {
            StemType::Cherry => Sketch::circle(d / 2.0, self.segments)
                .difference(&Sketch::rectangle(1.2, 4.2))
                .difference(&Sketch::rectangle(4.2, 1.2)),
        };
        profile.extrude_with_edges(h, EdgeTreatment::Chamfer(0.25), EdgeTreatment::None)
    }

    /// Rib next to the stem that ties it to the inner wall. The top leans
    /// with the wall, which shrinks by `diff` over the cap height.
    pub fn stem_support(&self, height: Real, width: Real, diff: Real, _stem_d: Real) -> CadResult<Mesh> {
        let w = width / 3.0;
        let d = diff / 4.0;
        let a = self.srect(w, 1.0, 0.0, CornerOp::None);
        let b = self.srect(w + d, 1.0, 0.0, CornerOp::None).translate_2d(-d / 2.0, 0.0);
        a.loft(&b, height)
    }

    /// Row 3 cap: 19 mm footprint, 8 mm tall, spherical dish, hollow with a
    /// cross stem. Centred on z = 0.
    pub fn row3(&self) -> CadResult<Mesh> {
        let h = 8.0;
        let ih = h - 2.4;
        let wd = 19.0;
        let iwd = wd - 3.0;
        let diff = -7.0;
        let stem_d = 5.6;
        let sphere_r = wd * 1.6;
        let rounding = 0.7;

        let outer = self.srect(wd, wd, rounding, CornerOp::Fillet);
        let outer_top = self.srect(wd + diff, wd + diff, rounding, CornerOp::Fillet);
        let body = outer.loft_with_edges(
            &outer_top,
            h,
            EdgeTreatment::Fillet(rounding),
            EdgeTreatment::Fillet(rounding),
        )?;

        let hollow = self.lofted_box(iwd, iwd, ih, diff, 0.0, 0.0, CornerOp::None)?;
        let dish = sphere(sphere_r, self.segments.max(48), self.segments.max(48) / 2)
            .translate(0.0, 0.0, h + sphere_r - 1.0);
        let stem = self.stem(ih, stem_d, StemType::Cherry)?;
        let support = self
            .stem_support(ih, iwd, diff, stem_d)?
            .translate(-stem_d + 0.1, 0.0, 0.0);

        let cap = body
            .difference(&dish)
            .difference(&hollow)
            .union(&stem)
            .union(&support);
        tracing::debug!(polygons = cap.polygons.len(), "row 3 cap");
        Ok(cap.translate(0.0, 0.0, -h / 2.0))
    }

    /// The orientation the cap is printed in: standing on its side.
    pub fn print_orientation(cap: &Mesh) -> Mesh {
        cap.rotate_about_axis(Point3::origin(), Vector3::y(), -90.0)
    }
}
