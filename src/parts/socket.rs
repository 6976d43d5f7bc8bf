//! Turned-pin DIL socket

use crate::assembly::{Assembly, Color};
use crate::errors::{CadError, CadResult};
use crate::float_types::{PIN_PITCH, Real};
use crate::mesh::Mesh;
use crate::mesh::shapes::{cylinder, frustum};
use crate::parts::{along_y, block, copies_at};
use crate::placement::{Location, rarray};
use crate::sketch::Sketch;
use crate::traits::CSG;

const LEG_ROW_SPACING: Real = 14.0;
const HOLE_ROW_SPACING: Real = 13.6;
const BODY_HEIGHT: Real = 2.8;
const BAR_DEPTH: Real = 2.8;
const BAR_WIDTH: Real = 11.0;
const BAR_HEIGHT: Real = 1.8;

/// A DIL socket with `pins` pins in each of its two rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Socket {
    pub pins: usize,
    pub segments: usize,
}

impl Socket {
    pub fn new(pins: usize) -> Self {
        Socket { pins, segments: 16 }
    }

    fn check(&self) -> CadResult<()> {
        CadError::check_positive("pins per row", self.pins as Real)
    }

    fn half_length(&self) -> Real {
        PIN_PITCH * self.pins as Real / 2.0
    }

    /// y of the two end bars
    fn bar_y(&self) -> Real {
        (PIN_PITCH * self.pins as Real - BAR_DEPTH) / 2.0
    }

    /// Every pin: a thin leg with a wider collar on top. The collar tops out
    /// at z = 4.5.
    pub fn legs(&self) -> CadResult<Mesh> {
        self.check()?;
        let leg = cylinder(0.25, 3.2, self.segments);
        let collar = cylinder(1.35 / 2.0, 1.3, self.segments).translate(0.0, 0.0, 3.2);
        let pin = leg.union(&collar);
        Ok(copies_at(&pin, &rarray(LEG_ROW_SPACING, PIN_PITCH, 2, self.pins)))
    }

    /// The plastic body, standing on z = 0.
    pub fn body(&self) -> CadResult<Mesh> {
        self.check()?;
        let half = self.half_length();
        let yb = self.bar_y();

        // Each side bar with its inner top edge chamfered 0.45
        let right = Sketch::polygon(&[[4.51, 0.0], [7.99, 0.0], [7.99, BODY_HEIGHT], [4.96, BODY_HEIGHT], [4.51, 2.35]]);
        let left = Sketch::polygon(&[[-7.99, 0.0], [-4.51, 0.0], [-4.51, 2.35], [-4.96, BODY_HEIGHT], [-7.99, BODY_HEIGHT]]);
        let bars = along_y(&right.union(&left), -half, half);

        let end_bar = |y: Real| {
            block(
                (-BAR_WIDTH / 2.0, BAR_WIDTH / 2.0),
                (y - BAR_DEPTH / 2.0, y + BAR_DEPTH / 2.0),
                (0.0, BAR_HEIGHT),
            )
        };
        let mut body = bars.union(&end_bar(yb)).union(&end_bar(-yb));
        if self.pins > 6 {
            body = body.union(&end_bar(0.0));
        }

        let peg = cylinder(1.48 / 2.0, 2.6, self.segments);
        for y in [yb, -yb] {
            body = body.union(&peg.translate(-3.3, y, 0.0));
        }

        let hole_positions = rarray(HOLE_ROW_SPACING, PIN_PITCH, 2, self.pins);
        let hole = cylinder(0.5, BODY_HEIGHT + 2.0, self.segments).translate(0.0, 0.0, -1.0);
        let countersink = frustum(0.5, 1.05, 0.55, self.segments).translate(0.0, 0.0, 2.35);
        let cutters = copies_at(&hole.union(&countersink), &hole_positions);

        // Polarity notch in the +Y end face, 6.5 in from the -X side
        let polarity = cylinder(2.3 / 2.0, BODY_HEIGHT + 2.0, self.segments).translate(-7.99 + 6.5, half, -1.0);

        Ok(body.difference(&cutters).difference(&polarity))
    }

    pub fn pin_count(&self) -> usize {
        2 * self.pins
    }

    /// Pins at the origin, body raised to the top of the collars. The pin
    /// count is kept as the assembly description.
    pub fn assembly(&self) -> CadResult<Assembly> {
        let legs = self.legs()?;
        let lift = legs.bounding_box().maxs.z;
        let mut asm = Assembly::new("Lathed DIL socket by qwelyt").with_description(self.pin_count().to_string());
        asm.add("pins", legs, Color::BRASS, Location::identity())?;
        asm.add("body", self.body()?, Color::rgba(0.1, 0.1, 0.1, 1.0), Location::translation(0.0, 0.0, lift))?;
        Ok(asm)
    }

    /// e.g. `DIL_socket_24pins`
    pub fn file_stem(&self) -> String {
        format!("DIL_socket_{}pins", self.pin_count())
    }
}

/// The socket assembly for `pins` pins per row.
pub fn socket(pins: usize) -> CadResult<Assembly> {
    Socket::new(pins).assembly()
}
