//! Arduino Pro Micro stand-in: board, USB receptacle and component blocks

use crate::assembly::{Assembly, Color};
use crate::errors::CadResult;
use crate::float_types::{DEFAULT_SEGMENTS, PIN_PITCH, Real};
use crate::mesh::Mesh;
use crate::parts::{along_y, block};
use crate::placement::{Location, rarray_aligned};
use crate::sketch::Sketch;
use crate::traits::CSG;
use nalgebra::Point2;
use std::fmt;
use std::str::FromStr;

const BOARD_THICKNESS: Real = 1.5;
/// The USB-C board is longer; its outline is shifted by half the extra length.
const C_SHIFT: Real = 1.9 / 2.0;

/// Board revision, picked by the receptacle it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProMicroVariant {
    Micro,
    #[default]
    C,
    /// Bare board without holes or parts
    Plain,
}

impl FromStr for ProMicroVariant {
    type Err = std::convert::Infallible;

    /// `"micro"` and `"c"` pick those boards; anything else is the plain board.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "micro" => ProMicroVariant::Micro,
            "c" => ProMicroVariant::C,
            _ => ProMicroVariant::Plain,
        })
    }
}

impl fmt::Display for ProMicroVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProMicroVariant::Micro => "micro",
            ProMicroVariant::C => "c",
            ProMicroVariant::Plain => "plain",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProMicro {
    pub variant: ProMicroVariant,
    pub segments: usize,
}

impl ProMicro {
    pub fn new(variant: ProMicroVariant) -> Self {
        ProMicro {
            variant,
            segments: DEFAULT_SEGMENTS,
        }
    }

    fn length(&self) -> Real {
        match self.variant {
            ProMicroVariant::Micro => 33.0,
            ProMicroVariant::C => 34.9,
            ProMicroVariant::Plain => 34.0,
        }
    }

    fn y_shift(&self) -> Real {
        if self.variant == ProMicroVariant::C { C_SHIFT } else { 0.0 }
    }

    /// 18 mm wide board, 1.5 thick, with two rows of twelve Ø1 pin holes.
    pub fn board(&self) -> Mesh {
        let length = self.length();
        let mut outline = Sketch::rectangle(18.0, length);
        if self.variant != ProMicroVariant::Plain {
            let first_row = -length / 2.0 + 0.5 + 0.75;
            let holes: Vec<Point2<Real>> = rarray_aligned(18.0 - 2.0, PIN_PITCH, 2, 12, (true, false))
                .into_iter()
                .map(|p| Point2::new(p.x, p.y + first_row))
                .collect();
            outline = outline.difference(&Sketch::circle(0.5, self.segments.min(16)).push(&holes));
        }
        outline
            .extrude(BOARD_THICKNESS)
            .translate(0.0, self.y_shift(), 0.0)
    }

    /// USB receptacle in its own frame: y = 0 is the board's +Y edge and
    /// z = 0 the board top, where [`ProMicro::assembly`] places it. The
    /// opening faces +Y. The micro shell is centred on the edge (y -3..3);
    /// the USB-C shell sits mostly behind it (y -6.675..0.675).
    /// The plain board has none and yields an empty mesh.
    pub fn port(&self) -> Mesh {
        match self.variant {
            ProMicroVariant::Micro => {
                let shell = Sketch::polygon(&[
                    [-3.5 + 0.8, 0.0],
                    [3.5 - 0.8, 0.0],
                    [3.5, 0.8],
                    [3.5, 2.0],
                    [-3.5, 2.0],
                    [-3.5, 0.8],
                ]);
                let mouth = Sketch::rectangle_at(-3.0, 0.5, 6.0, 1.0);
                along_y(&shell, -3.0, 3.0).difference(&along_y(&mouth, -2.0, 4.0))
            },
            ProMicroVariant::C => {
                let shell = Sketch::rectangle_at(-4.5, 0.0, 9.0, 3.25).fillet_corners(1.0, self.segments);
                let cavity = Sketch::rectangle_at(-4.4, 0.1, 8.8, 3.0).fillet_corners(1.0, self.segments);
                let tongue = Sketch::rectangle_at(-3.5, 1.35, 7.0, 0.5);
                along_y(&shell, -6.675, 0.675)
                    .difference(&along_y(&cavity, -5.325, 1.675))
                    .union(&along_y(&tongue, -6.325, 0.675))
            },
            ProMicroVariant::Plain => Mesh::new(),
        }
    }

    /// Blocks standing in for the MCU and passives, on the board top at z = 0.
    pub fn components(&self) -> Mesh {
        let at = |y: Real, w: Real, d: Real, h: Real| {
            block((-w / 2.0, w / 2.0), (y - d / 2.0, y + d / 2.0), (0.0, h))
        };
        let blocks = match self.variant {
            ProMicroVariant::Micro => {
                let l = self.length();
                vec![
                    at(l / 4.0, 11.0, 3.0, 1.5),
                    at(-l / 9.0, 11.0, 11.0, 1.0),
                    at(-l / 2.7, 11.0, 3.0, 1.0),
                ]
            },
            ProMicroVariant::C => {
                let l = self.length();
                let side = Sketch::rectangle(1.0, 1.8)
                    .push(&[Point2::new(-6.0, l / 2.2), Point2::new(6.0, l / 2.2)])
                    .extrude(0.5);
                vec![
                    side,
                    at(l / 4.0, 9.25, 3.4, 1.25),
                    at(l / 7.0, 11.45, 3.3, 2.0),
                    at(-l / 8.0, 7.5, 7.5, 1.0),
                    at(-l / 2.5, 11.45, 4.0, 1.0),
                ]
            },
            ProMicroVariant::Plain => Vec::new(),
        };
        blocks
            .iter()
            .fold(Mesh::new(), |acc, b| acc.union(b))
            .translate(0.0, self.y_shift(), 0.0)
    }

    pub fn assembly_name(&self) -> String {
        format!("Arduino_Pro_Micro-USB-{}", self.variant)
    }

    /// Board at the origin, receptacle on the +Y edge of the board top, parts
    /// on the board top.
    pub fn assembly(&self) -> CadResult<Assembly> {
        let board = self.board();
        let board_end = board.bounding_box().maxs.y;
        let mut asm = Assembly::new(self.assembly_name());
        asm.add("board", board, Color::rgba(0.1, 0.6, 0.2, 1.0), Location::identity())?;

        let port = self.port();
        if !port.is_empty() {
            asm.add(
                "port",
                port,
                Color::rgba(0.3, 0.5, 1.0, 1.0),
                Location::translation(0.0, board_end, BOARD_THICKNESS),
            )?;
        }
        let components = self.components();
        if !components.is_empty() {
            asm.add(
                "components",
                components,
                Color::rgba(0.3, 0.5, 0.2, 1.0),
                Location::translation(0.0, 0.0, BOARD_THICKNESS),
            )?;
        }
        Ok(asm)
    }

    /// Output file stem, e.g. `proMicro_c` for `proMicro_c.step`.
    pub fn file_stem(&self) -> String {
        format!("proMicro_{}", self.variant)
    }
}

/// Convenience for [`ProMicro::assembly`] at the default resolution.
pub fn pro_micro(variant: ProMicroVariant) -> CadResult<Assembly> {
    ProMicro::new(variant).assembly()
}
