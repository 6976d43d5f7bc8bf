//! The Waddle: a 12 × 4 ortholinear case with a rounded tray and frame

use crate::assembly::{Assembly, Color};
use crate::errors::CadResult;
use crate::float_types::{DEFAULT_SEGMENTS, Real};
use crate::mesh::Mesh;
use crate::parts::pro_micro::{ProMicro, ProMicroVariant};
use crate::parts::reference::ReferenceModels;
use crate::parts::socket::Socket;
use crate::parts::{CutKind, block, copies_at, cut_body, cut_plate};
use crate::placement::{Location, rarray};
use crate::sketch::{EdgeTreatment, Sketch};
use crate::traits::CSG;
use nalgebra::{Point2, Point3, Vector3};
use serde::Deserialize;
use std::time::Instant;

/// Pocket row for the controller, measured from the case centre line.
const POCKET_Y: Real = 9.5;
/// Height of the USB hole centre above the tray floor.
const USB_Z: Real = 5.6;

/// One part of a keyboard assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum KeyboardPart {
    Bottom,
    Plate,
    Switches,
    Caps,
    ProMicro,
    Socket,
    Top,
    MagnetsTop,
    MagnetsBottom,
}

impl KeyboardPart {
    pub const ALL: [KeyboardPart; 9] = [
        KeyboardPart::Bottom,
        KeyboardPart::Plate,
        KeyboardPart::Switches,
        KeyboardPart::Caps,
        KeyboardPart::ProMicro,
        KeyboardPart::Socket,
        KeyboardPart::Top,
        KeyboardPart::MagnetsTop,
        KeyboardPart::MagnetsBottom,
    ];

    /// The name the part gets in the assembly.
    pub fn name(&self) -> &'static str {
        match self {
            KeyboardPart::Bottom => "bottom",
            KeyboardPart::Plate => "plate",
            KeyboardPart::Switches => "switches",
            KeyboardPart::Caps => "caps",
            KeyboardPart::ProMicro => "proMicro",
            KeyboardPart::Socket => "socket",
            KeyboardPart::Top => "top",
            KeyboardPart::MagnetsTop => "magnetsTop",
            KeyboardPart::MagnetsBottom => "magnetsBottom",
        }
    }
}

/// Which parts go into a keyboard assembly. Nothing is selected by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardParts {
    pub bottom: bool,
    pub plate: bool,
    pub switches: bool,
    pub caps: bool,
    pub pro_micro: bool,
    pub socket: bool,
    pub top: bool,
    pub magnets_top: bool,
    pub magnets_bottom: bool,
}

impl KeyboardParts {
    pub fn all() -> Self {
        KeyboardPart::ALL.into_iter().collect()
    }

    pub fn contains(&self, part: KeyboardPart) -> bool {
        match part {
            KeyboardPart::Bottom => self.bottom,
            KeyboardPart::Plate => self.plate,
            KeyboardPart::Switches => self.switches,
            KeyboardPart::Caps => self.caps,
            KeyboardPart::ProMicro => self.pro_micro,
            KeyboardPart::Socket => self.socket,
            KeyboardPart::Top => self.top,
            KeyboardPart::MagnetsTop => self.magnets_top,
            KeyboardPart::MagnetsBottom => self.magnets_bottom,
        }
    }

    fn set(&mut self, part: KeyboardPart) {
        let flag = match part {
            KeyboardPart::Bottom => &mut self.bottom,
            KeyboardPart::Plate => &mut self.plate,
            KeyboardPart::Switches => &mut self.switches,
            KeyboardPart::Caps => &mut self.caps,
            KeyboardPart::ProMicro => &mut self.pro_micro,
            KeyboardPart::Socket => &mut self.socket,
            KeyboardPart::Top => &mut self.top,
            KeyboardPart::MagnetsTop => &mut self.magnets_top,
            KeyboardPart::MagnetsBottom => &mut self.magnets_bottom,
        };
        *flag = true;
    }

    pub fn is_empty(&self) -> bool {
        !KeyboardPart::ALL.iter().any(|p| self.contains(*p))
    }
}

impl FromIterator<KeyboardPart> for KeyboardParts {
    fn from_iter<I: IntoIterator<Item = KeyboardPart>>(iter: I) -> Self {
        let mut parts = KeyboardParts::default();
        for part in iter {
            parts.set(part);
        }
        parts
    }
}

/// The controller board as it sits in a case: turned to run along X, board
/// top at z = 0.
pub fn mounted_pro_micro() -> CadResult<Mesh> {
    Ok(ProMicro::new(ProMicroVariant::C)
        .assembly()?
        .to_compound()
        .rotate(0.0, 0.0, 90.0)
        .translate(0.0, 0.0, -1.5))
}

/// The 24 pin socket upside down and turned to run along X.
pub fn mounted_socket() -> CadResult<Mesh> {
    Ok(Socket::new(12)
        .assembly()?
        .to_compound()
        .rotate(0.0, 180.0, 0.0)
        .rotate(0.0, 0.0, 90.0))
}

/// Parameters of the Waddle case. Every field can be overridden from the
/// `[waddle]` table of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Waddle {
    /// Key pitch
    pub space: Real,
    /// Side of the square switch hole
    pub cherry_cut: Real,
    pub cols: usize,
    pub rows: usize,
    /// Rim around the key grid
    pub lip: Real,
    pub fillet: Real,
    pub bottom_height: Real,
    pub top_height: Real,
    pub plate_thickness: Real,
    pub segments: usize,
}

impl Default for Waddle {
    fn default() -> Self {
        Waddle {
            space: 19.05,
            cherry_cut: 14.05,
            cols: 12,
            rows: 4,
            lip: 20.0,
            fillet: 3.0,
            bottom_height: 13.0,
            top_height: 9.0,
            plate_thickness: 3.0,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl Waddle {
    pub fn grid_width(&self) -> Real {
        self.cols as Real * self.space
    }

    pub fn grid_depth(&self) -> Real {
        self.rows as Real * self.space
    }

    pub fn width(&self) -> Real {
        self.grid_width() + self.lip
    }

    pub fn depth(&self) -> Real {
        self.grid_depth() + self.lip
    }

    pub fn plate_width(&self) -> Real {
        self.width() - self.lip / 2.0
    }

    pub fn plate_depth(&self) -> Real {
        self.depth() - self.lip / 2.0
    }

    /// Key centres.
    pub fn key_positions(&self) -> Vec<Point2<Real>> {
        rarray(self.space, self.space, self.cols, self.rows)
    }

    fn rounded(&self, width: Real, depth: Real) -> Sketch {
        Sketch::rectangle(width, depth).fillet_corners(self.fillet, self.segments)
    }

    /// The tray: rounded outside and bottom edges, a shelf for the plate, a
    /// hollow, the controller pocket and a USB hole through the -X wall.
    pub fn bottom(&self) -> CadResult<Mesh> {
        let start = Instant::now();
        let h = self.bottom_height;
        let shelf_z = h - self.plate_thickness / 1.5;

        let mut tray = self.rounded(self.width(), self.depth()).extrude_with_edges(
            h,
            EdgeTreatment::Fillet(self.fillet),
            EdgeTreatment::None,
        )?;

        let shelf = self
            .rounded(self.plate_width() + 1.0, self.plate_depth() + 1.0)
            .extrude(h - shelf_z + 1.0)
            .translate(0.0, 0.0, shelf_z);
        let hollow = self
            .rounded(self.grid_width(), self.grid_depth())
            .extrude(h - 3.0 + 1.0)
            .translate(0.0, 0.0, 3.0);
        tray = tray.difference(&shelf).difference(&hollow);

        // Controller pocket, measured from the -X edge of the shelf
        let x0 = -(self.plate_width() + 1.0) / 2.0;
        let pocket = |cx: Real, half_x: Real, half_y: Real, z: (Real, Real)| {
            block(
                (x0 + cx - half_x, x0 + cx + half_x),
                (POCKET_Y - half_y, POCKET_Y + half_y),
                z,
            )
        };
        let pockets = [
            // wall cut for the board
            pocket(8.8, 17.5, 5.5, (shelf_z, shelf_z + 5.0)),
            // USB plug room
            pocket(8.8, 17.5, 9.0, (shelf_z, shelf_z + 2.0)),
            // socket reach to the pads
            pocket(14.5, 17.5, 9.5, (shelf_z, shelf_z + 12.0)),
            // inset floor
            pocket(9.0, 18.5, 9.5, (shelf_z - 1.0, shelf_z)),
        ];
        for cut in &pockets {
            tray = tray.difference(cut);
        }

        // USB hole: narrow inside, flaring 15° on its way out through the wall
        let frame = Location::workplane(
            Point3::new(-self.grid_width() / 2.0 + 1.0, POCKET_Y, USB_Z),
            -Vector3::y(),
            -Vector3::x(),
        );
        let usb = Sketch::slot(9.8, 4.1, self.segments)
            .extrude_tapered(12.0, -15.0)?
            .moved(&frame);
        tray = tray.difference(&usb);

        tracing::debug!(elapsed = ?start.elapsed(), polygons = tray.polygons.len(), "waddle bottom");
        Ok(tray)
    }

    /// The frame that sits on the tray: rounded top edges, a shelf on its
    /// underside and a through opening for the keys.
    pub fn top(&self) -> CadResult<Mesh> {
        let h = self.top_height;
        let shelf_depth = self.plate_thickness / 1.5;
        let frame = self.rounded(self.width(), self.depth()).extrude_with_edges(
            h,
            EdgeTreatment::None,
            EdgeTreatment::Fillet(self.fillet),
        )?;
        let shelf = self
            .rounded(self.plate_width() + 1.0, self.plate_depth() + 1.0)
            .extrude(shelf_depth + 1.0)
            .translate(0.0, 0.0, -1.0);
        let opening = Sketch::rectangle(self.grid_width() + 1.0, self.grid_depth() + 1.0)
            .extrude(h + 2.0)
            .translate(0.0, 0.0, -1.0);
        Ok(frame.difference(&shelf).difference(&opening))
    }

    /// One cherry cut-out body, as the plate subtracts it.
    pub fn cherry_cut_body(&self) -> Mesh {
        cut_body(CutKind::Cherry, self.cherry_cut, self.plate_thickness + 2.0)
    }

    pub fn plate(&self) -> Mesh {
        cut_plate(
            &self.rounded(self.plate_width(), self.plate_depth()),
            CutKind::Cherry,
            self.cherry_cut,
            self.plate_thickness,
            &self.key_positions(),
            self.plate_thickness / 2.0 - 0.25,
        )
    }

    pub fn switches(&self, models: &ReferenceModels) -> CadResult<Mesh> {
        Ok(copies_at(&models.switch_mesh()?, &self.key_positions()))
    }

    pub fn caps(&self, models: &ReferenceModels) -> CadResult<Mesh> {
        Ok(copies_at(&models.keycap_mesh()?, &self.key_positions()))
    }

    /// Assemble the selected parts in their stacked positions.
    pub fn keyboard(&self, parts: KeyboardParts, models: &ReferenceModels) -> CadResult<Assembly> {
        let h = self.bottom_height;
        let pm_z = h - 1.5;
        let mut kb = Assembly::new("waddle");

        let socket = mounted_socket()?;
        let pm_x = -self.width() / 2.0 + socket.bounding_box().maxs.x * 1.4;
        let pm_y = self.space / 2.0;

        if parts.bottom {
            kb.add("bottom", self.bottom()?, Color::rgba(0.0, 0.0, 1.0, 1.0), Location::identity())?;
        }
        if parts.plate {
            kb.add(
                "plate",
                self.plate(),
                Color::rgba(1.0, 1.0, 0.0, 1.0),
                Location::translation(0.0, 0.0, h - self.plate_thickness / 2.0),
            )?;
        }
        if parts.switches {
            kb.add(
                "switches",
                self.switches(models)?,
                Color::rgba(0.0, 1.0, 0.0, 1.0),
                Location::translation(0.0, 0.0, h + self.plate_thickness - 0.4),
            )?;
        }
        if parts.caps {
            kb.add(
                "caps",
                self.caps(models)?,
                Color::rgba(1.0, 0.0, 1.0, 1.0),
                Location::translation(0.0, 0.0, h + self.plate_thickness + 9.3),
            )?;
        }
        if parts.pro_micro {
            kb.add(
                "proMicro",
                mounted_pro_micro()?,
                Color::rgba(1.0, 1.0, 0.3, 1.0),
                Location::translation(pm_x - 1.2, pm_y, pm_z - 7.5),
            )?;
        }
        if parts.socket {
            kb.add(
                "socket",
                socket,
                Color::rgba(0.3, 0.5, 0.3, 1.0),
                Location::translation(pm_x, pm_y, pm_z),
            )?;
        }
        if parts.top {
            kb.add("top", self.top()?, Color::rgba(0.0, 1.0, 1.0, 1.0), Location::translation(0.0, 0.0, h))?;
        }
        if parts.magnets_top || parts.magnets_bottom {
            tracing::warn!("the waddle has no magnets; ignoring magnet parts");
        }
        Ok(kb)
    }
}
