//! The alternative Waddle: chamfered shells held together by magnets, with
//! an optional split into two halves for smaller print beds

use crate::aabb::Aabb;
use crate::assembly::{Assembly, Color};
use crate::errors::CadResult;
use crate::float_types::{DEFAULT_SEGMENTS, PIN_PITCH, Real};
use crate::mesh::{Axis, Keep, Mesh};
use crate::parts::reference::ReferenceModels;
use crate::parts::waddle::{KeyboardParts, mounted_pro_micro, mounted_socket};
use crate::parts::{CutKind, along_x, block, copies_at, cut_body, cut_plate};
use crate::placement::{Location, rarray};
use crate::sketch::{EdgeTreatment, Sketch};
use crate::traits::CSG;
use nalgebra::Point2;
use serde::Deserialize;

/// The tray narrows by this much from its top to its floor.
const BOTTOM_DIFF: Real = -7.0;
/// Rounding on the tray's floor edge.
const BOTTOM_FILLET: Real = 1.0;
const TOP_DIFF: Real = -13.0;
const MAGNET_DIAMETER: Real = 5.0;
const MAGNET_HEIGHT: Real = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaddleAlt {
    pub space: Real,
    pub cherry_cut: Real,
    pub cols: usize,
    pub rows: usize,
    pub lip: Real,
    pub fillet: Real,
    pub bottom_height: Real,
    pub top_height: Real,
    pub plate_thickness: Real,
    pub segments: usize,
    /// Build the tray and plate in two halves
    pub split: bool,
}

impl Default for WaddleAlt {
    fn default() -> Self {
        WaddleAlt {
            space: 19.05,
            cherry_cut: 14.05,
            cols: 12,
            rows: 4,
            lip: 25.0,
            fillet: 3.0,
            bottom_height: 6.0,
            top_height: 15.0,
            plate_thickness: 3.0,
            segments: DEFAULT_SEGMENTS,
            split: false,
        }
    }
}

impl WaddleAlt {
    pub fn split_variant() -> Self {
        WaddleAlt {
            split: true,
            ..Default::default()
        }
    }

    pub fn width(&self) -> Real {
        self.cols as Real * self.space + self.lip
    }

    pub fn depth(&self) -> Real {
        self.rows as Real * self.space + self.lip
    }

    pub fn plate_width(&self) -> Real {
        self.width() - self.lip / 1.5
    }

    pub fn plate_depth(&self) -> Real {
        self.depth() - self.lip / 1.2
    }

    pub fn key_positions(&self) -> Vec<Point2<Real>> {
        rarray(self.space, self.space, self.cols, self.rows)
    }

    fn rounded(&self, width: Real, depth: Real) -> Sketch {
        Sketch::rectangle(width, depth).fillet_corners(self.fillet, self.segments)
    }

    /// Loft from a rectangle chamfered by `chamfer_a` to one grown by `diff`
    /// and chamfered by `chamfer_b` at `height`, with `end` on the far edge.
    #[allow(clippy::too_many_arguments)]
    pub fn chamfered_box(
        &self,
        width: Real,
        depth: Real,
        height: Real,
        diff: Real,
        chamfer_a: Real,
        chamfer_b: Real,
        end: EdgeTreatment,
    ) -> CadResult<Mesh> {
        let a = Sketch::rectangle(width, depth).chamfer_corners(chamfer_a);
        let b = Sketch::rectangle(width + diff, depth + diff).chamfer_corners(chamfer_b);
        a.loft_with_edges(&b, height, EdgeTreatment::None, end)
    }

    /// 3 × 2 magnet circles, shared by the tray and the cover.
    pub fn magnet_placement(&self) -> Sketch {
        Sketch::circle(MAGNET_DIAMETER / 2.0, self.segments)
            .push(&rarray(self.width() / 2.3, self.depth() / 1.14, 3, 2))
    }

    pub fn magnets(&self) -> Mesh {
        self.magnet_placement().extrude(MAGNET_HEIGHT)
    }

    /// x of the -X edge of the tray floor
    fn floor_edge(&self) -> Real {
        -(self.width() + BOTTOM_DIFF) / 2.0 + BOTTOM_FILLET
    }

    /// Half width of the tray's outer wall at height `z` (0 at the rim,
    /// `-bottom_height` at the floor).
    fn wall_half_width(&self, z: Real) -> Real {
        self.width() / 2.0 + BOTTOM_DIFF / 2.0 * (-z / self.bottom_height)
    }

    /// The whole tray, ignoring `split`.
    fn full_bottom(&self) -> CadResult<Mesh> {
        let h = self.bottom_height;
        let mut tray = self.chamfered_box(
            self.width(),
            self.depth(),
            -h,
            BOTTOM_DIFF,
            9.0,
            4.0,
            EdgeTreatment::Fillet(BOTTOM_FILLET),
        )?;

        // raised rest for the plate
        let rest = self
            .rounded(self.plate_width() + 1.0, self.plate_depth() + 1.0)
            .extrude(3.0);
        tray = tray.union(&rest);

        let gut = self
            .rounded(self.plate_width() - 10.0, self.plate_depth() - 8.0)
            .extrude(2.0 * h)
            .translate(0.0, 0.0, -h + 2.0);
        tray = tray.difference(&gut);

        let magnets = self
            .magnet_placement()
            .extrude(MAGNET_HEIGHT + 1.0)
            .translate(0.0, 0.0, -MAGNET_HEIGHT);
        tray = tray.difference(&magnets);

        for cut in &self.controller_pockets() {
            tray = tray.difference(cut);
        }

        let edge = self.floor_edge();
        let y = -self.space / 2.0;
        // USB hole, stopping 1 mm short of the outside so the skin can be
        // cut away after printing
        let usb_z = -1.9;
        let usb_h = 3.5;
        let outer = -(self.wall_half_width(usb_z - usb_h / 2.0) - 1.0);
        let usb = Sketch::rectangle(9.5, usb_h)
            .fillet_corners(1.0, self.segments)
            .translate_2d(y, usb_z);
        tray = tray.difference(&along_x(&usb, outer, edge + 4.0));

        Ok(tray)
    }

    /// Pockets for the controller and its socket, measured from the floor
    /// edge at y = -space/2: the board pocket, the socket well and the board
    /// edge slot in the wall.
    pub fn controller_pockets(&self) -> [Mesh; 3] {
        let edge = self.floor_edge();
        let y = -self.space / 2.0;
        let floor = -self.bottom_height + 1.0;
        [
            block((edge - 1.0, edge + 35.0), (y - 9.5, y + 9.5), (floor, floor + 2.0)),
            block((edge + 3.0, edge + 11.0), (y - 9.5, y + 9.5), (floor, floor + 10.0)),
            block((edge + 3.0, edge + 8.0), (y - 9.0, y + 9.0), (floor, floor + 3.0)),
        ]
    }

    fn split_x(tray: &Mesh) -> Real {
        tray.bounding_box().center().x - 2.0
    }

    /// The tray. A split keyboard keeps the -X half, cut 2 mm short of the
    /// middle, so the controller pocket and USB hole stay with the plate half.
    pub fn bottom(&self) -> CadResult<Mesh> {
        let tray = self.full_bottom()?;
        if !self.split {
            return Ok(tray);
        }
        Ok(tray.split(Axis::X, Self::split_x(&tray), Keep::Below))
    }

    /// Both halves of the split tray, -X first.
    pub fn bottom_halves(&self) -> CadResult<(Mesh, Mesh)> {
        let tray = self.full_bottom()?;
        let at = Self::split_x(&tray);
        Ok((tray.split(Axis::X, at, Keep::Below), tray.split(Axis::X, at, Keep::Above)))
    }

    /// The cover: chamfered shell with a switch opening, a shelf for the
    /// plate and magnet pockets underneath.
    pub fn top(&self) -> CadResult<Mesh> {
        let h = self.top_height;
        let shell = self.chamfered_box(
            self.width(),
            self.depth(),
            h,
            TOP_DIFF,
            9.0,
            4.0,
            EdgeTreatment::Fillet(2.0),
        )?;
        let opening = Sketch::rectangle(self.width() - self.lip + 1.0, self.depth() - self.lip + 1.0)
            .chamfer_corners(1.3)
            .extrude(h + 2.0)
            .translate(0.0, 0.0, -1.0);
        let shelf = self
            .rounded(self.plate_width() + 2.0, self.plate_depth() + 2.0)
            .extrude(9.0)
            .translate(0.0, 0.0, -1.0);
        let magnets = self
            .magnet_placement()
            .extrude(MAGNET_HEIGHT + 1.0)
            .translate(0.0, 0.0, -1.0);
        Ok(shell.difference(&opening).difference(&shelf).difference(&magnets))
    }

    pub fn simple_cut_body(&self) -> Mesh {
        cut_body(CutKind::Simple, self.cherry_cut, self.plate_thickness + 2.0)
    }

    pub fn cherry_cut_body(&self) -> Mesh {
        cut_body(CutKind::Cherry, self.cherry_cut, self.plate_thickness + 2.0)
    }

    /// Blind holes on the plate underside that the socket pins rest in.
    fn socket_rest(&self, socket_y: Real) -> Mesh {
        let x0 = -self.plate_width() / 2.0 + 6.0 * PIN_PITCH - 0.7;
        let points: Vec<Point2<Real>> = rarray(PIN_PITCH, 15.5, 12, 2)
            .into_iter()
            .map(|p| Point2::new(x0 + p.x, socket_y + p.y))
            .collect();
        Sketch::circle(0.5, 12)
            .push(&points)
            .extrude(self.plate_thickness / 2.0 + 1.0)
            .translate(0.0, 0.0, -1.0)
    }

    fn build_plate(&self, outline: &Sketch, cut: CutKind, socket_y: Real) -> Mesh {
        cut_plate(
            outline,
            cut,
            self.cherry_cut,
            self.plate_thickness,
            &self.key_positions(),
            self.plate_thickness / 2.0 - 0.25,
        )
        .difference(&self.socket_rest(socket_y))
    }

    /// Stepped outline of the +X half: one key pitch right of centre on the
    /// back rows, one pitch left of it on the front rows.
    fn split_region(bb: &Aabb, space: Real) -> Sketch {
        let half = bb.xlen() / 2.0;
        let height = bb.maxs.y + 0.2;
        let back = Sketch::rectangle(half - space, height).translate_2d(half / 2.0 + space / 2.0, bb.maxs.y / 2.0);
        let front = Sketch::rectangle(half + space, height).translate_2d(half / 2.0 - space / 2.0, bb.mins.y / 2.0);
        back.union(&front)
    }

    /// Half-thickness tongue along the back step of the split.
    fn split_tab(&self, bb: &Aabb) -> Mesh {
        block(
            (self.space - 1.0, self.space + 1.0),
            (0.05, bb.maxs.y - 0.05),
            (self.plate_thickness / 2.0, self.plate_thickness),
        )
    }

    /// The two plate halves, -X first. The -X half carries the tab, the +X
    /// half has the matching rebate.
    pub fn plate_halves(&self, cut: CutKind, socket_y: Real) -> (Mesh, Mesh) {
        let outline = self.rounded(self.plate_width(), self.plate_depth());
        let bb = outline.bounding_box();
        let region = Self::split_region(&bb, self.space);
        let tab = self.split_tab(&bb);

        let left = self
            .build_plate(&outline.difference(&region), cut, socket_y)
            .union(&tab);
        let right = self
            .build_plate(&outline.intersection(&region), cut, socket_y)
            .difference(&tab);
        (left, right)
    }

    /// The switch plate. A split keyboard gets its -X half.
    pub fn plate(&self, cut: CutKind, socket_y: Real) -> Mesh {
        if self.split {
            return self.plate_halves(cut, socket_y).0;
        }
        self.build_plate(&self.rounded(self.plate_width(), self.plate_depth()), cut, socket_y)
    }

    pub fn switches(&self, models: &ReferenceModels) -> CadResult<Mesh> {
        Ok(copies_at(&models.switch_mesh()?, &self.key_positions()))
    }

    pub fn caps(&self, models: &ReferenceModels) -> CadResult<Mesh> {
        Ok(copies_at(&models.keycap_mesh()?, &self.key_positions()))
    }

    pub fn name(&self) -> &'static str {
        if self.split { "waddle_alt_split" } else { "waddle_alt" }
    }

    pub fn keyboard(&self, parts: KeyboardParts, models: &ReferenceModels) -> CadResult<Assembly> {
        let socket = mounted_socket()?;
        let pm_x = -self.width() / 2.0 + socket.bounding_box().maxs.x + 6.5;
        let pm_y = -self.space / 2.0;
        let pm_z = -3.5;

        let top_z = 0.0;
        let plate_z = top_z + 4.0;
        let switch_z = plate_z + self.plate_thickness + 1.4;
        let caps_z = switch_z + 9.5;
        let magnet_gray = Color::rgba(0.5, 0.5, 0.5, 1.0);

        let mut kb = Assembly::new(self.name());
        if parts.bottom {
            kb.add("bottom", self.bottom()?, Color::rgba(0.8, 0.8, 0.8, 0.71), Location::identity())?;
        }
        if parts.plate {
            kb.add(
                "plate",
                self.plate(CutKind::Simple, pm_y),
                Color::WHITE,
                Location::translation(0.0, 0.0, plate_z),
            )?;
        }
        if parts.switches {
            kb.add(
                "switches",
                self.switches(models)?,
                Color::BLACK,
                Location::translation(0.0, 0.0, switch_z),
            )?;
        }
        if parts.caps {
            kb.add(
                "caps",
                self.caps(models)?,
                Color::rgba(0.1, 0.1, 0.1, 1.0),
                Location::translation(0.0, 0.0, caps_z),
            )?;
        }
        if parts.pro_micro {
            kb.add(
                "proMicro",
                mounted_pro_micro()?,
                Color::rgba(1.0, 1.0, 0.3, 1.0),
                Location::translation(pm_x, pm_y, pm_z),
            )?;
        }
        if parts.socket {
            kb.add(
                "socket",
                socket,
                Color::rgba(0.3, 0.5, 0.3, 1.0),
                Location::translation(pm_x + 1.0, pm_y, pm_z + 9.5),
            )?;
        }
        if parts.top {
            kb.add(
                "top",
                self.top()?,
                Color::rgba(0.1, 0.1, 0.1, 1.0),
                Location::translation(0.0, 0.0, top_z),
            )?;
        }
        if parts.magnets_top {
            kb.add("magnetsTop", self.magnets(), magnet_gray, Location::identity())?;
        }
        if parts.magnets_bottom {
            kb.add("magnetsBottom", self.magnets(), magnet_gray, Location::translation(0.0, 0.0, -5.0))?;
        }
        Ok(kb)
    }
}
