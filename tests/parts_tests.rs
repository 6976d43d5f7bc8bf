mod support;

use std::f64::consts::TAU;

use nalgebra::Point2;
use waddle_cad::{
    CSG, CadError, Sketch,
    parts::{
        Cap, CutKind, KeyboardPart, KeyboardParts, ProMicro, ProMicroVariant, ReferenceModel, ReferenceModels,
        Socket, Waddle, WaddleAlt, block, cherry_protrusions, cut_body, cut_plate, cut_profile,
        reference::y_up_fix,
    },
};

use crate::support::{approx_eq, assert_bbox, assert_volume};

fn ngon_area(r: f64, n: usize) -> f64 {
    0.5 * n as f64 * r * r * (TAU / n as f64).sin()
}

/// Two keys, coarse arcs: enough to exercise every feature quickly.
fn small_waddle() -> Waddle {
    Waddle {
        cols: 2,
        rows: 1,
        segments: 8,
        ..Default::default()
    }
}

fn small_alt() -> WaddleAlt {
    WaddleAlt {
        cols: 2,
        rows: 1,
        segments: 8,
        ..Default::default()
    }
}

#[test]
fn pro_micro_variant_parsing() {
    assert_eq!("micro".parse::<ProMicroVariant>(), Ok(ProMicroVariant::Micro));
    assert_eq!(" C ".parse::<ProMicroVariant>(), Ok(ProMicroVariant::C));
    assert_eq!("usb-b".parse::<ProMicroVariant>(), Ok(ProMicroVariant::Plain));
    assert_eq!(ProMicroVariant::default(), ProMicroVariant::C);
    assert_eq!(ProMicroVariant::Micro.to_string(), "micro");
}

#[test]
fn pro_micro_board() {
    let micro = ProMicro::new(ProMicroVariant::Micro).board();
    assert_bbox(&micro.bounding_box(), [-9.0, -16.5, 0.0], [9.0, 16.5, 1.5], 1e-6);
    // 24 pin holes of Ø1
    assert_volume(&micro, (18.0 * 33.0 - 24.0 * ngon_area(0.5, 16)) * 1.5, 1e-9);

    let c = ProMicro::new(ProMicroVariant::C).board();
    assert_bbox(&c.bounding_box(), [-9.0, -16.5, 0.0], [9.0, 18.4, 1.5], 1e-6);

    let plain = ProMicro::new(ProMicroVariant::Plain).board();
    assert_volume(&plain, 18.0 * 34.0 * 1.5, 1e-12);
}

#[test]
fn pro_micro_ports() {
    let micro = ProMicro::new(ProMicroVariant::Micro).port();
    assert_bbox(&micro.bounding_box(), [-3.5, -3.0, 0.0], [3.5, 3.0, 2.0], 1e-6);

    let c = ProMicro::new(ProMicroVariant::C).port();
    assert_bbox(&c.bounding_box(), [-4.5, -6.675, 0.0], [4.5, 0.675, 3.25], 1e-6);

    assert!(ProMicro::new(ProMicroVariant::Plain).port().is_empty());
    assert!(ProMicro::new(ProMicroVariant::Plain).components().is_empty());
}

#[test]
fn pro_micro_assembly() {
    let board = ProMicro::new(ProMicroVariant::C);
    let asm = board.assembly().unwrap();
    assert_eq!(asm.name, "Arduino_Pro_Micro-USB-c");
    assert_eq!(board.file_stem(), "proMicro_c");
    let names: Vec<&str> = asm.parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["board", "port", "components"]);

    let port = asm.part("port").unwrap().location.translation_vector();
    assert!(approx_eq(port.y, 18.4, 1e-6));
    assert!(approx_eq(port.z, 1.5, 1e-12));

    let plain = ProMicro::new(ProMicroVariant::Plain).assembly().unwrap();
    assert_eq!(plain.len(), 1);
}

#[test]
fn socket_legs_and_body() {
    let socket = Socket::new(12);
    let legs = socket.legs().unwrap();
    assert_bbox(
        &legs.bounding_box(),
        [-7.675, -14.645, 0.0],
        [7.675, 14.645, 4.5],
        1e-6,
    );

    let body = socket.body().unwrap();
    assert_bbox(&body.bounding_box(), [-7.99, -15.24, 0.0], [7.99, 15.24, 2.8], 1e-6);

    let short = Socket::new(4).body().unwrap();
    assert_bbox(&short.bounding_box(), [-7.99, -5.08, 0.0], [7.99, 5.08, 2.8], 1e-6);
}

#[test]
fn socket_polarity_notch() {
    let body = Socket::new(12).body().unwrap();
    // a sliver just inside the +Y end face, 6.5 in from the -X side
    let notch = block((-1.69, -1.29), (14.8, 15.1), (0.2, 1.6));
    assert!(body.intersection(&notch).volume() < 1e-9);

    // mirrored in x, or at the -Y end, the end bar is solid
    let solid = 0.4 * 0.3 * 1.4;
    assert_volume(&body.intersection(&block((1.29, 1.69), (14.8, 15.1), (0.2, 1.6))), solid, 1e-6);
    assert_volume(&body.intersection(&block((-1.69, -1.29), (-15.1, -14.8), (0.2, 1.6))), solid, 1e-6);
}

#[test]
fn socket_rejects_zero_pins() {
    let socket = Socket::new(0);
    assert!(matches!(socket.legs(), Err(CadError::InvalidDimension { .. })));
    assert!(matches!(socket.body(), Err(CadError::InvalidDimension { .. })));
}

#[test]
fn socket_assembly() {
    let socket = Socket::new(12);
    assert_eq!(socket.pin_count(), 24);
    assert_eq!(socket.file_stem(), "DIL_socket_24pins");

    let asm = socket.assembly().unwrap();
    assert_eq!(asm.name, "Lathed DIL socket by qwelyt");
    assert_eq!(asm.description, "24");
    let body = asm.part("body").unwrap();
    assert!(approx_eq(body.location.translation_vector().z, 4.5, 1e-6));
    assert_bbox(&asm.bounding_box(), [-7.99, -15.24, 0.0], [7.99, 15.24, 7.3], 1e-6);
}

#[test]
fn cap_row3() {
    let cap = Cap { segments: 16 }.row3().unwrap();
    let bb = cap.bounding_box();
    assert!(approx_eq(bb.mins.z, -4.0, 1e-6));
    assert!(bb.maxs.z < 4.0 && bb.maxs.z > 3.0, "dished top at {}", bb.maxs.z);
    assert!(bb.maxs.x < 9.5 && bb.maxs.x > 8.5);
    assert!(approx_eq(bb.mins.x, -bb.maxs.x, 1e-6));

    // Standing on its side for printing
    let printed = Cap::print_orientation(&cap).bounding_box();
    assert!(approx_eq(printed.zlen(), bb.xlen(), 1e-6));
    assert!(approx_eq(printed.xlen(), bb.zlen(), 1e-6));
}

#[test]
fn cap_stem_is_hollow_cross() {
    let cap = Cap { segments: 16 };
    let stem = cap.stem(5.6, 5.6, Default::default()).unwrap();
    let solid = Sketch::circle(2.8, 16).extrude(5.6).volume();
    assert!(stem.volume() < solid);
    assert_bbox(&stem.bounding_box(), [-2.8, -2.8, 0.0], [2.8, 2.8, 5.6], 1e-6);
    assert!(matches!(
        cap.stem(0.0, 5.6, Default::default()),
        Err(CadError::InvalidDimension { .. })
    ));
}

#[test]
fn cut_profiles() {
    let simple = cut_profile(CutKind::Simple, 14.0);
    assert!(approx_eq(simple.area(), 196.0, 1e-9));
    let cherry = cut_profile(CutKind::Cherry, 14.0);
    // the notches leave two 0.5 x 4 tabs standing on the sides
    assert!(approx_eq(cherry.area(), 196.0 - 2.0 * 0.5 * 4.0, 1e-9));

    let body = cut_body(CutKind::Cherry, 14.0, 5.0);
    // the reliefs stick out 0.5 past the front and back faces
    assert_bbox(&body.bounding_box(), [-7.0, -7.5, -2.5], [7.0, 7.5, 2.5], 1e-6);
}

#[test]
fn cherry_clip_reliefs() {
    let reliefs = cherry_protrusions(14.0, 5.0);
    // 4 wide, straddling the faces, from the bottom to one below the top
    assert_bbox(&reliefs.bounding_box(), [-2.0, -7.5, -2.5], [2.0, 7.5, 1.5], 1e-6);
    let chamfer = 0.5 * 0.2 * 0.4 * 4.0;
    assert_volume(&reliefs, 2.0 * (4.0 * 1.0 * 4.0 - chamfer), 1e-6);
}

#[test]
fn cherry_plate_cuts_clip_reliefs() {
    let outline = Sketch::rectangle(40.0, 40.0);
    let at = [Point2::new(0.0, 0.0)];
    let plate = cut_plate(&outline, CutKind::Cherry, 14.05, 3.0, &at, 1.25);
    let no_relief = outline
        .difference(&cut_profile(CutKind::Cherry, 14.05))
        .extrude(3.0);

    // reliefs span z -1.25..2.75; only the outer 0.5 lies in the plate
    let chamfer = 0.5 * 0.2 * 0.4 * 4.0;
    let relief = 2.0 * (4.0 * 0.5 * 2.75 - chamfer);
    assert_volume(&plate, no_relief.volume() - relief, 1e-6);

    let simple = cut_plate(&outline, CutKind::Simple, 14.05, 3.0, &at, 1.25);
    assert_volume(&simple, (1600.0 - 14.05 * 14.05) * 3.0, 1e-6);
}

#[test]
fn keyboard_part_selection() {
    let none = KeyboardParts::default();
    assert!(none.is_empty());

    let all = KeyboardParts::all();
    assert!(KeyboardPart::ALL.iter().all(|p| all.contains(*p)));

    let some: KeyboardParts = [KeyboardPart::Plate, KeyboardPart::MagnetsBottom, KeyboardPart::Plate]
        .into_iter()
        .collect();
    assert!(some.plate && some.magnets_bottom);
    assert!(!some.top && !some.bottom);
    assert_eq!(KeyboardPart::ProMicro.name(), "proMicro");
    assert_eq!(KeyboardPart::MagnetsTop.name(), "magnetsTop");
}

#[test]
fn reference_models() {
    let models = ReferenceModels::default();
    let switch = models.switch_mesh().unwrap();
    assert_bbox(&switch.bounding_box(), [-7.8, -7.8, -9.25], [7.8, 7.8, 9.25], 1e-9);
    let cap = models.keycap_mesh().unwrap();
    assert_bbox(&cap.bounding_box(), [-7.8, -7.8, -5.0], [7.8, 7.8, 5.0], 1e-9);
}

#[test]
fn reference_stl_is_turned_z_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.stl");
    waddle_cad::io::stl::write_stl(&waddle_cad::mesh::shapes::cuboid(1.0, 2.0, 3.0), &path).unwrap();

    let model = ReferenceModel::Stl(path).load(&y_up_fix(0.0, 0.0, 0.0)).unwrap();
    // Y-up (x, y, z) becomes Z-up (x, -z, y)
    assert_bbox(&model.bounding_box(), [0.0, -3.0, 0.0], [1.0, 0.0, 2.0], 1e-6);

    let missing = ReferenceModel::Stl(dir.path().join("none.stl")).load(&y_up_fix(0.0, 0.0, 0.0));
    assert!(matches!(missing, Err(CadError::Io { .. })));
}

#[test]
fn waddle_dimensions() {
    let kb = Waddle::default();
    assert!(approx_eq(kb.grid_width(), 228.6, 1e-9));
    assert!(approx_eq(kb.width(), 248.6, 1e-9));
    assert!(approx_eq(kb.depth(), 96.2, 1e-9));
    assert!(approx_eq(kb.plate_width(), 238.6, 1e-9));
    assert!(approx_eq(kb.plate_depth(), 86.2, 1e-9));
    assert_eq!(kb.key_positions().len(), 48);
}

#[test]
fn waddle_bottom_and_top() {
    let kb = small_waddle();
    let (hw, hd) = (kb.width() / 2.0, kb.depth() / 2.0);

    let bottom = kb.bottom().unwrap();
    assert_bbox(&bottom.bounding_box(), [-hw, -hd, 0.0], [hw, hd, 13.0], 1e-6);

    let top = kb.top().unwrap();
    assert_bbox(&top.bounding_box(), [-hw, -hd, 0.0], [hw, hd, 9.0], 1e-6);
    // the key opening goes all the way through
    assert!(top.volume() < kb.width() * kb.depth() * 9.0 - (kb.grid_width() + 1.0) * (kb.grid_depth() + 1.0) * 9.0);
}

#[test]
fn waddle_plate() {
    let kb = small_waddle();
    let plate = kb.plate();
    let (hw, hd) = (kb.plate_width() / 2.0, kb.plate_depth() / 2.0);
    assert_bbox(&plate.bounding_box(), [-hw, -hd, 0.0], [hw, hd, 3.0], 1e-6);

    let no_relief = Sketch::rectangle(kb.plate_width(), kb.plate_depth())
        .fillet_corners(kb.fillet, kb.segments)
        .difference(&cut_profile(CutKind::Cherry, kb.cherry_cut).push(&kb.key_positions()))
        .extrude(3.0);
    let chamfer = 0.5 * 0.2 * 0.4 * 4.0;
    let relief_per_key = 2.0 * (4.0 * 0.5 * 2.75 - chamfer);
    assert_volume(&plate, no_relief.volume() - 2.0 * relief_per_key, 1e-6);
}

#[test]
fn waddle_keyboard_assembly() {
    let kb = small_waddle();
    let parts: KeyboardParts = [KeyboardPart::Plate, KeyboardPart::Top, KeyboardPart::MagnetsTop]
        .into_iter()
        .collect();
    let asm = kb.keyboard(parts, &ReferenceModels::default()).unwrap();
    assert_eq!(asm.name, "waddle");
    let names: Vec<&str> = asm.parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["plate", "top"]);
    assert!(approx_eq(asm.part("plate").unwrap().location.translation_vector().z, 11.5, 1e-12));
}

#[test]
fn waddle_alt_magnets() {
    let kb = small_alt();
    let placement = kb.magnet_placement();
    assert_eq!(placement.region_count(), 6);
    assert_volume(&kb.magnets(), 6.0 * ngon_area(2.5, 8) * 5.0, 1e-9);
}

#[test]
fn waddle_alt_shells() {
    let kb = small_alt();
    let (hw, hd) = (kb.width() / 2.0, kb.depth() / 2.0);

    let bottom = kb.bottom().unwrap();
    assert_bbox(&bottom.bounding_box(), [-hw, -hd, -6.0], [hw, hd, 3.0], 1e-6);

    let top = kb.top().unwrap();
    assert_bbox(&top.bounding_box(), [-hw, -hd, 0.0], [hw, hd, 15.0], 1e-6);
}

#[test]
fn waddle_alt_split_tray() {
    let kb = WaddleAlt {
        split: true,
        ..small_alt()
    };
    let (left, right) = kb.bottom_halves().unwrap();
    assert!(approx_eq(left.bounding_box().maxs.x, -2.0, 1e-6));
    assert!(approx_eq(right.bounding_box().mins.x, -2.0, 1e-6));

    let whole = WaddleAlt { split: false, ..kb }.bottom().unwrap();
    assert_volume(&whole, left.volume() + right.volume(), 1e-6);

    // the split tray is the -X half, like the split plate
    let half = kb.bottom().unwrap();
    assert_volume(&half, left.volume(), 1e-9);
    let plate = kb.plate(CutKind::Simple, -kb.space / 2.0).bounding_box();
    assert!(approx_eq(half.bounding_box().mins.x, -kb.width() / 2.0, 1e-6));
    assert!(approx_eq(plate.mins.x, -kb.plate_width() / 2.0, 1e-6));
    assert!(plate.maxs.x < kb.plate_width() / 2.0);

    // the socket well and board slot stay on the printed half
    let [_, socket, slot] = kb.controller_pockets();
    assert!(socket.bounding_box().maxs.x < half.bounding_box().maxs.x);
    assert!(slot.bounding_box().maxs.x < half.bounding_box().maxs.x);
}

#[test]
fn waddle_alt_controller_pockets() {
    let kb = small_alt();
    let [board, socket, slot] = kb.controller_pockets().map(|m| m.bounding_box());
    // measured from the board pocket, which starts 1 mm before the floor edge
    assert!(approx_eq(socket.mins.x - board.mins.x, 4.0, 1e-9));
    assert!(approx_eq(slot.mins.x - board.mins.x, 4.0, 1e-9));
    assert!(approx_eq(slot.maxs.x - board.mins.x, 9.0, 1e-9));
    assert!(approx_eq(slot.ylen(), 18.0, 1e-9));
    assert!(approx_eq(board.mins.z, -kb.bottom_height + 1.0, 1e-9));
}

#[test]
fn waddle_alt_split_plate() {
    let kb = WaddleAlt {
        split: true,
        ..small_alt()
    };
    let socket_y = -kb.space / 2.0;
    let (left, right) = kb.plate_halves(CutKind::Simple, socket_y);

    let lb = left.bounding_box();
    let rb = right.bounding_box();
    // tab reaches one millimetre past the back step
    assert!(approx_eq(lb.maxs.x, kb.space + 1.0, 1e-6));
    assert!(approx_eq(rb.mins.x, -kb.space, 1e-6));
    assert!(approx_eq(rb.maxs.x, kb.plate_width() / 2.0, 1e-6));

    let whole = WaddleAlt { split: false, ..kb }.plate(CutKind::Simple, socket_y);
    assert_volume(&whole, left.volume() + right.volume(), 1e-6);
    assert_volume(&kb.plate(CutKind::Simple, socket_y), left.volume(), 1e-9);
}

#[test]
fn waddle_alt_names_and_assembly() {
    assert_eq!(WaddleAlt::default().name(), "waddle_alt");
    assert_eq!(WaddleAlt::split_variant().name(), "waddle_alt_split");

    let kb = small_alt();
    let parts: KeyboardParts = [KeyboardPart::MagnetsTop, KeyboardPart::MagnetsBottom]
        .into_iter()
        .collect();
    let asm = kb.keyboard(parts, &ReferenceModels::default()).unwrap();
    assert_eq!(asm.name, "waddle_alt");
    let names: Vec<&str> = asm.parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["magnetsTop", "magnetsBottom"]);
    let low = asm.part("magnetsBottom").unwrap().placed().bounding_box();
    assert!(approx_eq(low.mins.z, -5.0, 1e-12));
    assert!(approx_eq(low.maxs.z, 0.0, 1e-12));
}
