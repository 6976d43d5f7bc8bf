#![cfg(all(feature = "stl-io", feature = "step-io"))]

mod support;

use waddle_cad::{
    Assembly, CSG, CadError, Color, Location,
    io::{
        step::{StepExportParams, StepWriter, to_step_string, write_step, write_step_mesh},
        stl::{from_stl_bytes, read_stl, to_stl_ascii, to_stl_binary, write_stl},
    },
    mesh::{Mesh, shapes::cuboid},
};

use crate::support::{assert_bbox, assert_volume};

fn fixed_params() -> StepExportParams {
    StepExportParams::default()
        .with_author("qwelyt")
        .with_organization("waddle")
        .with_timestamp("2024-01-01T00:00:00")
}

#[test]
fn stl_ascii_layout() {
    let text = to_stl_ascii(&cuboid(2.0, 2.0, 2.0), "cube");
    assert!(text.starts_with("solid cube\n"));
    assert!(text.trim_end().ends_with("endsolid cube"));
    assert_eq!(text.matches("outer loop").count(), 12);
    assert_eq!(text.matches("vertex ").count(), 36);
}

#[test]
fn stl_binary_size() {
    let bytes = to_stl_binary(&cuboid(1.0, 1.0, 1.0), "ignored").unwrap();
    // 80-byte header, u32 count, 50 bytes per triangle
    assert_eq!(bytes.len(), 84 + 12 * 50);
}

#[test]
fn stl_bytes_parse_back() {
    let cube = cuboid(1.0, 2.0, 3.0).translate(1.0, 1.0, 1.0);
    let ascii = to_stl_ascii(&cube, "c");
    let from_ascii = from_stl_bytes(ascii.as_bytes()).unwrap();
    assert_eq!(from_ascii.polygons.len(), 12);
    assert_volume(&from_ascii, 6.0, 1e-6);

    let binary = to_stl_binary(&cube, "c").unwrap();
    let from_binary = from_stl_bytes(&binary).unwrap();
    assert_bbox(&from_binary.bounding_box(), [1.0; 3], [2.0, 3.0, 4.0], 1e-6);
    assert!(from_binary.is_manifold());
}

#[test]
fn stl_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.stl");
    write_stl(&cuboid(2.0, 2.0, 2.0), &path).unwrap();
    let mesh = read_stl(&path).unwrap();
    assert_volume(&mesh, 8.0, 1e-6);
}

#[test]
fn missing_stl_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.stl");
    match read_stl(&path) {
        Err(CadError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected an i/o error, got {other:?}"),
    }
}

#[test]
fn unwritable_stl_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("cube.stl");
    assert!(matches!(
        write_stl(&cuboid(1.0, 1.0, 1.0), &path),
        Err(CadError::Io { .. })
    ));
}

#[test]
fn step_header_and_sections() {
    let asm = Assembly::new("socket")
        .with_description("DIL socket 24 pins")
        .with("pins", cuboid(1.0, 1.0, 1.0), Color::BRASS, Location::identity())
        .unwrap();
    let text = to_step_string(&asm, &fixed_params());

    assert!(text.starts_with("ISO-10303-21;\nHEADER;\n"));
    assert!(text.contains("FILE_NAME('socket','2024-01-01T00:00:00',('qwelyt'),('waddle'),"));
    assert!(text.contains("AUTOMOTIVE_DESIGN"));
    assert!(text.contains("PRODUCT('socket','socket','DIL socket 24 pins',"));
    assert!(text.trim_end().ends_with("END-ISO-10303-21;"));
}

#[test]
fn step_faceted_parts() {
    let asm = Assembly::new("two")
        .with("closed", cuboid(1.0, 1.0, 1.0), Color::WHITE, Location::identity())
        .unwrap()
        .with(
            "open",
            Mesh::from_polygons(cuboid(1.0, 1.0, 1.0).polygons[..5].to_vec()),
            Color::BLACK.with_alpha(0.5),
            Location::translation(5.0, 0.0, 0.0),
        )
        .unwrap();
    let text = to_step_string(&asm, &fixed_params());

    assert_eq!(text.matches("CLOSED_SHELL(").count(), 1);
    assert_eq!(text.matches("OPEN_SHELL(").count(), 1);
    assert_eq!(text.matches("FACETED_BREP('closed'").count(), 1);
    assert_eq!(text.matches("POLY_LOOP(").count(), 11);
    assert_eq!(text.matches("NEXT_ASSEMBLY_USAGE_OCCURRENCE(").count(), 2);
    assert_eq!(text.matches("COLOUR_RGB(").count(), 2);
    assert_eq!(text.matches("SURFACE_STYLE_TRANSPARENT(0.5)").count(), 1);
    // the closed cube has 8 corners, the translated open one 8 more
    assert_eq!(text.matches("CARTESIAN_POINT('',(").count(), 1 + 16);
    assert!(text.contains("CARTESIAN_POINT('',(5.,0.,0.))"));
}

#[test]
fn step_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let asm = Assembly::new("cube")
        .with("cube", cuboid(1.0, 1.0, 1.0), Color::GRAY, Location::identity())
        .unwrap();

    let path = dir.path().join("cube.step");
    write_step(&asm, &path, &fixed_params()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, to_step_string(&asm, &fixed_params()));

    let single = dir.path().join("single.step");
    write_step_mesh(&cuboid(1.0, 1.0, 1.0), "single", &single).unwrap();
    let text = std::fs::read_to_string(&single).unwrap();
    assert!(text.contains("FACETED_BREP('single'"));
    assert!(!text.contains("NEXT_ASSEMBLY_USAGE_OCCURRENCE"));
}

#[test]
fn step_writer_numbers_entities() {
    let mut w = StepWriter::new();
    assert_eq!(w.add("DIRECTION('',(0.,0.,1.))"), 1);
    assert_eq!(w.add("DIRECTION('',(1.,0.,0.))"), 2);
    assert_eq!(w.entity_count(), 2);
    let text = w.finish("x", &fixed_params());
    assert!(text.contains("#2=DIRECTION('',(1.,0.,0.));"));
}
