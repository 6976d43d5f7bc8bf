mod support;

use nalgebra::{Point3, Vector3};
use waddle_cad::{
    CadError, CSG, Location,
    mesh::{
        Axis, Keep, Mesh,
        plane::Plane,
        shapes::{centered_box, cuboid, cylinder, frustum, polyhedron, sphere},
    },
};

use crate::support::{all_vertices, approx_eq, assert_bbox, assert_volume};

fn two_cubes() -> (Mesh, Mesh) {
    // [0,2]^3 and [1,3]^3 overlap in a unit cube
    (cuboid(2.0, 2.0, 2.0), cuboid(2.0, 2.0, 2.0).translate(1.0, 1.0, 1.0))
}

#[test]
fn cuboid_is_closed() {
    let cube = cuboid(2.0, 3.0, 4.0);
    assert_eq!(cube.polygons.len(), 6);
    assert!(cube.is_manifold());
    assert_volume(&cube, 24.0, 1e-12);
    assert!(approx_eq(cube.surface_area(), 2.0 * (6.0 + 8.0 + 12.0), 1e-12));
    assert_bbox(&cube.bounding_box(), [0.0; 3], [2.0, 3.0, 4.0], 1e-12);
}

#[test]
fn centered_box_spans_origin() {
    let b = centered_box(2.0, 4.0, 6.0);
    assert_bbox(&b.bounding_box(), [-1.0, -2.0, -3.0], [1.0, 2.0, 3.0], 1e-12);
}

#[test]
fn cylinder_volume_matches_inscribed_polygon() {
    let n = 32;
    let r = 2.0;
    let c = cylinder(r, 5.0, n);
    assert!(c.is_manifold());
    let base = 0.5 * n as f64 * r * r * (std::f64::consts::TAU / n as f64).sin();
    assert_volume(&c, base * 5.0, 1e-9);
}

#[test]
fn cone_has_no_top_cap() {
    let cone = frustum(1.0, 0.0, 2.0, 16);
    // bottom cap plus 16 sides
    assert_eq!(cone.polygons.len(), 17);
    assert!(cone.volume() > 0.0);
}

#[test]
fn sphere_faces_point_outward() {
    let s = sphere(3.0, 24, 12);
    assert!(s.volume() > 0.0);
    assert!(s.volume() < 4.0 / 3.0 * std::f64::consts::PI * 27.0);
    for p in &s.polygons {
        assert!(p.plane.normal().dot(&p.centroid().coords) > 0.0);
    }
}

#[test]
fn polyhedron_rejects_bad_index() {
    let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let err = polyhedron(&points, &[vec![0, 1, 5]]).unwrap_err();
    assert!(matches!(err, CadError::FaceIndexOutOfRange { index: 5, len: 3 }));
}

#[test]
fn polyhedron_tetrahedron() {
    let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
    let tet = polyhedron(&points, &faces).unwrap();
    assert!(tet.is_manifold());
    assert_volume(&tet, 1.0 / 6.0, 1e-12);
}

#[test]
fn union() {
    let (a, b) = two_cubes();
    let u = a.union(&b);
    assert_volume(&u, 15.0, 1e-9);
    assert_bbox(&u.bounding_box(), [0.0; 3], [3.0; 3], 1e-9);
}

#[test]
fn difference() {
    let (a, b) = two_cubes();
    let d = a.difference(&b);
    assert_volume(&d, 7.0, 1e-9);
    assert_bbox(&d.bounding_box(), [0.0; 3], [2.0; 3], 1e-9);
}

#[test]
fn intersection() {
    let (a, b) = two_cubes();
    let i = a.intersection(&b);
    assert_volume(&i, 1.0, 1e-9);
    assert_bbox(&i.bounding_box(), [1.0; 3], [2.0; 3], 1e-9);
}

#[test]
fn difference_through_hole() {
    let block = centered_box(10.0, 10.0, 2.0);
    let drill = cylinder(2.0, 4.0, 32).translate(0.0, 0.0, -2.0);
    let holed = block.difference(&drill);
    let expected = 200.0 - drill.volume() / 2.0;
    assert_volume(&holed, expected, 1e-9);
    // nothing of the drill pokes out
    assert!(all_vertices(&holed, |p| p.z.abs() <= 1.0 + 1e-9));
}

#[test]
fn disjoint_union_keeps_both_untouched() {
    let a = cuboid(1.0, 1.0, 1.0);
    let b = cuboid(1.0, 1.0, 1.0).translate(5.0, 0.0, 0.0);
    let u = a.union(&b);
    assert_eq!(u.polygons.len(), 12);
    assert_volume(&u, 2.0, 1e-12);
}

#[test]
fn disjoint_difference_and_intersection() {
    let a = cuboid(1.0, 1.0, 1.0);
    let b = cuboid(1.0, 1.0, 1.0).translate(0.0, 0.0, 10.0);
    assert_eq!(a.difference(&b).polygons.len(), a.polygons.len());
    assert!(a.intersection(&b).is_empty());
}

#[test]
fn empty_operands() {
    let a = cuboid(1.0, 1.0, 1.0);
    let empty = Mesh::new();
    assert_eq!(a.union(&empty).polygons.len(), 6);
    assert_eq!(empty.union(&a).polygons.len(), 6);
    assert_eq!(a.difference(&empty).polygons.len(), 6);
    assert!(empty.difference(&a).is_empty());
    assert!(a.intersection(&empty).is_empty());
    assert!(empty.bounding_box().is_empty());
}

#[test]
fn touching_faces_union() {
    let a = cuboid(1.0, 1.0, 1.0);
    let b = cuboid(1.0, 1.0, 1.0).translate(1.0, 0.0, 0.0);
    let u = a.union(&b);
    assert_volume(&u, 2.0, 1e-9);
    assert_bbox(&u.bounding_box(), [0.0; 3], [2.0, 1.0, 1.0], 1e-9);
}

#[test]
fn split_keeps_one_side() {
    let cube = cuboid(2.0, 2.0, 2.0);
    let below = cube.split(Axis::X, 0.5, Keep::Below);
    assert_volume(&below, 2.0, 1e-9);
    assert_bbox(&below.bounding_box(), [0.0; 3], [0.5, 2.0, 2.0], 1e-9);

    let above = cube.split(Axis::Z, 1.5, Keep::Above);
    assert_volume(&above, 2.0, 1e-9);

    // A plane past the solid leaves nothing on the far side
    assert!(cube.split(Axis::Y, 5.0, Keep::Above).is_empty());
    assert!(Mesh::new().split(Axis::X, 0.0, Keep::Below).is_empty());
}

#[test]
fn merge_concatenates() {
    let a = cuboid(1.0, 1.0, 1.0);
    let b = cuboid(1.0, 1.0, 1.0).translate(0.5, 0.0, 0.0);
    assert_eq!(a.merge(&b).polygons.len(), 12);
    let all = Mesh::merge_all([&a, &b, &a]);
    assert_eq!(all.polygons.len(), 18);
}

#[test]
fn from_aabb_roundtrips_bounds() {
    let bb = cuboid(3.0, 1.0, 2.0).translate(-1.0, 4.0, 2.0).bounding_box();
    let boxed = Mesh::from_aabb(&bb);
    assert_bbox(&boxed.bounding_box(), [-1.0, 4.0, 2.0], [2.0, 5.0, 4.0], 1e-12);
}

#[test]
fn transforms() {
    let cube = cuboid(2.0, 2.0, 2.0);

    let centered = cube.center();
    assert_bbox(&centered.bounding_box(), [-1.0; 3], [1.0; 3], 1e-12);

    let floated = centered.float();
    assert!(approx_eq(floated.bounding_box().mins.z, 0.0, 1e-12));

    let rotated = cuboid(4.0, 1.0, 1.0).rotate(0.0, 0.0, 90.0);
    assert_bbox(&rotated.bounding_box(), [-1.0, 0.0, 0.0], [0.0, 4.0, 1.0], 1e-9);

    let scaled = cube.scale(1.0, 2.0, 0.5);
    assert_volume(&scaled, 8.0, 1e-12);
}

#[test]
fn mirror_keeps_volume_positive() {
    let cube = cuboid(1.0, 1.0, 1.0).translate(1.0, 0.0, 0.0);
    let mirrored = cube.mirror(Plane::from_normal(Vector3::x(), 0.0));
    assert_bbox(&mirrored.bounding_box(), [-2.0, 0.0, 0.0], [-1.0, 1.0, 1.0], 1e-12);
    assert_volume(&mirrored, 1.0, 1e-12);
}

#[test]
fn moved_and_rotate_about_axis() {
    let bar = cuboid(2.0, 1.0, 1.0);
    let loc = Location::rotation(Vector3::z(), 90.0).then(&Location::translation(10.0, 0.0, 0.0));
    let moved = bar.moved(&loc);
    assert_bbox(&moved.bounding_box(), [9.0, 0.0, 0.0], [10.0, 2.0, 1.0], 1e-9);

    let turned = bar.rotate_about_axis(Point3::new(1.0, 0.0, 0.0), Vector3::z(), 180.0);
    assert_bbox(&turned.bounding_box(), [0.0, -1.0, 0.0], [2.0, 0.0, 1.0], 1e-9);
}

#[test]
fn distribute_grid() {
    let cube = cuboid(1.0, 1.0, 1.0);
    let grid = cube.distribute_grid(2, 3, 2.0, 2.0);
    assert_volume(&grid, 6.0, 1e-9);
    assert_bbox(&grid.bounding_box(), [0.0; 3], [5.0, 3.0, 1.0], 1e-9);
}
