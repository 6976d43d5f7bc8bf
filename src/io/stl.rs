use crate::errors::{CadError, CadResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use stl_io::{Normal, Triangle, Vertex};

/// Per-facet normal from the winding; zero for slivers.
fn facet_normal(tri: &[Point3<Real>; 3]) -> Vector3<Real> {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    n.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Convert a mesh to an **ASCII STL** string with the given solid `name`.
///
/// ```rust
/// # use waddle_cad::mesh::shapes::cuboid;
/// # use waddle_cad::io::stl::to_stl_ascii;
/// let text = to_stl_ascii(&cuboid(1.0, 1.0, 1.0), "unit");
/// assert!(text.starts_with("solid unit"));
/// assert_eq!(text.matches("facet normal").count(), 12);
/// ```
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for tri in mesh.triangulate() {
        let n = facet_normal(&tri);
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for p in &tri {
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

fn to_triangles(mesh: &Mesh) -> Vec<Triangle> {
    mesh.triangulate()
        .iter()
        .map(|tri| {
            let n = facet_normal(tri);
            Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect()
}

/// Convert a mesh to a **binary STL** byte vector. Binary STL carries no
/// solid name, so `_name` only keeps the signature parallel to the ASCII one.
pub fn to_stl_binary(mesh: &Mesh, _name: &str) -> std::io::Result<Vec<u8>> {
    let triangles = to_triangles(mesh);
    let mut cursor = Cursor::new(Vec::new());
    stl_io::write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Write binary STL to `path`.
pub fn write_stl(mesh: &Mesh, path: impl AsRef<Path>) -> CadResult<()> {
    let path = path.as_ref();
    let triangles = to_triangles(mesh);
    let mut file = File::create(path).map_err(|e| CadError::io(path, e))?;
    stl_io::write_stl(&mut file, triangles.iter()).map_err(|e| CadError::io(path, e))?;
    tracing::info!(path = %path.display(), triangles = triangles.len(), "wrote stl");
    Ok(())
}

/// Parse STL bytes (ASCII or binary) into a mesh of triangles.
pub fn from_stl_bytes(data: &[u8]) -> std::io::Result<Mesh> {
    let mut cursor = Cursor::new(data);
    triangles_to_mesh(stl_io::create_stl_reader(&mut cursor)?)
}

/// Load an STL file, e.g. a third-party switch or keycap model.
pub fn read_stl(path: impl AsRef<Path>) -> CadResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CadError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mesh = stl_io::create_stl_reader(&mut reader)
        .and_then(triangles_to_mesh)
        .map_err(|e| CadError::io(path, e))?;
    tracing::debug!(path = %path.display(), polygons = mesh.polygons.len(), "read stl");
    Ok(mesh)
}

fn triangles_to_mesh(
    reader: impl Iterator<Item = std::io::Result<Triangle>>,
) -> std::io::Result<Mesh> {
    let mut polygons = Vec::new();
    let mut skipped = 0usize;
    for tri in reader {
        let tri = tri?;
        let pts = tri
            .vertices
            .map(|v| Point3::new(v[0] as Real, v[1] as Real, v[2] as Real));
        match Polygon::from_points(&pts) {
            Some(p) => polygons.push(p),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "dropped degenerate stl facets");
    }
    Ok(Mesh::from_polygons(polygons))
}
