//! Named, coloured and placed solids, and the export dispatch for them

use crate::aabb::Aabb;
use crate::errors::{CadError, CadResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::placement::Location;
use crate::traits::CSG;
use std::fmt::Write as _;
use std::path::Path;

/// Linear RGBA colour with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: Real,
    pub g: Real,
    pub b: Real,
    pub a: Real,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgba(0.5, 0.5, 0.5, 1.0);
    /// The pin colour of turned sockets
    pub const BRASS: Color = Color::rgba(1.0, 0.9, 0.7, 1.0);

    pub const fn rgba(r: Real, g: Real, b: Real, a: Real) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque colour from 8-bit channels, e.g. `Color::rgb255(255, 10, 50)`.
    pub fn rgb255(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r as Real / 255.0, g as Real / 255.0, b as Real / 255.0, 1.0)
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: Real) -> Self {
        Color::rgba(self.r, self.g, self.b, a)
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

/// One labelled solid in an [`Assembly`].
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    /// The solid in its own coordinates
    pub solid: Mesh,
    pub color: Color,
    pub location: Location,
}

impl Part {
    /// The solid moved to its place in the assembly.
    pub fn placed(&self) -> Mesh {
        self.solid.moved(&self.location)
    }
}

/// A flat list of uniquely named parts.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub name: String,
    /// Free text carried into exported metadata (e.g. a label that is not modelled)
    pub description: String,
    pub parts: Vec<Part>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Assembly {
            name: name.into(),
            description: String::new(),
            parts: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a part. Names must be unique within the assembly.
    pub fn add(&mut self, name: impl Into<String>, solid: Mesh, color: Color, location: Location) -> CadResult<()> {
        let name = name.into();
        if self.part(&name).is_some() {
            return Err(CadError::DuplicatePart(name));
        }
        tracing::debug!(assembly = %self.name, part = %name, polygons = solid.polygons.len(), "adding part");
        self.parts.push(Part {
            name,
            solid,
            color,
            location,
        });
        Ok(())
    }

    /// Builder form of [`Assembly::add`].
    pub fn with(mut self, name: impl Into<String>, solid: Mesh, color: Color, location: Location) -> CadResult<Self> {
        self.add(name, solid, color, location)?;
        Ok(self)
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// `(name, placed solid)` for every part, in insertion order.
    pub fn placed_solids(&self) -> Vec<(&str, Mesh)> {
        self.parts.iter().map(|p| (p.name.as_str(), p.placed())).collect()
    }

    /// All placed parts in one mesh, side by side and not fused.
    pub fn to_compound(&self) -> Mesh {
        let placed: Vec<Mesh> = self.parts.iter().map(Part::placed).collect();
        Mesh::merge_all(&placed)
    }

    /// Box around every placed part.
    pub fn bounding_box(&self) -> Aabb {
        self.parts
            .iter()
            .map(|p| p.placed().bounding_box())
            .fold(Aabb::empty(), |acc, bb| acc.merge(&bb))
    }

    /// Write the assembly, picking the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> CadResult<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            #[cfg(feature = "step-io")]
            "step" | "stp" => crate::io::step::write_step(self, path, &crate::io::step::StepExportParams::default()),
            #[cfg(feature = "stl-io")]
            "stl" => crate::io::stl::write_stl(&self.to_compound(), path),
            _ => Err(CadError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Textual stand-in for a viewer: logs every part and returns the tree.
    pub fn show(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({} parts)", self.name, self.parts.len());
        for part in &self.parts {
            let bb = part.placed().bounding_box();
            let c = part.color;
            tracing::info!(
                assembly = %self.name,
                part = %part.name,
                color = ?(c.r, c.g, c.b, c.a),
                polygons = part.solid.polygons.len(),
                "part"
            );
            let _ = writeln!(
                out,
                "  {:<24} rgba({:.2}, {:.2}, {:.2}, {:.2})  [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
                part.name, c.r, c.g, c.b, c.a, bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z
            );
        }
        out
    }
}
