//! Faceted ISO-10303-21 (STEP AP214) export
//!
//! Every part is written as a `FACETED_BREP`: a `CLOSED_SHELL` of planar
//! `FACE`s, each bounded by one `POLY_LOOP`. Part placements are baked into
//! the coordinates, so the assembly links every part to the root product
//! with an identity transform. Colours go into a single
//! `MECHANICAL_DESIGN_GEOMETRIC_PRESENTATION_REPRESENTATION`.
//!
//! A part whose mesh is not closed (see [`Mesh::is_manifold`]) is written as
//! an `OPEN_SHELL` surface model instead, so the file stays valid.

use crate::assembly::{Assembly, Color};
use crate::errors::{CadError, CadResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use std::fmt::Write as _;
use std::path::Path;

/// Points closer than this are written as one `CARTESIAN_POINT`.
const POINT_QUANTUM: Real = 1e-6;

/// Metadata that ends up in the STEP header and product descriptions.
#[derive(Debug, Clone)]
pub struct StepExportParams {
    pub author: String,
    pub organization: String,
    pub description: String,
    /// ISO 8601 time stamp; the current UTC time when `None`
    pub timestamp: Option<String>,
}

impl Default for StepExportParams {
    fn default() -> Self {
        StepExportParams {
            author: String::new(),
            organization: String::new(),
            description: String::from("waddle-cad faceted export"),
            timestamp: None,
        }
    }
}

impl StepExportParams {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// STEP real literal: always has a decimal point, never `-0.`.
fn real(v: Real) -> String {
    let mut v = (v * 1e6).round() / 1e6;
    if v == 0.0 {
        v = 0.0;
    }
    let mut s = format!("{v}");
    if !s.contains('.') {
        s.push('.');
    }
    s
}

fn string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn refs(ids: &[usize]) -> String {
    let items: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
    format!("({})", items.join(","))
}

/// `time` as `YYYY-MM-DDThh:mm:ss`, the form the FILE_NAME header takes.
fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Entity ids shared by every product in a file.
struct Context {
    product_ctx: usize,
    definition_ctx: usize,
    geometry_ctx: usize,
    axis: usize,
}

struct ProductIds {
    definition: usize,
    shape: usize,
}

struct PartIds {
    product: ProductIds,
    representation: usize,
    styled_item: usize,
}

/// Sequential entity writer: every `add` returns the new `#id`.
pub struct StepWriter {
    next_id: usize,
    data: String,
}

impl Default for StepWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StepWriter {
    pub fn new() -> Self {
        StepWriter {
            next_id: 1,
            data: String::new(),
        }
    }

    /// Append `#n=<entity>;` and return `n`.
    pub fn add(&mut self, entity: impl AsRef<str>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(self.data, "#{id}={};", entity.as_ref());
        id
    }

    /// Number of entities written so far.
    pub fn entity_count(&self) -> usize {
        self.next_id - 1
    }

    fn context(&mut self) -> Context {
        let app = self.add("APPLICATION_CONTEXT('core data for automotive mechanical design processes')");
        self.add(format!(
            "APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app})"
        ));
        let length = self.add("( LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(.MILLI.,.METRE.) )");
        let angle = self.add("( NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($,.RADIAN.) )");
        let solid = self.add("( NAMED_UNIT(*) SI_UNIT($,.STERADIAN.) SOLID_ANGLE_UNIT() )");
        let uncertainty = self.add(format!(
            "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-07),#{length},'distance_accuracy_value','confusion accuracy')"
        ));
        let geometry_ctx = self.add(format!(
            "( GEOMETRIC_REPRESENTATION_CONTEXT(3) GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty})) \
             GLOBAL_UNIT_ASSIGNED_CONTEXT((#{length},#{angle},#{solid})) \
             REPRESENTATION_CONTEXT('Context #1','3D Context with UNIT and UNCERTAINTY') )"
        ));
        let product_ctx = self.add(format!("PRODUCT_CONTEXT('',#{app},'mechanical')"));
        let definition_ctx = self.add(format!("PRODUCT_DEFINITION_CONTEXT('part definition',#{app},'design')"));

        let origin = self.add("CARTESIAN_POINT('',(0.,0.,0.))");
        let z = self.add("DIRECTION('',(0.,0.,1.))");
        let x = self.add("DIRECTION('',(1.,0.,0.))");
        let axis = self.add(format!("AXIS2_PLACEMENT_3D('',#{origin},#{z},#{x})"));

        Context {
            product_ctx,
            definition_ctx,
            geometry_ctx,
            axis,
        }
    }

    fn product(&mut self, ctx: &Context, name: &str, description: &str) -> ProductIds {
        let name = string(name);
        let product = self.add(format!(
            "PRODUCT({name},{name},{},(#{}))",
            string(description),
            ctx.product_ctx
        ));
        self.add(format!("PRODUCT_RELATED_PRODUCT_CATEGORY('part',$,(#{product}))"));
        let formation = self.add(format!("PRODUCT_DEFINITION_FORMATION('','',#{product})"));
        let definition = self.add(format!(
            "PRODUCT_DEFINITION('design','',#{formation},#{})",
            ctx.definition_ctx
        ));
        let shape = self.add(format!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"));
        ProductIds { definition, shape }
    }

    fn style(&mut self, color: Color, item: usize) -> usize {
        let rgb = self.add(format!(
            "COLOUR_RGB('',{},{},{})",
            real(color.r),
            real(color.g),
            real(color.b)
        ));
        let fill_colour = self.add(format!("FILL_AREA_STYLE_COLOUR('',#{rgb})"));
        let fill = self.add(format!("FILL_AREA_STYLE('',(#{fill_colour}))"));
        let area = self.add(format!("SURFACE_STYLE_FILL_AREA(#{fill})"));
        let mut styles = vec![area];
        if color.is_transparent() {
            styles.push(self.add(format!(
                "SURFACE_STYLE_TRANSPARENT({})",
                real((1.0 - color.a).clamp(0.0, 1.0))
            )));
        }
        let side = self.add(format!("SURFACE_SIDE_STYLE('',{})", refs(&styles)));
        let usage = self.add(format!("SURFACE_STYLE_USAGE(.BOTH.,#{side})"));
        let assignment = self.add(format!("PRESENTATION_STYLE_ASSIGNMENT((#{usage}))"));
        self.add(format!("STYLED_ITEM('color',(#{assignment}),#{item})"))
    }

    fn part(&mut self, ctx: &Context, name: &str, description: &str, mesh: &Mesh, color: Color) -> PartIds {
        let product = self.product(ctx, name, description);

        let mut points: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut faces = Vec::with_capacity(mesh.polygons.len());
        for polygon in &mesh.polygons {
            let mut ring: Vec<usize> = Vec::with_capacity(polygon.vertices.len());
            for v in &polygon.vertices {
                let p = v.pos;
                let key = (
                    (p.x / POINT_QUANTUM).round() as i64,
                    (p.y / POINT_QUANTUM).round() as i64,
                    (p.z / POINT_QUANTUM).round() as i64,
                );
                let id = match points.get(&key) {
                    Some(&id) => id,
                    None => {
                        let id = self.add(format!(
                            "CARTESIAN_POINT('',({},{},{}))",
                            real(p.x),
                            real(p.y),
                            real(p.z)
                        ));
                        points.insert(key, id);
                        id
                    },
                };
                if ring.last() != Some(&id) {
                    ring.push(id);
                }
            }
            while ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            if ring.len() < 3 {
                continue;
            }
            let poly_loop = self.add(format!("POLY_LOOP('',{})", refs(&ring)));
            let bound = self.add(format!("FACE_OUTER_BOUND('',#{poly_loop},.T.)"));
            faces.push(self.add(format!("FACE('',(#{bound}))")));
        }

        let label = string(name);
        let (item, representation) = if mesh.is_manifold() {
            let shell = self.add(format!("CLOSED_SHELL('',{})", refs(&faces)));
            let brep = self.add(format!("FACETED_BREP({label},#{shell})"));
            let rep = self.add(format!(
                "FACETED_BREP_SHAPE_REPRESENTATION({label},(#{},#{brep}),#{})",
                ctx.axis, ctx.geometry_ctx
            ));
            (brep, rep)
        } else {
            tracing::debug!(part = name, "mesh is not closed, writing a surface model");
            let shell = self.add(format!("OPEN_SHELL('',{})", refs(&faces)));
            let model = self.add(format!("SHELL_BASED_SURFACE_MODEL({label},(#{shell}))"));
            let rep = self.add(format!(
                "MANIFOLD_SURFACE_SHAPE_REPRESENTATION({label},(#{},#{model}),#{})",
                ctx.axis, ctx.geometry_ctx
            ));
            (model, rep)
        };
        self.add(format!(
            "SHAPE_DEFINITION_REPRESENTATION(#{},#{representation})",
            product.shape
        ));
        let styled_item = self.style(color, item);

        tracing::debug!(part = name, faces = faces.len(), points = points.len(), "step part");
        PartIds {
            product,
            representation,
            styled_item,
        }
    }

    fn presentation(&mut self, ctx: &Context, styled: &[usize]) {
        self.add(format!(
            "MECHANICAL_DESIGN_GEOMETRIC_PRESENTATION_REPRESENTATION('',{},#{})",
            refs(styled),
            ctx.geometry_ctx
        ));
    }

    /// Wrap the data section in the exchange-structure header.
    pub fn finish(self, file_name: &str, params: &StepExportParams) -> String {
        let timestamp = params
            .timestamp
            .clone()
            .unwrap_or_else(|| iso_timestamp(Utc::now()));
        let mut out = String::with_capacity(self.data.len() + 512);
        out.push_str("ISO-10303-21;\nHEADER;\n");
        let _ = writeln!(out, "FILE_DESCRIPTION(({}),'2;1');", string(&params.description));
        let _ = writeln!(
            out,
            "FILE_NAME({},{},({}),({}),'waddle-cad','waddle-cad','');",
            string(file_name),
            string(&timestamp),
            string(&params.author),
            string(&params.organization)
        );
        out.push_str("FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));\nENDSEC;\nDATA;\n");
        out.push_str(&self.data);
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        out
    }
}

/// The whole assembly as STEP text: one product per part under a root
/// product named after the assembly.
pub fn to_step_string(assembly: &Assembly, params: &StepExportParams) -> String {
    let mut w = StepWriter::new();
    let ctx = w.context();

    let parts: Vec<PartIds> = assembly
        .parts
        .iter()
        .map(|part| w.part(&ctx, &part.name, "", &part.placed(), part.color))
        .collect();

    let description = if assembly.description.is_empty() {
        params.description.as_str()
    } else {
        assembly.description.as_str()
    };
    let root = w.product(&ctx, &assembly.name, description);
    let root_rep = w.add(format!(
        "SHAPE_REPRESENTATION({},(#{}),#{})",
        string(&assembly.name),
        ctx.axis,
        ctx.geometry_ctx
    ));
    w.add(format!("SHAPE_DEFINITION_REPRESENTATION(#{},#{root_rep})", root.shape));

    for (k, (part, ids)) in assembly.parts.iter().zip(&parts).enumerate() {
        let usage = w.add(format!(
            "NEXT_ASSEMBLY_USAGE_OCCURRENCE('{}',{},'',#{},#{},$)",
            k + 1,
            string(&part.name),
            root.definition,
            ids.product.definition
        ));
        let placement = w.add(format!("PRODUCT_DEFINITION_SHAPE('Placement','',#{usage})"));
        let transform = w.add(format!("ITEM_DEFINED_TRANSFORMATION('','',#{},#{})", ctx.axis, ctx.axis));
        let relation = w.add(format!(
            "( REPRESENTATION_RELATIONSHIP('','',#{},#{root_rep}) \
             REPRESENTATION_RELATIONSHIP_WITH_TRANSFORMATION(#{transform}) SHAPE_REPRESENTATION_RELATIONSHIP() )",
            ids.representation
        ));
        w.add(format!("CONTEXT_DEPENDENT_SHAPE_REPRESENTATION(#{relation},#{placement})"));
    }

    let styled: Vec<usize> = parts.iter().map(|p| p.styled_item).collect();
    if !styled.is_empty() {
        w.presentation(&ctx, &styled);
    }
    tracing::debug!(assembly = %assembly.name, entities = w.entity_count(), "step assembly");
    w.finish(&assembly.name, params)
}

fn write_text(path: &Path, text: &str) -> CadResult<()> {
    std::fs::write(path, text).map_err(|e| CadError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "wrote step");
    Ok(())
}

/// Write an assembly to `path`.
pub fn write_step(assembly: &Assembly, path: impl AsRef<Path>, params: &StepExportParams) -> CadResult<()> {
    write_text(path.as_ref(), &to_step_string(assembly, params))
}

/// Write a single solid as one product named `name`.
pub fn write_step_mesh(mesh: &Mesh, name: &str, path: impl AsRef<Path>) -> CadResult<()> {
    let params = StepExportParams::default();
    let mut w = StepWriter::new();
    let ctx = w.context();
    let part = w.part(&ctx, name, &params.description, mesh, Color::default());
    w.presentation(&ctx, &[part.styled_item]);
    write_text(path.as_ref(), &w.finish(name, &params))
}
