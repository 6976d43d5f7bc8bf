//! Parametric keyboard hardware built on a small **Constructive Solid Geometry (CSG)** kernel.
//!
//! The kernel does boolean operations (*union*, *difference*, *intersection*)
//! on polygon meshes stored in [BSP](mesh::bsp) trees. 2D [sketches](sketch)
//! come from `geo` and are extruded or lofted into meshes.
//! On top of it sit the part generators in [`parts`]: keycaps, a Pro Micro
//! proxy, a DIL socket and two keyboard shells. Each one is collected into a named,
//! coloured [`Assembly`](assembly::Assembly) and exported to STEP or STL.
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - [**step-io**](https://en.wikipedia.org/wiki/ISO_10303-21): faceted AP214 `.step` export
//!
//! #### Optional
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod assembly;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod parts;
pub mod placement;
pub mod sketch;
pub mod traits;

pub use assembly::{Assembly, Color};
pub use errors::{CadError, CadResult};
pub use mesh::Mesh;
pub use placement::Location;
pub use sketch::{EdgeTreatment, Sketch};
pub use traits::CSG;
