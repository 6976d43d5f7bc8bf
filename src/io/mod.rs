//! File formats for meshes and assemblies
//!
//! Both writers are behind cargo features (`stl-io`, `step-io`), enabled by
//! default. Failures surface as [`CadError::Io`](crate::errors::CadError::Io)
//! carrying the offending path.

#[cfg(feature = "stl-io")]
pub mod stl;

#[cfg(feature = "step-io")]
pub mod step;
