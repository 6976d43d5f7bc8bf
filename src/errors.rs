//! Errors raised while building or exporting geometry

use std::path::PathBuf;

/// Everything that can go wrong between a parameter block and a written file.
///
/// Pure geometry (booleans, transforms) never fails; these errors come from
/// inputs that cannot describe a solid and from the filesystem.
#[derive(Debug, thiserror::Error)]
pub enum CadError {
    /// Two profiles handed to a loft do not pair up ring by ring
    #[error("profile mismatch: {0}")]
    ProfileMismatch(String),
    /// A profile collapsed (inset past its own width, or fewer than three points)
    #[error("degenerate profile: {0}")]
    DegenerateProfile(String),
    /// A dimension that must be positive or finite was not
    #[error("invalid dimension `{name}`: {value}")]
    InvalidDimension { name: &'static str, value: f64 },
    /// A polyhedron face refers to a point that does not exist
    #[error("face index {index} is out of range (points.len = {len})")]
    FaceIndexOutOfRange { index: usize, len: usize },
    /// An assembly already holds a part with this name
    #[error("assembly already contains a part named `{0}`")]
    DuplicatePart(String),
    /// The output extension is not one we can write
    #[error("unsupported output format `{0}`")]
    UnsupportedFormat(String),
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl CadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CadError::Io {
            path: path.into(),
            source,
        }
    }

    /// Reject non-finite or non-positive lengths.
    pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), CadError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(CadError::InvalidDimension { name, value })
        }
    }
}

pub type CadResult<T> = Result<T, CadError>;
