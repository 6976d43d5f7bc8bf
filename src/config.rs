//! TOML configuration for the part generators and the exporter.
//!
//! Every table and every field is optional; an empty file gives the
//! dimensions the parts were drawn with.
//!
//! ```toml
//! [output]
//! directory = "./output"
//! format = "both"
//!
//! [mesh]
//! segments = 48
//!
//! [waddle]
//! cols = 10
//!
//! [references]
//! switch = "models/cherry_mx.stl"
//! ```

use crate::errors::{CadError, CadResult};
use crate::float_types::{DEFAULT_SEGMENTS, Real, set_tolerance};
use crate::parts::reference::{ReferenceModel, ReferenceModels};
use crate::parts::{Waddle, WaddleAlt};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub mesh: MeshConfig,
    pub waddle: Waddle,
    pub waddle_alt: WaddleAlt,
    pub references: ReferencesConfig,
}

/// Which files an assembly is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Step,
    Stl,
    Both,
}

impl ExportFormat {
    /// File extensions to write, in order.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Step => &["step"],
            ExportFormat::Stl => &["stl"],
            ExportFormat::Both => &["step", "stl"],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    pub directory: PathBuf,
    pub format: ExportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
            format: ExportFormat::Step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Segments per full circle.
    pub segments: usize,
    /// Plane classification epsilon in mm. Unset keeps the built-in value.
    pub tolerance: Option<Real>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            tolerance: None,
        }
    }
}

/// STL files for the switch and keycap reference models. Unset entries
/// fall back to proxy boxes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    pub switch: Option<PathBuf>,
    pub keycap: Option<PathBuf>,
}

impl ReferencesConfig {
    pub fn models(&self) -> ReferenceModels {
        let defaults = ReferenceModels::default();
        ReferenceModels {
            switch: self.switch.clone().map(ReferenceModel::Stl).unwrap_or(defaults.switch),
            keycap: self.keycap.clone().map(ReferenceModel::Stl).unwrap_or(defaults.keycap),
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> CadResult<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CadError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> CadResult<Config> {
        let config: Config = toml::from_str(content).map_err(|e| CadError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CadResult<()> {
        if self.mesh.segments < 3 {
            return Err(CadError::Config(format!(
                "mesh.segments must be at least 3, got {}",
                self.mesh.segments
            )));
        }
        if let Some(tolerance) = self.mesh.tolerance {
            CadError::check_positive("mesh.tolerance", tolerance)?;
        }
        for (table, cols, rows) in [
            ("waddle", self.waddle.cols, self.waddle.rows),
            ("waddle_alt", self.waddle_alt.cols, self.waddle_alt.rows),
        ] {
            if cols == 0 || rows == 0 {
                return Err(CadError::Config(format!("{table} needs at least one row and one column")));
            }
        }
        Ok(())
    }

    /// Push the mesh settings into the generators and the kernel. The
    /// tolerance can only be set once per process; later calls keep the
    /// first value.
    pub fn apply(&mut self) {
        if let Some(tolerance) = self.mesh.tolerance {
            if !set_tolerance(tolerance) {
                tracing::warn!(tolerance, "tolerance already set; keeping the earlier value");
            }
        }
        self.waddle.segments = self.mesh.segments;
        self.waddle_alt.segments = self.mesh.segments;
    }
}
