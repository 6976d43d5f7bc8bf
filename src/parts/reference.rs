//! Third-party reference models (switches, keycaps) used for fit checks

use crate::errors::CadResult;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::shapes::centered_box;
use crate::placement::Location;
use crate::traits::CSG;
use nalgebra::Vector3;
use std::path::PathBuf;

/// A model that is either loaded from disk or replaced by a box of the
/// same footprint.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceModel {
    /// A box centred on the origin
    Proxy { w: Real, d: Real, h: Real },
    /// An STL file, in the orientation it was drawn
    Stl(PathBuf),
}

impl ReferenceModel {
    /// Cherry MX switch, 3.6 + 11.6 + 3.3 mm tall.
    pub const fn cherry_mx_proxy() -> Self {
        ReferenceModel::Proxy {
            w: 15.6,
            d: 15.6,
            h: 3.6 + 11.6 + 3.3,
        }
    }

    /// DSA 1u keycap.
    pub const fn dsa_1u_proxy() -> Self {
        ReferenceModel::Proxy {
            w: 15.6,
            d: 15.6,
            h: 10.0,
        }
    }

    /// The mesh of this model. Proxies come out as they are; an STL is moved
    /// by `stl_fix` first, since the published models are drawn Y-up.
    ///
    /// A missing or unreadable STL is an [`Io`](crate::errors::CadError::Io)
    /// error.
    pub fn load(&self, stl_fix: &Location) -> CadResult<Mesh> {
        match self {
            ReferenceModel::Proxy { w, d, h } => Ok(centered_box(*w, *d, *h)),
            ReferenceModel::Stl(path) => {
                #[cfg(feature = "stl-io")]
                {
                    Ok(crate::io::stl::read_stl(path)?.moved(stl_fix))
                }
                #[cfg(not(feature = "stl-io"))]
                {
                    let _ = stl_fix;
                    Err(crate::errors::CadError::UnsupportedFormat(path.display().to_string()))
                }
            },
        }
    }
}

/// Y-up model turned Z-up and then shifted by `(dx, dy, dz)`.
pub fn y_up_fix(dx: Real, dy: Real, dz: Real) -> Location {
    Location::rotation(Vector3::x(), 90.0).then(&Location::translation(dx, dy, dz))
}

/// The switch and keycap models a keyboard is checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModels {
    pub switch: ReferenceModel,
    pub keycap: ReferenceModel,
}

impl Default for ReferenceModels {
    fn default() -> Self {
        ReferenceModels {
            switch: ReferenceModel::cherry_mx_proxy(),
            keycap: ReferenceModel::dsa_1u_proxy(),
        }
    }
}

impl ReferenceModels {
    /// One switch, standing in its plate position at the origin.
    pub fn switch_mesh(&self) -> CadResult<Mesh> {
        self.switch.load(&y_up_fix(0.0, -1.0, -1.0))
    }

    /// One keycap, centred on the origin.
    pub fn keycap_mesh(&self) -> CadResult<Mesh> {
        self.keycap.load(&y_up_fix(0.0, 0.0, -7.97 / 2.0))
    }
}
