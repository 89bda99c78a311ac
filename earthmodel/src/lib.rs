//! Seismic Earth models.
//!
//! - [`ReferenceModel`]: radially symmetric models (AK135, PREM,
//!   IASP91) tabulated by depth.
//! - [`GriddedModel`]: tomographic models on a regular longitude,
//!   latitude, depth grid.
//! - [`PointCloud`]: tomographic models at scattered points.

mod cloud;
mod error;
mod frame;
mod grid;
mod interp;
mod kdtree;
mod reference;
mod samples;
mod spline;
mod tables;

pub use crate::{
    cloud::{read_detox, read_detox_file, read_mit, read_mit_file, PointCloud},
    error::ModelError,
    frame::{
        cartesian_to_geographic, geographic_to_cartesian, to_unit_sphere, unit_radius,
        wrap_signed, CloudFrame, Frame,
    },
    grid::{Extent, GridInterpolator, GriddedModel},
    interp::{Extrapolation, Interp1d, InterpKind},
    reference::{ReferenceModel, ReferenceSampler},
    samples::Attribute,
    tables::{
        read_ak135, read_ak135_file, read_iasp91, read_iasp91_file, read_prem, read_prem_file,
        Iasp91Table,
    },
};

/// Mean radius of the Earth (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Elastic properties at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Properties {
    /// Compressional wave velocity (km/s).
    pub vp: f64,

    /// Shear wave velocity (km/s).
    pub vs: f64,

    /// Density (g/cm³).
    pub rho: f64,
}
