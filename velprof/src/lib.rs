//! Seismic velocity profiles that blend a 1-D reference Earth model
//! with 3-D tomographic models wherever those are valid.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use geo::geometry::Coord;
//! use velprof::{GridAttribute, Perturbation, Profile, Source};
//!
//! let reference = earthmodel::read_ak135_file("ak135f.csv")?;
//! # let model: earthmodel::GriddedModel = unimplemented!();
//! let dvs = GridAttribute::named(&model, "dvs")?;
//! let profile = Profile::builder()
//!     .location(Coord { x: -120.0, y: 40.0 })
//!     .depths(&[0.0, 50.0, 100.0, 200.0])
//!     .reference(&reference)
//!     .vs(Source::new(&dvs).perturbation(Perturbation::Percent))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod coords;
pub mod domain;
mod error;
pub mod layers;
pub mod math;
pub mod perturbation;
mod profile;
mod sampler;

pub use crate::{
    coords::LonConvention,
    domain::{BoundingBox, DepthBounds, Range},
    error::ProfileError,
    perturbation::{
        convert_to_absolute, to_absolute, ConvertOptions, Mode, Perturbation, SlownessPolicy,
    },
    profile::{Ordering, Profile, ProfileBuilder},
    sampler::{CloudSampler, GridAttribute, GridMean, Sampler, Source},
};
