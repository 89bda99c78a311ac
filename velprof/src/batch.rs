//! Profiles at many locations at once.

use crate::{Profile, ProfileBuilder, ProfileError};
use geo::geometry::Coord;
use rayon::prelude::*;

/// Builds one profile per location from `template`, in parallel.
///
/// Any location set on `template` is ignored. Models shared between
/// profiles are prepared once.
pub fn profiles(
    template: &ProfileBuilder<'_>,
    locations: &[Coord<f64>],
) -> Result<Vec<Profile>, ProfileError> {
    locations
        .par_iter()
        .map(|&location| template.clone().location(location).build())
        .collect()
}
