//! Conversion of model perturbations into absolute velocities or
//! slownesses.

use crate::ProfileError;
use earthmodel::{Extrapolation, Interp1d, InterpKind, ModelError, EARTH_RADIUS_KM};
use std::{fmt, str::FromStr};

/// How a 3-D model's values relate to the reference model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Perturbation {
    /// Values are absolute and replace the reference.
    Absolute,

    /// Values are fractional deviations from the reference.
    #[default]
    Fraction,

    /// Values are percent deviations from the reference.
    Percent,
}

/// Returns the absolute value of `raw` relative to `reference`.
pub fn to_absolute(raw: f64, reference: f64, perturbation: Perturbation) -> f64 {
    match perturbation {
        Perturbation::Absolute => raw,
        Perturbation::Fraction => raw * reference + reference,
        Perturbation::Percent => (raw / 100.0) * reference + reference,
    }
}

/// Whether profiles report velocities or their reciprocals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// km/s.
    #[default]
    Velocity,

    /// s/km.
    Slowness,
}

impl FromStr for Mode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, ProfileError> {
        match s {
            "velocity" => Ok(Self::Velocity),
            "slowness" => Ok(Self::Slowness),
            other => Err(ProfileError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Velocity => "velocity",
            Self::Slowness => "slowness",
        })
    }
}

/// What to do with velocities that have no physical meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlownessPolicy {
    /// Fail on a negative velocity, or on one too small to invert
    /// when computing slowness.
    #[default]
    Strict,

    /// Report non-positive velocities as zero slowness; velocities
    /// pass through untouched.
    ZeroInvalid,
}

/// Applies `mode` to the velocity at `index` under `policy`.
pub fn apply_mode(
    value: f64,
    index: usize,
    mode: Mode,
    policy: SlownessPolicy,
) -> Result<f64, ProfileError> {
    match (policy, mode) {
        (SlownessPolicy::Strict, _) if value < 0.0 => {
            Err(ProfileError::NegativeVelocity { index, value })
        }
        (SlownessPolicy::Strict, Mode::Slowness) if value < f64::EPSILON => {
            Err(ProfileError::VanishingVelocity { index, value })
        }
        (SlownessPolicy::ZeroInvalid, Mode::Slowness) if value <= 0.0 => Ok(0.0),
        (_, Mode::Slowness) => Ok(1.0 / value),
        (_, Mode::Velocity) => Ok(value),
    }
}

/// Options for [`convert_to_absolute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    pub mode: Mode,

    /// Interpolation of the reference velocity over radius.
    pub kind: InterpKind,

    pub perturbation: Perturbation,

    /// Multiplier taking the perturbations' radii into the reference
    /// radii's units; [`EARTH_RADIUS_KM`] for unit-sphere radii.
    pub radius_scale: f64,

    pub policy: SlownessPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Velocity,
            kind: InterpKind::Linear,
            perturbation: Perturbation::Fraction,
            radius_scale: 1.0,
            policy: SlownessPolicy::Strict,
        }
    }
}

impl ConvertOptions {
    /// Options for perturbations located by unit-sphere radius.
    pub fn unit_sphere() -> Self {
        Self {
            radius_scale: EARTH_RADIUS_KM,
            ..Self::default()
        }
    }
}

/// Converts `perturbations` located at `radii` into absolute
/// velocities (or slownesses) against `reference_velocity` tabulated at
/// `reference_radius`.
///
/// The reference is clamped to its minimum outside its radius range.
pub fn convert_to_absolute(
    perturbations: &[f64],
    radii: &[f64],
    reference_velocity: &[f64],
    reference_radius: &[f64],
    opts: &ConvertOptions,
) -> Result<Vec<f64>, ProfileError> {
    if perturbations.len() != radii.len() {
        return Err(ModelError::LengthMismatch(radii.len(), perturbations.len()).into());
    }
    if reference_velocity.len() != reference_radius.len() {
        return Err(
            ModelError::LengthMismatch(reference_radius.len(), reference_velocity.len()).into(),
        );
    }

    // Reference tables usually list radius descending.
    let mut rows: Vec<(f64, f64)> = reference_radius
        .iter()
        .copied()
        .zip(reference_velocity.iter().copied())
        .collect();
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    rows.dedup_by(|later, earlier| later.0 == earlier.0);
    let (xs, ys) = rows.into_iter().unzip();
    let reference = Interp1d::new(xs, ys, opts.kind, Extrapolation::ClampToMinimum)?;

    perturbations
        .iter()
        .zip(radii)
        .enumerate()
        .map(|(index, (&raw, &radius))| {
            let reference = reference.eval(radius * opts.radius_scale);
            let absolute = to_absolute(raw, reference, opts.perturbation);
            apply_mode(absolute, index, opts.mode, opts.policy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_absolute() {
        assert_relative_eq!(to_absolute(0.02, 8.0, Perturbation::Fraction), 8.16, epsilon = 1e-12);
        assert_relative_eq!(to_absolute(2.0, 8.0, Perturbation::Percent), 8.16, epsilon = 1e-12);
        assert_eq!(to_absolute(7.5, 8.0, Perturbation::Absolute), 7.5);
        assert_eq!(to_absolute(0.0, 8.0, Perturbation::Fraction), 8.0);
        assert_eq!(to_absolute(0.0, 8.0, Perturbation::Percent), 8.0);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("slowness".parse::<Mode>().unwrap(), Mode::Slowness);
        assert_eq!("velocity".parse::<Mode>().unwrap(), Mode::Velocity);
        assert!(matches!(
            "Velocity".parse::<Mode>(),
            Err(ProfileError::UnknownMode(s)) if s == "Velocity"
        ));
    }

    #[test]
    fn test_apply_mode() {
        use Mode::*;
        use SlownessPolicy::*;
        assert_eq!(apply_mode(4.0, 0, Slowness, Strict).unwrap(), 0.25);
        assert_eq!(apply_mode(4.0, 0, Velocity, Strict).unwrap(), 4.0);
        assert_eq!(apply_mode(0.0, 0, Slowness, ZeroInvalid).unwrap(), 0.0);
        assert_eq!(apply_mode(-1.0, 0, Slowness, ZeroInvalid).unwrap(), 0.0);
        assert_eq!(apply_mode(-1.0, 0, Velocity, ZeroInvalid).unwrap(), -1.0);
        assert!(matches!(
            apply_mode(-1.0, 3, Velocity, Strict),
            Err(ProfileError::NegativeVelocity { index: 3, .. })
        ));
        assert!(matches!(
            apply_mode(0.0, 5, Slowness, Strict),
            Err(ProfileError::VanishingVelocity { index: 5, .. })
        ));
    }

    #[test]
    fn test_convert_to_absolute() {
        // Radius descending, as read from a reference table.
        let ref_radius = [6371.0, 6271.0, 6171.0];
        let ref_vp = [6.0, 8.0, 9.0];
        let dvp = [0.1, -0.1, 0.0];
        let radii = [6371.0, 6221.0, 7000.0];
        let vp = convert_to_absolute(&dvp, &radii, &ref_vp, &ref_radius, &ConvertOptions::default())
            .unwrap();
        assert_relative_eq!(vp[0], 6.6, epsilon = 1e-12);
        assert_relative_eq!(vp[1], 7.65, epsilon = 1e-12);
        // Outside the table the reference is its minimum.
        assert_relative_eq!(vp[2], 6.0, epsilon = 1e-12);

        let unit: Vec<f64> = radii.iter().map(|r| r / EARTH_RADIUS_KM).collect();
        let slowness = convert_to_absolute(
            &dvp,
            &unit,
            &ref_vp,
            &ref_radius,
            &ConvertOptions {
                mode: Mode::Slowness,
                ..ConvertOptions::unit_sphere()
            },
        )
        .unwrap();
        assert_relative_eq!(slowness[0], 1.0 / 6.6, epsilon = 1e-12);
        assert_relative_eq!(slowness[1], 1.0 / 7.65, epsilon = 1e-9);
    }

    #[test]
    fn test_convert_reports_first_bad_point() {
        let err = convert_to_absolute(
            &[0.0, -2.0, -3.0],
            &[6371.0, 6300.0, 6200.0],
            &[6.0, 8.0],
            &[6371.0, 6171.0],
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::NegativeVelocity { index: 1, .. }));

        let err = convert_to_absolute(
            &[-1.0],
            &[6371.0],
            &[6.0, 8.0],
            &[6371.0, 6171.0],
            &ConvertOptions {
                mode: Mode::Slowness,
                ..ConvertOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::VanishingVelocity { index: 0, .. }));
    }
}
