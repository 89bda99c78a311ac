//! Conversions between the geographic query frame and the frames models
//! are stored in.

pub use earthmodel::{
    cartesian_to_geographic, geographic_to_cartesian, to_unit_sphere, unit_radius, wrap_signed,
};

/// Longitude range a model's coordinates use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LonConvention {
    /// -180° to 180°.
    #[default]
    Signed,

    /// 0° to 360°.
    Positive,
}

impl LonConvention {
    /// Guesses the convention of a model from its longitudes.
    ///
    /// Any longitude above 190° means the model uses 0°..360°. A
    /// signed model straddling the antimeridian with a few samples past
    /// 180° is still reported as signed.
    pub fn detect(longitudes: &[f64]) -> Self {
        let max = longitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 190.0 {
            Self::Positive
        } else {
            Self::Signed
        }
    }

    /// Maps a query longitude into this convention.
    pub fn normalize(self, lon: f64) -> f64 {
        match self {
            Self::Positive if lon < 0.0 => lon + 360.0,
            _ => lon,
        }
    }
}

/// Maps a query longitude into `convention`.
pub fn to_model_convention(lon: f64, convention: LonConvention) -> f64 {
    convention.normalize(lon)
}

#[cfg(test)]
mod tests {
    use super::{to_model_convention, LonConvention};

    #[test]
    fn test_detect() {
        assert_eq!(LonConvention::detect(&[0.0, 120.0, 359.0]), LonConvention::Positive);
        assert_eq!(LonConvention::detect(&[-180.0, 0.0, 180.0]), LonConvention::Signed);
        assert_eq!(LonConvention::detect(&[170.0, 185.0]), LonConvention::Signed);
        assert_eq!(LonConvention::detect(&[]), LonConvention::Signed);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(to_model_convention(-120.0, LonConvention::Positive), 240.0);
        assert_eq!(to_model_convention(-120.0, LonConvention::Signed), -120.0);
        assert_eq!(to_model_convention(120.0, LonConvention::Positive), 120.0);
    }
}
