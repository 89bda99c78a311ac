//! Validity domains of 3-D models.

use earthmodel::Extent;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl From<(f64, f64)> for Range {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// Optional replacements for a model's own depth limits (km).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepthBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DepthBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Region in which a model is valid.
///
/// Longitude and latitude ranges are absent for models that are only
/// bounded in depth, such as point clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lon: Option<Range>,
    pub lat: Option<Range>,
    pub depth: Range,
}

impl BoundingBox {
    /// Returns a box bounded only in depth.
    pub fn depth_only(depth: Range) -> Self {
        Self {
            lon: None,
            lat: None,
            depth,
        }
    }

    /// Returns this box with `bounds` replacing its depth limits.
    #[must_use]
    pub fn with_depth_bounds(mut self, bounds: DepthBounds) -> Self {
        if let Some(min) = bounds.min {
            self.depth.min = min;
        }
        if let Some(max) = bounds.max {
            self.depth.max = max;
        }
        self
    }

    /// Returns whether `(lon, lat, depth)` lies within this box.
    ///
    /// `lon` must already be in the model's longitude convention.
    /// Every bound is inclusive.
    pub fn contains(&self, lon: f64, lat: f64, depth: f64) -> bool {
        self.depth.contains(depth)
            && self.lon.map_or(true, |range| range.contains(lon))
            && self.lat.map_or(true, |range| range.contains(lat))
    }
}

impl From<Extent> for BoundingBox {
    fn from(extent: Extent) -> Self {
        Self {
            lon: Some(extent.lon.into()),
            lat: Some(extent.lat.into()),
            depth: extent.depth.into(),
        }
    }
}
