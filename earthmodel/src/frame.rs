//! Coordinate frames models are stored or interpolated in.
//!
//! Geographic coordinates are longitude and latitude in degrees.
//! Cartesian coordinates are kilometers from the Earth's center with
//! `z` through the north pole and `x` through (0°, 0°).

use crate::EARTH_RADIUS_KM;

/// Frame a [`GriddedModel`](crate::GriddedModel) prepares its
/// interpolators in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// Longitude°, latitude°, depth km.
    #[default]
    Geographic,

    /// Longitude rad, latitude rad, depth as a fraction of the Earth's
    /// radius.
    UnitSphere,
}

impl Frame {
    /// Maps a geographic `(lon°, lat°, depth km)` into this frame.
    pub fn project(self, lon: f64, lat: f64, depth: f64) -> (f64, f64, f64) {
        match self {
            Self::Geographic => (lon, lat, depth),
            Self::UnitSphere => to_unit_sphere(lon, lat, depth, EARTH_RADIUS_KM),
        }
    }
}

/// Frame of a [`PointCloud`](crate::PointCloud)'s coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudFrame {
    /// Longitude°, latitude°, radius km.
    Geographic,

    /// Longitude rad, latitude rad, radius as a fraction of the Earth's
    /// radius.
    UnitSphere,

    /// x, y, z km.
    Cartesian,
}

impl CloudFrame {
    /// Maps a geographic `(lon°, lat°, depth km)` into this frame.
    pub fn project(self, lon: f64, lat: f64, depth: f64) -> [f64; 3] {
        let radius = EARTH_RADIUS_KM - depth;
        match self {
            Self::Geographic => [lon, lat, radius],
            Self::UnitSphere => [
                lon.to_radians(),
                lat.to_radians(),
                unit_radius(depth, EARTH_RADIUS_KM),
            ],
            Self::Cartesian => geographic_to_cartesian(lon, lat, radius),
        }
    }

    /// Returns the depth (km) of a point stored in this frame.
    pub fn depth_of(self, [a, b, c]: [f64; 3]) -> f64 {
        match self {
            Self::Geographic => EARTH_RADIUS_KM - c,
            Self::UnitSphere => EARTH_RADIUS_KM * (1.0 - c),
            Self::Cartesian => EARTH_RADIUS_KM - (a * a + b * b + c * c).sqrt(),
        }
    }
}

/// Converts geographic degrees and depth to radians and depth as a
/// fraction of `earth_radius`.
pub fn to_unit_sphere(lon: f64, lat: f64, depth: f64, earth_radius: f64) -> (f64, f64, f64) {
    (lon.to_radians(), lat.to_radians(), depth / earth_radius)
}

/// Radius, as a fraction of `earth_radius`, of a point `depth` km down.
pub fn unit_radius(depth: f64, earth_radius: f64) -> f64 {
    (earth_radius - depth) / earth_radius
}

pub fn geographic_to_cartesian(lon: f64, lat: f64, radius: f64) -> [f64; 3] {
    let colat = (90.0 - lat).to_radians();
    let lon = lon.to_radians();
    [
        radius * colat.sin() * lon.cos(),
        radius * colat.sin() * lon.sin(),
        radius * colat.cos(),
    ]
}

/// Returns `(lon°, lat°, radius)` of a Cartesian point.
pub fn cartesian_to_geographic(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let radius = (x * x + y * y + z * z).sqrt();
    let colat = (z / radius).acos();
    let lon = y.atan2(x);
    (lon.to_degrees(), 90.0 - colat.to_degrees(), radius)
}

/// Maps longitudes above 180° into the signed range.
pub fn wrap_signed(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}
