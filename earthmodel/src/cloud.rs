//! Tomographic models sampled at scattered points.

use crate::{
    frame::{cartesian_to_geographic, wrap_signed},
    kdtree::KdTree,
    tables::{open, whitespace_rows},
    CloudFrame, ModelError, EARTH_RADIUS_KM,
};
use std::{io::BufRead, path::Path};

/// Scattered `(a, b, c)` points carrying one value each, answered by
/// nearest neighbour.
#[derive(Debug, Clone)]
pub struct PointCloud {
    frame: CloudFrame,
    values: Vec<f64>,
    tree: KdTree,

    /// Shallowest and deepest point (km).
    depth: (f64, f64),
}

impl PointCloud {
    pub fn new(
        frame: CloudFrame,
        coords: Vec<[f64; 3]>,
        values: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if coords.len() != values.len() {
            return Err(ModelError::LengthMismatch(coords.len(), values.len()));
        }
        if coords.is_empty() {
            return Err(ModelError::EmptyCloud);
        }
        let depth = coords
            .iter()
            .map(|&p| frame.depth_of(p))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            });
        Ok(Self {
            frame,
            values,
            tree: KdTree::new(coords),
            depth,
        })
    }

    pub fn frame(&self) -> CloudFrame {
        self.frame
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn coords(&self) -> &[[f64; 3]] {
        self.tree.points()
    }

    /// Returns the `(shallowest, deepest)` point depth (km).
    pub fn depth_range(&self) -> (f64, f64) {
        self.depth
    }

    /// Returns the value of the point nearest to `point`, given in this
    /// cloud's frame.
    pub fn nearest(&self, point: [f64; 3]) -> f64 {
        // Clouds are never empty.
        self.tree
            .nearest(point)
            .map_or(f64::NAN, |idx| self.values[idx])
    }

    /// Returns the value nearest to geographic `lon`°, `lat`°, `depth`
    /// km.
    pub fn sample(&self, lon: f64, lat: f64, depth: f64) -> f64 {
        self.nearest(self.frame.project(lon, lat, depth))
    }

    /// Returns this cloud with coordinates as longitude°, latitude°,
    /// radius km.
    pub fn to_geographic(&self) -> Self {
        let coords = self
            .coords()
            .iter()
            .map(|&[a, b, c]| match self.frame {
                CloudFrame::Geographic => [a, b, c],
                CloudFrame::UnitSphere => [a.to_degrees(), b.to_degrees(), c * EARTH_RADIUS_KM],
                CloudFrame::Cartesian => {
                    let (lon, lat, radius) = cartesian_to_geographic(a, b, c);
                    [lon, lat, radius]
                }
            })
            .collect();
        self.with_coords(CloudFrame::Geographic, coords)
    }

    /// Returns this cloud with coordinates as longitude rad, latitude
    /// rad, radius as a fraction of the Earth's radius.
    pub fn to_unit_sphere(&self) -> Self {
        let coords = self
            .to_geographic()
            .coords()
            .iter()
            .map(|&[lon, lat, radius]| {
                [lon.to_radians(), lat.to_radians(), radius / EARTH_RADIUS_KM]
            })
            .collect();
        self.with_coords(CloudFrame::UnitSphere, coords)
    }
}

/// Private API.
impl PointCloud {
    fn with_coords(&self, frame: CloudFrame, coords: Vec<[f64; 3]>) -> Self {
        Self {
            frame,
            values: self.values.clone(),
            tree: KdTree::new(coords),
            depth: self.depth,
        }
    }
}

/// Reads a DETOX table: two header lines, then whitespace separated
/// `x y z dvp` rows in Cartesian km.
pub fn read_detox<R: BufRead>(rdr: R) -> Result<PointCloud, ModelError> {
    let (mut coords, mut values) = (Vec::new(), Vec::new());
    for row in whitespace_rows(rdr, 2, 4) {
        let row = row?;
        coords.push([row[0], row[1], row[2]]);
        values.push(row[3]);
    }
    PointCloud::new(CloudFrame::Cartesian, coords, values)
}

/// Reads an MIT table: one header line, then whitespace separated
/// `lat lon depth dvp` rows.
///
/// Longitudes above 180° are wrapped into the signed range.
pub fn read_mit<R: BufRead>(rdr: R) -> Result<PointCloud, ModelError> {
    let (mut coords, mut values) = (Vec::new(), Vec::new());
    for row in whitespace_rows(rdr, 1, 4) {
        let row = row?;
        coords.push([wrap_signed(row[1]), row[0], EARTH_RADIUS_KM - row[2]]);
        values.push(row[3]);
    }
    PointCloud::new(CloudFrame::Geographic, coords, values)
}

pub fn read_detox_file<P: AsRef<Path>>(path: P) -> Result<PointCloud, ModelError> {
    read_detox(open(path)?)
}

pub fn read_mit_file<P: AsRef<Path>>(path: P) -> Result<PointCloud, ModelError> {
    read_mit(open(path)?)
}

#[cfg(test)]
mod tests {
    use super::{read_detox, read_mit, PointCloud};
    use crate::{frame::geographic_to_cartesian, CloudFrame, ModelError};
    use approx::assert_relative_eq;

    const MIT: &str = "\
lat lon depth dvp
10.0 350.0 100.0 0.5
10.0 10.0 100.0 -0.25
-20.0 15.0 500.0 1.0
";

    #[test]
    fn test_read_mit() {
        let cloud = read_mit(MIT.as_bytes()).unwrap();
        assert_eq!(cloud.frame(), CloudFrame::Geographic);
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.coords()[0], [-10.0, 10.0, 6271.0]);
        assert_eq!(cloud.depth_range(), (100.0, 500.0));
        assert_eq!(cloud.sample(-9.0, 10.0, 110.0), 0.5);
        assert_eq!(cloud.sample(9.0, 10.0, 90.0), -0.25);
    }

    #[test]
    fn test_read_detox() {
        let [x, y, z] = geographic_to_cartesian(30.0, -10.0, 5871.0);
        let text = format!("DETOX-P1\nx y z dvp\n{x} {y} {z} 0.75\n0.0 0.0 6371.0 0.1\n");
        let cloud = read_detox(text.as_bytes()).unwrap();
        assert_eq!(cloud.frame(), CloudFrame::Cartesian);
        assert_relative_eq!(cloud.depth_range().0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(cloud.depth_range().1, 500.0, epsilon = 1e-9);
        assert_eq!(cloud.sample(30.0, -10.0, 480.0), 0.75);

        let geo = cloud.to_geographic();
        let [lon, lat, radius] = geo.coords().iter().copied().find(|p| p[2] < 6000.0).unwrap();
        assert_relative_eq!(lon, 30.0, epsilon = 1e-9);
        assert_relative_eq!(lat, -10.0, epsilon = 1e-9);
        assert_relative_eq!(radius, 5871.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_sphere_cloud_samples_the_same() {
        let cloud = read_mit(MIT.as_bytes()).unwrap();
        let unit = cloud.to_unit_sphere();
        assert_eq!(unit.frame(), CloudFrame::UnitSphere);
        for (lon, lat, depth) in [(-9.0, 10.0, 110.0), (14.0, -19.0, 480.0)] {
            assert_eq!(unit.sample(lon, lat, depth), cloud.sample(lon, lat, depth));
        }
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert!(matches!(
            read_mit("lat lon depth dvp\n".as_bytes()),
            Err(ModelError::EmptyCloud)
        ));
        assert!(matches!(
            PointCloud::new(CloudFrame::Geographic, vec![[0.0; 3]], vec![]),
            Err(ModelError::LengthMismatch(1, 0))
        ));
        assert!(matches!(
            read_detox("h\nh\n1 2 3\n".as_bytes()),
            Err(ModelError::Parse { line: 3, .. })
        ));
    }
}
