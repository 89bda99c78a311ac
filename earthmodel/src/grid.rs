//! Regular 3-D tomographic models.

use crate::{Attribute, Frame, ModelError, EARTH_RADIUS_KM};
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;

/// Inclusive `(min, max)` coordinate ranges of a gridded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub lon: (f64, f64),
    pub lat: (f64, f64),
    pub depth: (f64, f64),
}

/// A tomographic model sampled on a regular longitude, latitude, depth
/// grid.
///
/// Attribute samples are laid out `(depth, latitude, longitude)`
/// major, i.e. longitude varies fastest.
pub struct GriddedModel {
    lon: Vec<f64>,
    lat: Vec<f64>,
    depth: Vec<f64>,
    attributes: Vec<Attribute>,

    /// Frame interpolators are prepared in.
    frame: Frame,

    /// Interpolators which have been prepared on demand.
    interpolators: DashMap<usize, Arc<GridInterpolator>>,
}

impl GriddedModel {
    /// Returns a model over the given axes.
    ///
    /// Each axis must be strictly monotonic (ascending or descending)
    /// with at least two coordinates, and every attribute must hold
    /// exactly `depth.len() * lat.len() * lon.len()` samples.
    pub fn new(
        lon: Vec<f64>,
        lat: Vec<f64>,
        depth: Vec<f64>,
        attributes: Vec<Attribute>,
        frame: Frame,
    ) -> Result<Self, ModelError> {
        check_axis(&lon, "longitude")?;
        check_axis(&lat, "latitude")?;
        check_axis(&depth, "depth")?;
        let expected = lon.len() * lat.len() * depth.len();
        for attr in &attributes {
            if attr.len() != expected {
                return Err(ModelError::Shape {
                    expected,
                    got: attr.len(),
                });
            }
        }
        Ok(Self {
            lon,
            lat,
            depth,
            attributes,
            frame,
            interpolators: DashMap::new(),
        })
    }

    /// Same as [`GriddedModel::new`] for datasets whose vertical axis
    /// is radius (km) rather than depth.
    pub fn from_radius(
        lon: Vec<f64>,
        lat: Vec<f64>,
        radius: Vec<f64>,
        attributes: Vec<Attribute>,
        frame: Frame,
    ) -> Result<Self, ModelError> {
        let depth = radius.iter().map(|r| EARTH_RADIUS_KM - r).collect();
        Self::new(lon, lat, depth, attributes, frame)
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.lon
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.lat
    }

    pub fn depths(&self) -> &[f64] {
        &self.depth
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Returns the index of the attribute called `name`, if any.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn attribute(&self, attr: usize) -> Result<&Attribute, ModelError> {
        self.attributes
            .get(attr)
            .ok_or(ModelError::UnknownAttribute(attr))
    }

    /// Returns the coordinate ranges spanned by this model's axes.
    pub fn extent(&self) -> Extent {
        Extent {
            lon: span(&self.lon),
            lat: span(&self.lat),
            depth: span(&self.depth),
        }
    }

    /// Returns whether `attr`'s interpolator has been built.
    pub fn is_prepared(&self, attr: usize) -> bool {
        self.interpolators.contains_key(&attr)
    }

    /// Returns the interpolator for `attr`, building it on first use.
    ///
    /// Concurrent first callers block until the one building the
    /// interpolator is done; it is never rebuilt. Once built, callers
    /// only take a shared lock.
    pub fn prepare(&self, attr: usize) -> Result<Arc<GridInterpolator>, ModelError> {
        if let Some(interpolator) = self.interpolators.get(&attr) {
            return Ok(Arc::clone(&interpolator));
        }
        self.interpolators
            .entry(attr)
            .or_try_insert_with(|| {
                let attribute = self.attribute(attr)?;
                debug!(
                    "preparing {} interpolator for '{}'",
                    self.frame_name(),
                    attribute.name()
                );
                Ok(Arc::new(GridInterpolator::new(self, attribute)))
            })
            .map(|r| r.clone())
    }

    /// Returns `attr` trilinearly interpolated at geographic `lon`° and
    /// `lat`°, `depth` km.
    ///
    /// Queries outside the grid are clamped to its edge.
    pub fn sample(&self, attr: usize, lon: f64, lat: f64, depth: f64) -> Result<f64, ModelError> {
        let interpolator = self.prepare(attr)?;
        let (a, b, c) = self.frame.project(lon, lat, depth);
        Ok(interpolator.eval(a, b, c))
    }
}

/// Private API.
impl GriddedModel {
    fn frame_name(&self) -> &'static str {
        match self.frame {
            Frame::Geographic => "geographic",
            Frame::UnitSphere => "unit-sphere",
        }
    }
}

impl std::fmt::Debug for GriddedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GriddedModel")
            .field("extent", &self.extent())
            .field("shape", &(self.depth.len(), self.lat.len(), self.lon.len()))
            .field("attributes", &self.attributes)
            .field("frame", &self.frame)
            .finish()
    }
}

/// Trilinear interpolator over one attribute, with every axis
/// ascending and expressed in the owning model's [`Frame`].
#[derive(Debug)]
pub struct GridInterpolator {
    lon: Vec<f64>,
    lat: Vec<f64>,
    depth: Vec<f64>,
    values: Box<[f64]>,
}

impl GridInterpolator {
    fn new(model: &GriddedModel, attr: &Attribute) -> Self {
        let (nx, ny, nz) = (model.lon.len(), model.lat.len(), model.depth.len());
        let flip = |axis: &[f64]| axis[0] > axis[axis.len() - 1];
        let (flip_x, flip_y, flip_z) = (flip(&model.lon), flip(&model.lat), flip(&model.depth));
        let src = |i: usize, n: usize, flipped: bool| if flipped { n - 1 - i } else { i };

        let mut values = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            let kk = src(k, nz, flip_z);
            for j in 0..ny {
                let jj = src(j, ny, flip_y);
                for i in 0..nx {
                    let ii = src(i, nx, flip_x);
                    values.push(attr.get_unchecked((kk * ny + jj) * nx + ii));
                }
            }
        }

        let (lon, lat, depth) = match model.frame {
            Frame::Geographic => (
                ascending(&model.lon, flip_x, |v| v),
                ascending(&model.lat, flip_y, |v| v),
                ascending(&model.depth, flip_z, |v| v),
            ),
            Frame::UnitSphere => (
                ascending(&model.lon, flip_x, f64::to_radians),
                ascending(&model.lat, flip_y, f64::to_radians),
                ascending(&model.depth, flip_z, |v| v / EARTH_RADIUS_KM),
            ),
        };

        Self {
            lon,
            lat,
            depth,
            values: values.into_boxed_slice(),
        }
    }

    /// Returns the interpolated value at frame coordinates `(a, b, c)`.
    pub fn eval(&self, a: f64, b: f64, c: f64) -> f64 {
        if a.is_nan() || b.is_nan() || c.is_nan() {
            return f64::NAN;
        }
        let (i, tx) = bracket(&self.lon, a);
        let (j, ty) = bracket(&self.lat, b);
        let (k, tz) = bracket(&self.depth, c);
        let (nx, ny) = (self.lon.len(), self.lat.len());
        let at = |k: usize, j: usize, i: usize| self.values[(k * ny + j) * nx + i];
        let lerp = |v0: f64, v1: f64, t: f64| v0 * (1.0 - t) + v1 * t;

        let plane = |k: usize| {
            let south = lerp(at(k, j, i), at(k, j, i + 1), tx);
            let north = lerp(at(k, j + 1, i), at(k, j + 1, i + 1), tx);
            lerp(south, north, ty)
        };
        lerp(plane(k), plane(k + 1), tz)
    }
}

/// Returns `axis` mapped through `f` in ascending order.
fn ascending(axis: &[f64], flipped: bool, f: impl Fn(f64) -> f64) -> Vec<f64> {
    let mut axis: Vec<f64> = axis.iter().map(|&v| f(v)).collect();
    if flipped {
        axis.reverse();
    }
    axis
}

/// Returns the index of the cell containing `x` and `x`'s fractional
/// position in it, clamped to the axis.
fn bracket(axis: &[f64], x: f64) -> (usize, f64) {
    let n = axis.len();
    if x <= axis[0] {
        return (0, 0.0);
    }
    if x >= axis[n - 1] {
        return (n - 2, 1.0);
    }
    let i = axis.partition_point(|&v| v <= x) - 1;
    (i, (x - axis[i]) / (axis[i + 1] - axis[i]))
}

fn check_axis(axis: &[f64], name: &'static str) -> Result<(), ModelError> {
    if axis.len() < 2 {
        return Err(ModelError::TooFewSamples(axis.len()));
    }
    let ascending = axis.windows(2).all(|w| w[0] < w[1]);
    let descending = axis.windows(2).all(|w| w[0] > w[1]);
    if ascending || descending {
        Ok(())
    } else {
        Err(ModelError::Axis(name))
    }
}

fn span(axis: &[f64]) -> (f64, f64) {
    let (first, last) = (axis[0], axis[axis.len() - 1]);
    (first.min(last), first.max(last))
}

#[cfg(test)]
mod tests {
    use super::GriddedModel;
    use crate::{Attribute, Frame, ModelError};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    /// A linear field `f = lon + 2 lat + 3 depth`, which trilinear
    /// interpolation reproduces exactly.
    fn field(lon: f64, lat: f64, depth: f64) -> f64 {
        lon + 2.0 * lat + 3.0 * depth
    }

    fn model(lon: Vec<f64>, lat: Vec<f64>, depth: Vec<f64>, frame: Frame) -> GriddedModel {
        let mut samples = Vec::new();
        for &z in &depth {
            for &y in &lat {
                for &x in &lon {
                    samples.push(field(x, y, z));
                }
            }
        }
        let constant = vec![4.0; samples.len()];
        GriddedModel::new(
            lon,
            lat,
            depth,
            vec![
                Attribute::new("f", samples),
                Attribute::new("four", constant),
            ],
            frame,
        )
        .unwrap()
    }

    #[test]
    fn test_trilinear_reproduces_linear_field() {
        let grid = model(
            vec![0.0, 1.0, 2.0],
            vec![10.0, 11.0],
            vec![0.0, 50.0, 100.0],
            Frame::Geographic,
        );
        let f = grid.attribute_index("f").unwrap();
        assert_relative_eq!(
            grid.sample(f, 1.25, 10.5, 70.0).unwrap(),
            field(1.25, 10.5, 70.0),
            epsilon = 1e-9
        );
        assert_eq!(grid.sample(f, 2.0, 11.0, 100.0).unwrap(), field(2.0, 11.0, 100.0));
        assert_relative_eq!(grid.sample(1, 0.3, 10.1, 3.0).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_descending_axes() {
        let grid = model(
            vec![2.0, 1.0, 0.0],
            vec![11.0, 10.0],
            vec![100.0, 50.0, 0.0],
            Frame::UnitSphere,
        );
        assert_relative_eq!(
            grid.sample(0, 0.5, 10.25, 20.0).unwrap(),
            field(0.5, 10.25, 20.0),
            epsilon = 1e-9
        );
        let extent = grid.extent();
        assert_eq!(extent.lon, (0.0, 2.0));
        assert_eq!(extent.lat, (10.0, 11.0));
        assert_eq!(extent.depth, (0.0, 100.0));
    }

    #[test]
    fn test_clamps_outside_grid() {
        let grid = model(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 10.0],
            Frame::Geographic,
        );
        assert_eq!(grid.sample(0, -5.0, 0.0, 0.0).unwrap(), field(0.0, 0.0, 0.0));
        assert_eq!(grid.sample(0, 1.0, 1.0, 50.0).unwrap(), field(1.0, 1.0, 10.0));
    }

    #[test]
    fn test_prepare_is_memoized() {
        let grid = model(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 10.0],
            Frame::Geographic,
        );
        assert!(!grid.is_prepared(0));
        let first = grid.prepare(0).unwrap();
        let second = grid.prepare(0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(grid.is_prepared(0));
        assert!(!grid.is_prepared(1));
        assert!(matches!(grid.prepare(7), Err(ModelError::UnknownAttribute(7))));
    }

    #[test]
    fn test_concurrent_prepare_builds_once() {
        let grid = model(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 10.0],
            Frame::Geographic,
        );
        let interpolators: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| grid.prepare(0).unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for interp in &interpolators[1..] {
            assert!(Arc::ptr_eq(&interpolators[0], interp));
        }
    }

    #[test]
    fn test_sample_shares_prepared_interpolator() {
        let grid = model(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 10.0],
            Frame::Geographic,
        );
        grid.prepare(0).unwrap();
        let grid = &grid;

        // A reader holding the cached entry must not stall sampling.
        let held = grid.interpolators.get(&0).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let sampled = std::thread::scope(|s| {
            s.spawn(move || tx.send(grid.sample(0, 0.5, 0.5, 5.0)));
            let sampled = rx.recv_timeout(std::time::Duration::from_secs(5));
            drop(held);
            sampled
        });
        assert!(sampled.unwrap().is_ok());
    }

    #[test]
    fn test_from_radius() {
        let grid = GriddedModel::from_radius(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![6371.0, 6271.0],
            vec![Attribute::new("vs", vec![1.0; 8])],
            Frame::Geographic,
        )
        .unwrap();
        assert_eq!(grid.depths(), &[0.0, 100.0]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let bad_len = GriddedModel::new(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![Attribute::new("vp", vec![1.0; 7])],
            Frame::Geographic,
        );
        assert!(matches!(
            bad_len,
            Err(ModelError::Shape {
                expected: 8,
                got: 7
            })
        ));

        let zigzag = GriddedModel::new(
            vec![0.0, 2.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![],
            Frame::Geographic,
        );
        assert!(matches!(zigzag, Err(ModelError::Axis("longitude"))));
    }
}
