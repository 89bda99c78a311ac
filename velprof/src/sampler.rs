//! 3-D model providers a profile can blend over the reference.

use crate::{
    coords::LonConvention,
    domain::{BoundingBox, DepthBounds, Range},
    perturbation::Perturbation,
    ProfileError,
};
use earthmodel::{GriddedModel, PointCloud};

/// A 3-D model attribute that can be sampled at geographic points.
pub trait Sampler: Sync {
    /// Region where this model is valid, in its own longitude
    /// convention.
    fn domain(&self) -> BoundingBox;

    fn convention(&self) -> LonConvention;

    /// Builds whatever state sampling needs.
    ///
    /// Calling this more than once is cheap.
    fn prepare(&self) -> Result<(), ProfileError> {
        Ok(())
    }

    /// Returns the model value at `lon`° (in this model's convention),
    /// `lat`°, `depth` km.
    fn sample(&self, lon: f64, lat: f64, depth: f64) -> Result<f64, ProfileError>;
}

/// One attribute of a [`GriddedModel`].
#[derive(Debug, Clone, Copy)]
pub struct GridAttribute<'a> {
    model: &'a GriddedModel,
    attr: usize,
}

impl<'a> GridAttribute<'a> {
    pub fn new(model: &'a GriddedModel, attr: usize) -> Result<Self, ProfileError> {
        model.attribute(attr)?;
        Ok(Self { model, attr })
    }

    /// Returns the attribute called `name`.
    pub fn named(model: &'a GriddedModel, name: &str) -> Result<Self, ProfileError> {
        let attr = model
            .attribute_index(name)
            .ok_or_else(|| ProfileError::AttributeName(name.to_owned()))?;
        Ok(Self { model, attr })
    }
}

impl<'a> Sampler for GridAttribute<'a> {
    fn domain(&self) -> BoundingBox {
        self.model.extent().into()
    }

    fn convention(&self) -> LonConvention {
        LonConvention::detect(self.model.longitudes())
    }

    fn prepare(&self) -> Result<(), ProfileError> {
        self.model.prepare(self.attr)?;
        Ok(())
    }

    fn sample(&self, lon: f64, lat: f64, depth: f64) -> Result<f64, ProfileError> {
        Ok(self.model.sample(self.attr, lon, lat, depth)?)
    }
}

/// Mean of two attributes of the same [`GriddedModel`], such as the
/// vertically and horizontally polarized shear velocities.
#[derive(Debug, Clone, Copy)]
pub struct GridMean<'a> {
    first: GridAttribute<'a>,
    second: GridAttribute<'a>,
}

impl<'a> GridMean<'a> {
    pub fn new(model: &'a GriddedModel, first: &str, second: &str) -> Result<Self, ProfileError> {
        Ok(Self {
            first: GridAttribute::named(model, first)?,
            second: GridAttribute::named(model, second)?,
        })
    }
}

impl<'a> Sampler for GridMean<'a> {
    fn domain(&self) -> BoundingBox {
        self.first.domain()
    }

    fn convention(&self) -> LonConvention {
        self.first.convention()
    }

    fn prepare(&self) -> Result<(), ProfileError> {
        self.first.prepare()?;
        self.second.prepare()
    }

    fn sample(&self, lon: f64, lat: f64, depth: f64) -> Result<f64, ProfileError> {
        let a = self.first.sample(lon, lat, depth)?;
        let b = self.second.sample(lon, lat, depth)?;
        Ok((a + b) / 2.0)
    }
}

/// A [`PointCloud`], valid everywhere from the surface down to its
/// deepest point. Depths above the shallowest point take the nearest
/// point's value.
#[derive(Debug, Clone, Copy)]
pub struct CloudSampler<'a> {
    cloud: &'a PointCloud,
}

impl<'a> CloudSampler<'a> {
    pub fn new(cloud: &'a PointCloud) -> Self {
        Self { cloud }
    }
}

impl<'a> Sampler for CloudSampler<'a> {
    fn domain(&self) -> BoundingBox {
        let (min, max) = self.cloud.depth_range();
        BoundingBox::depth_only(Range::new(min.min(0.0), max))
    }

    fn convention(&self) -> LonConvention {
        LonConvention::Signed
    }

    fn sample(&self, lon: f64, lat: f64, depth: f64) -> Result<f64, ProfileError> {
        Ok(self.cloud.sample(lon, lat, depth))
    }
}

/// A 3-D model attribute along with how its values relate to the
/// reference model.
#[derive(Clone, Copy)]
pub struct Source<'a> {
    pub(crate) sampler: &'a dyn Sampler,
    pub(crate) perturbation: Perturbation,
    pub(crate) depth_bounds: DepthBounds,
}

impl<'a> Source<'a> {
    /// Returns a source of fractional perturbations bounded by the
    /// model's own domain.
    pub fn new(sampler: &'a dyn Sampler) -> Self {
        Self {
            sampler,
            perturbation: Perturbation::default(),
            depth_bounds: DepthBounds::default(),
        }
    }

    #[must_use]
    pub fn perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Overrides the model's depth limits.
    #[must_use]
    pub fn depth_bounds(mut self, bounds: DepthBounds) -> Self {
        self.depth_bounds = bounds;
        self
    }

    /// Returns the effective domain, with depth overrides applied.
    pub fn domain(&self) -> BoundingBox {
        self.sampler.domain().with_depth_bounds(self.depth_bounds)
    }
}

impl<'a> std::fmt::Debug for Source<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("domain", &self.domain())
            .field("perturbation", &self.perturbation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CloudSampler, GridAttribute, GridMean, Sampler, Source};
    use crate::{coords::LonConvention, domain::DepthBounds, ProfileError};
    use approx::assert_relative_eq;
    use earthmodel::{Attribute, CloudFrame, Frame, GriddedModel, PointCloud};

    fn grid() -> GriddedModel {
        GriddedModel::new(
            vec![200.0, 210.0],
            vec![0.0, 10.0],
            vec![0.0, 100.0],
            vec![
                Attribute::new("vsv", vec![1.0; 8]),
                Attribute::new("vsh", vec![2.0; 8]),
            ],
            Frame::Geographic,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_attribute() {
        let grid = grid();
        let vsv = GridAttribute::named(&grid, "vsv").unwrap();
        assert_eq!(vsv.convention(), LonConvention::Positive);
        assert!(vsv.domain().contains(205.0, 5.0, 50.0));
        vsv.prepare().unwrap();
        assert_relative_eq!(vsv.sample(205.0, 5.0, 50.0).unwrap(), 1.0, epsilon = 1e-12);

        assert!(matches!(
            GridAttribute::named(&grid, "vp"),
            Err(ProfileError::AttributeName(_))
        ));
        assert!(GridAttribute::new(&grid, 2).is_err());
    }

    #[test]
    fn test_grid_mean() {
        let grid = grid();
        let vs = GridMean::new(&grid, "vsv", "vsh").unwrap();
        vs.prepare().unwrap();
        assert!(grid.is_prepared(0) && grid.is_prepared(1));
        assert_relative_eq!(vs.sample(201.0, 1.0, 1.0).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cloud_domain_is_depth_only() {
        let cloud = PointCloud::new(
            CloudFrame::Geographic,
            vec![[0.0, 0.0, 6271.0], [0.0, 0.0, 5871.0]],
            vec![0.1, 0.2],
        )
        .unwrap();
        let sampler = CloudSampler::new(&cloud);
        let domain = sampler.domain();
        assert!(domain.contains(170.0, -80.0, 0.0));
        assert!(domain.contains(170.0, -80.0, 50.0));
        assert!(domain.contains(170.0, -80.0, 500.0));
        assert!(!domain.contains(0.0, 0.0, 501.0));

        let source = Source::new(&sampler).depth_bounds(DepthBounds::new(None, Some(300.0)));
        assert!(!source.domain().contains(0.0, 0.0, 400.0));
    }
}
