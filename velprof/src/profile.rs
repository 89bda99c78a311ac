use crate::{
    perturbation::{apply_mode, to_absolute, Mode, SlownessPolicy},
    sampler::Source,
    BoundingBox, ProfileError,
};
use earthmodel::{Extrapolation, InterpKind, Properties, ReferenceModel, EARTH_RADIUS_KM};
use geo::geometry::Coord;
use log::debug;

/// Elastic properties along a vertical line through the Earth.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Radius of each sample (km), ascending.
    pub radius: Vec<f64>,

    /// `[vp, vs, rho]` at each radius, as velocities (km/s) or
    /// slownesses (s/km) depending on [`Mode`]. Density is always
    /// g/cm³.
    pub values: Vec<[f64; 3]>,
}

impl Profile {
    pub fn builder<'a>() -> ProfileBuilder<'a> {
        ProfileBuilder {
            location: None,
            depths: None,
            reference: None,
            vp: None,
            vs: None,
            rho: None,
            kind: InterpKind::default(),
            mode: Mode::default(),
            extrapolation: Extrapolation::default(),
            earth_radius: EARTH_RADIUS_KM,
            ordering: Ordering::default(),
            slowness_policy: SlownessPolicy::ZeroInvalid,
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn vp(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|v| v[0])
    }

    pub fn vs(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|v| v[1])
    }

    pub fn rho(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|v| v[2])
    }
}

/// Order in which input depths are laid out in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Sort by depth, so radius ascends whatever the input order.
    #[default]
    SortByDepth,

    /// Reverse the input; radius ascends only when the input depths
    /// ascend.
    Reverse,
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder<'a> {
    /// Geographic point the profile passes through (required).
    location: Option<Coord<f64>>,

    /// Depths to sample (km, required).
    depths: Option<Vec<f64>>,

    /// Model used wherever no 3-D source applies (required).
    reference: Option<&'a ReferenceModel>,

    vp: Option<Source<'a>>,

    vs: Option<Source<'a>>,

    rho: Option<Source<'a>>,

    /// Interpolation of the reference model (defaults to linear).
    kind: InterpKind,

    /// Defaults to velocity.
    mode: Mode,

    /// Reference model behavior outside its depth range (defaults to
    /// clamping to each column's minimum).
    extrapolation: Extrapolation,

    /// Km, defaults to [`EARTH_RADIUS_KM`].
    earth_radius: f64,

    /// Defaults to [`Ordering::SortByDepth`].
    ordering: Ordering,

    /// Defaults to [`SlownessPolicy::ZeroInvalid`].
    slowness_policy: SlownessPolicy,
}

impl<'a> ProfileBuilder<'a> {
    /// Geographic point the profile passes through (required).
    #[must_use]
    pub fn location(mut self, coord: Coord<f64>) -> Self {
        self.location = Some(coord);
        self
    }

    /// Depths to sample (km, required).
    #[must_use]
    pub fn depths(mut self, depths: &[f64]) -> Self {
        self.depths = Some(depths.to_vec());
        self
    }

    /// Model used wherever no 3-D source applies (required).
    #[must_use]
    pub fn reference(mut self, model: &'a ReferenceModel) -> Self {
        self.reference = Some(model);
        self
    }

    #[must_use]
    pub fn vp(mut self, source: Source<'a>) -> Self {
        self.vp = Some(source);
        self
    }

    #[must_use]
    pub fn vs(mut self, source: Source<'a>) -> Self {
        self.vs = Some(source);
        self
    }

    #[must_use]
    pub fn rho(mut self, source: Source<'a>) -> Self {
        self.rho = Some(source);
        self
    }

    /// Interpolation of the reference model (defaults to linear).
    #[must_use]
    pub fn kind(mut self, kind: InterpKind) -> Self {
        self.kind = kind;
        self
    }

    /// Defaults to velocity.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Reference model behavior outside its depth range (defaults to
    /// clamping to each column's minimum).
    #[must_use]
    pub fn extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Km, defaults to [`EARTH_RADIUS_KM`].
    ///
    /// Only the output radii use it. Models are located in their own
    /// frames, which always assume [`EARTH_RADIUS_KM`].
    #[must_use]
    pub fn earth_radius(mut self, km: f64) -> Self {
        self.earth_radius = km;
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    #[must_use]
    pub fn slowness_policy(mut self, policy: SlownessPolicy) -> Self {
        self.slowness_policy = policy;
        self
    }

    pub fn build(&self) -> Result<Profile, ProfileError> {
        let location = self.location.ok_or(ProfileError::Builder("location"))?;
        let depths = self.depths.as_ref().ok_or(ProfileError::Builder("depths"))?;
        let reference = self.reference.ok_or(ProfileError::Builder("reference"))?;
        self.build_at(location, depths, reference)
    }
}

/// Private API.
impl<'a> ProfileBuilder<'a> {
    fn build_at(
        &self,
        Coord { x: lon, y: lat }: Coord<f64>,
        depths: &[f64],
        reference: &ReferenceModel,
    ) -> Result<Profile, ProfileError> {
        let now = std::time::Instant::now();

        let sources = [self.vp, self.vs, self.rho];
        let mut active: [Option<Resolved<'_>>; 3] = [None, None, None];
        for (slot, source) in active.iter_mut().zip(sources) {
            if let Some(source) = source {
                source.sampler.prepare()?;
                *slot = Some(Resolved {
                    source,
                    domain: source.domain(),
                    lon: source.sampler.convention().normalize(lon),
                });
            }
        }

        let mut depths = depths.to_vec();
        match self.ordering {
            Ordering::SortByDepth => depths.sort_by(|a, b| b.total_cmp(a)),
            Ordering::Reverse => depths.reverse(),
        }

        let reference = reference.sampler(self.kind, self.extrapolation);
        let mut values = Vec::with_capacity(depths.len());
        let mut from_model = 0;
        for &depth in &depths {
            let Properties { vp, vs, rho } = reference.value_at(depth);
            let mut point = [vp, vs, rho];
            for (value, resolved) in point.iter_mut().zip(&active) {
                if let Some(resolved) = resolved {
                    if let Some(sampled) = resolved.sample(lat, depth, *value)? {
                        *value = sampled;
                        from_model += 1;
                    }
                }
            }
            values.push(point);
        }

        for (index, point) in values.iter_mut().enumerate() {
            // Density is never inverted.
            for value in &mut point[..2] {
                *value = apply_mode(*value, index, self.mode, self.slowness_policy)?;
            }
        }

        let radius = depths.iter().map(|d| self.earth_radius - d).collect();

        debug!(
            "profile; lon: {lon}, lat: {lat}, len: {}, model samples: {from_model}, reference samples: {}, exec: {:?}",
            depths.len(),
            3 * depths.len() - from_model,
            now.elapsed()
        );

        Ok(Profile { radius, values })
    }
}

/// A source with its per-profile state worked out.
struct Resolved<'a> {
    source: Source<'a>,
    domain: BoundingBox,

    /// Query longitude in the source's convention.
    lon: f64,
}

impl<'a> Resolved<'a> {
    /// Returns the absolute model value at `depth`, or `None` outside
    /// the source's domain.
    fn sample(&self, lat: f64, depth: f64, reference: f64) -> Result<Option<f64>, ProfileError> {
        if !self.domain.contains(self.lon, lat, depth) {
            return Ok(None);
        }
        let raw = self.source.sampler.sample(self.lon, lat, depth)?;
        Ok(Some(to_absolute(raw, reference, self.source.perturbation)))
    }
}
