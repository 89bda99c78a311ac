//! Radially symmetric (1-D) reference Earth models.

use crate::{Extrapolation, InterpKind, Interp1d, ModelError, Properties, EARTH_RADIUS_KM};

/// A tabulated 1-D Earth model such as AK135, PREM, or IASP91.
///
/// Depths are unique and ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    /// Depth below the surface (km).
    depth: Vec<f64>,

    /// Compressional wave velocity (km/s).
    vp: Vec<f64>,

    /// Shear wave velocity (km/s).
    vs: Vec<f64>,

    /// Density (g/cm³).
    rho: Vec<f64>,
}

impl ReferenceModel {
    /// Returns a model built from parallel columns.
    ///
    /// Rows are sorted by depth. When a depth is repeated (the two
    /// sides of a tabulated discontinuity) the first row wins.
    pub fn new(
        depth: Vec<f64>,
        vp: Vec<f64>,
        vs: Vec<f64>,
        rho: Vec<f64>,
    ) -> Result<Self, ModelError> {
        for len in [vp.len(), vs.len(), rho.len()] {
            if len != depth.len() {
                return Err(ModelError::LengthMismatch(depth.len(), len));
            }
        }

        if depth.iter().any(|d| d.is_nan()) {
            return Err(ModelError::Axis("depth"));
        }

        let mut order: Vec<usize> = (0..depth.len()).collect();
        // Stable sort, so the first of any repeated depth stays first.
        order.sort_by(|&a, &b| depth[a].total_cmp(&depth[b]));
        order.dedup_by(|&mut later, &mut earlier| depth[later] == depth[earlier]);

        if order.len() < 2 {
            return Err(ModelError::TooFewSamples(order.len()));
        }

        let pick = |col: &[f64]| order.iter().map(|&i| col[i]).collect::<Vec<f64>>();
        Ok(Self {
            depth: pick(&depth),
            vp: pick(&vp),
            vs: pick(&vs),
            rho: pick(&rho),
        })
    }

    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn vp(&self) -> &[f64] {
        &self.vp
    }

    pub fn vs(&self) -> &[f64] {
        &self.vs
    }

    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Radius (km) of each tabulated depth.
    pub fn radius(&self) -> Vec<f64> {
        self.depth.iter().map(|d| EARTH_RADIUS_KM - d).collect()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    /// Returns a sampler using `kind` interpolation over depth.
    pub fn sampler(&self, kind: InterpKind, extrapolation: Extrapolation) -> ReferenceSampler {
        let column = |values: &[f64]| {
            Interp1d::new_unchecked(self.depth.clone(), values.to_vec(), kind, extrapolation)
        };
        ReferenceSampler {
            vp: column(&self.vp),
            vs: column(&self.vs),
            rho: column(&self.rho),
        }
    }

    /// Returns linearly interpolated properties at `depth_km`, clamped
    /// to each column's minimum outside the table.
    pub fn value_at(&self, depth_km: f64) -> Properties {
        self.sampler(InterpKind::Linear, Extrapolation::ClampToMinimum)
            .value_at(depth_km)
    }
}

/// Interpolating view of a [`ReferenceModel`].
#[derive(Debug, Clone)]
pub struct ReferenceSampler {
    vp: Interp1d,
    vs: Interp1d,
    rho: Interp1d,
}

impl ReferenceSampler {
    pub fn value_at(&self, depth_km: f64) -> Properties {
        Properties {
            vp: self.vp.eval(depth_km),
            vs: self.vs.eval(depth_km),
            rho: self.rho.eval(depth_km),
        }
    }

    pub fn kind(&self) -> InterpKind {
        self.vp.kind()
    }
}
