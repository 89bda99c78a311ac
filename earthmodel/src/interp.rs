//! One-dimensional interpolation over tabulated samples.

use crate::{spline::Spline, ModelError};
use std::{fmt, str::FromStr};

/// Interpolation scheme for tabulated 1-D data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpKind {
    /// Piecewise linear.
    #[default]
    Linear,

    /// Nearest sample; exact midpoints take the lower sample.
    Nearest,

    /// Nearest sample; exact midpoints take the upper sample.
    NearestUp,

    /// Zero-order hold (same as [`InterpKind::Previous`]).
    Zero,

    /// First-order spline (same as [`InterpKind::Linear`]).
    SLinear,

    /// C¹ piecewise quadratic spline.
    Quadratic,

    /// Not-a-knot cubic spline.
    Cubic,

    /// Value of the sample at or below `x`.
    Previous,

    /// Value of the sample at or above `x`.
    Next,
}

impl InterpKind {
    pub const ALL: [InterpKind; 9] = [
        Self::Linear,
        Self::Nearest,
        Self::NearestUp,
        Self::Zero,
        Self::SLinear,
        Self::Quadratic,
        Self::Cubic,
        Self::Previous,
        Self::Next,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Nearest => "nearest",
            Self::NearestUp => "nearest-up",
            Self::Zero => "zero",
            Self::SLinear => "slinear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

impl FromStr for InterpKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_owned()))
    }
}

impl fmt::Display for InterpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to return for queries outside the tabulated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Return the smallest tabulated value, on either side of the
    /// table.
    #[default]
    ClampToMinimum,

    /// Extend the boundary piece of the interpolant.
    Extrapolate,
}

#[derive(Debug, Clone)]
pub struct Interp1d {
    xs: Vec<f64>,
    ys: Vec<f64>,
    kind: InterpKind,
    extrapolation: Extrapolation,
    /// Smallest of `ys`.
    fill: f64,
    spline: Option<Spline>,
}

impl Interp1d {
    /// Returns an interpolant over `(xs, ys)`.
    ///
    /// `xs` must be strictly increasing.
    pub fn new(
        xs: Vec<f64>,
        ys: Vec<f64>,
        kind: InterpKind,
        extrapolation: Extrapolation,
    ) -> Result<Self, ModelError> {
        if xs.len() != ys.len() {
            return Err(ModelError::LengthMismatch(xs.len(), ys.len()));
        }
        if xs.len() < 2 {
            return Err(ModelError::TooFewSamples(xs.len()));
        }
        if xs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ModelError::Axis("x"));
        }

        Ok(Self::new_unchecked(xs, ys, kind, extrapolation))
    }

    /// Same as [`Interp1d::new`] for callers that already guarantee at
    /// least two strictly increasing `xs` of the same length as `ys`.
    pub(crate) fn new_unchecked(
        xs: Vec<f64>,
        ys: Vec<f64>,
        kind: InterpKind,
        extrapolation: Extrapolation,
    ) -> Self {
        let fill = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let spline = match kind {
            InterpKind::Quadratic => Some(Spline::quadratic(&xs, &ys)),
            InterpKind::Cubic => Some(Spline::cubic(&xs, &ys)),
            _ => None,
        };
        Self {
            xs,
            ys,
            kind,
            extrapolation,
            fill,
            spline,
        }
    }

    pub fn kind(&self) -> InterpKind {
        self.kind
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Returns the interpolated value at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let n = self.xs.len();
        if x < self.xs[0] || x > self.xs[n - 1] {
            return match self.extrapolation {
                Extrapolation::ClampToMinimum => self.fill,
                Extrapolation::Extrapolate => self.extrapolate(x),
            };
        }
        let i = self.locate(x);
        self.eval_piece(i, x)
    }
}

/// Private API.
impl Interp1d {
    /// Index `i` of the interval `[xs[i], xs[i + 1]]` containing `x`.
    fn locate(&self, x: f64) -> usize {
        let n = self.xs.len();
        let at_or_below = self.xs.partition_point(|&v| v <= x);
        at_or_below.saturating_sub(1).min(n - 2)
    }

    fn eval_piece(&self, i: usize, x: f64) -> f64 {
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        match self.kind {
            InterpKind::Linear | InterpKind::SLinear => y0 + (y1 - y0) * t,
            InterpKind::Nearest => {
                if t <= 0.5 {
                    y0
                } else {
                    y1
                }
            }
            InterpKind::NearestUp => {
                if t < 0.5 {
                    y0
                } else {
                    y1
                }
            }
            InterpKind::Zero | InterpKind::Previous => {
                if x >= x1 {
                    y1
                } else {
                    y0
                }
            }
            InterpKind::Next => {
                if x <= x0 {
                    y0
                } else {
                    y1
                }
            }
            InterpKind::Quadratic | InterpKind::Cubic => match &self.spline {
                Some(spline) => spline.eval(&self.xs, &self.ys, i, x),
                None => y0 + (y1 - y0) * t,
            },
        }
    }

    fn extrapolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let (i, edge) = if x < self.xs[0] {
            (0, self.ys[0])
        } else {
            (n - 2, self.ys[n - 1])
        };
        match self.kind {
            InterpKind::Linear
            | InterpKind::SLinear
            | InterpKind::Quadratic
            | InterpKind::Cubic => self.eval_piece(i, x),
            _ => edge,
        }
    }
}
