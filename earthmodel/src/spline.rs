//! Piecewise polynomial interpolants used by the `quadratic` and
//! `cubic` interpolation kinds.
//!
//! Both splines store only their per-knot coefficients; the knots and
//! values live in the owning [`Interp1d`](crate::Interp1d).

#[derive(Debug, Clone)]
pub(crate) enum Spline {
    /// C¹ piecewise quadratic. `slopes[i]` is the first derivative at
    /// knot `i`.
    Quadratic { slopes: Vec<f64> },

    /// Cubic spline. `y2s[i]` is the second derivative at knot `i`.
    Cubic { y2s: Vec<f64> },
}

impl Spline {
    /// Builds a quadratic spline whose first piece is the parabola
    /// through the first three knots.
    pub(crate) fn quadratic(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len();
        let secant = |i: usize| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);

        let mut slopes = Vec::with_capacity(n);
        let d0 = if n >= 3 {
            let curvature = (secant(1) - secant(0)) / (xs[2] - xs[0]);
            secant(0) - curvature * (xs[1] - xs[0])
        } else {
            secant(0)
        };
        slopes.push(d0);
        for i in 0..n - 1 {
            let next = 2.0 * secant(i) - slopes[i];
            slopes.push(next);
        }
        Self::Quadratic { slopes }
    }

    /// Builds a not-a-knot cubic spline: the third derivative is
    /// continuous at the second and second-to-last knots, so any cubic
    /// polynomial is reproduced exactly.
    ///
    /// Three knots only determine a parabola; two only a line.
    pub(crate) fn cubic(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len();
        if n == 3 {
            return Self::quadratic(xs, ys);
        }
        let mut y2s = vec![0.0; n];
        if n < 3 {
            return Self::Cubic { y2s };
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let secant: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Tridiagonal system in the interior second derivatives
        // y2s[1..n - 1].
        let m = n - 2;
        let mut sub = Vec::with_capacity(m);
        let mut diag = Vec::with_capacity(m);
        let mut sup = Vec::with_capacity(m);
        let mut rhs = Vec::with_capacity(m);
        for i in 1..n - 1 {
            sub.push(h[i - 1]);
            diag.push(2.0 * (h[i - 1] + h[i]));
            sup.push(h[i]);
            rhs.push(6.0 * (secant[i] - secant[i - 1]));
        }

        // Fold the end conditions into the first and last rows.
        let (h0, h1) = (h[0], h[1]);
        diag[0] += h0 * (h0 + h1) / h1;
        sup[0] -= h0 * h0 / h1;
        let (a, b) = (h[n - 3], h[n - 2]);
        diag[m - 1] += b * (a + b) / a;
        sub[m - 1] -= b * b / a;

        for k in 1..m {
            let w = sub[k] / diag[k - 1];
            diag[k] -= w * sup[k - 1];
            rhs[k] -= w * rhs[k - 1];
        }
        y2s[m] = rhs[m - 1] / diag[m - 1];
        for k in (0..m - 1).rev() {
            y2s[k + 1] = (rhs[k] - sup[k] * y2s[k + 2]) / diag[k];
        }
        y2s[0] = ((h0 + h1) * y2s[1] - h0 * y2s[2]) / h1;
        y2s[n - 1] = ((a + b) * y2s[n - 2] - b * y2s[n - 3]) / a;

        Self::Cubic { y2s }
    }

    /// Evaluates the piece starting at knot `i` at `x`.
    ///
    /// `x` may lie outside `[xs[i], xs[i + 1]]`, in which case the
    /// piece's polynomial is extended.
    pub(crate) fn eval(&self, xs: &[f64], ys: &[f64], i: usize, x: f64) -> f64 {
        let h = xs[i + 1] - xs[i];
        match self {
            Self::Quadratic { slopes } => {
                let dx = x - xs[i];
                let c = ((ys[i + 1] - ys[i]) / h - slopes[i]) / h;
                ys[i] + slopes[i] * dx + c * dx * dx
            }
            Self::Cubic { y2s } => {
                let a = (xs[i + 1] - x) / h;
                let b = (x - xs[i]) / h;
                a * ys[i]
                    + b * ys[i + 1]
                    + ((a.powi(3) - a) * y2s[i] + (b.powi(3) - b) * y2s[i + 1]) * h * h / 6.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Spline;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_reproduces_parabola() {
        let xs = [0.0, 1.0, 2.0, 4.0, 5.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x * x - x + 2.0).collect();
        let spline = Spline::quadratic(&xs, &ys);
        assert_relative_eq!(spline.eval(&xs, &ys, 0, 0.5), 2.25, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(&xs, &ys, 2, 3.0), 26.0, epsilon = 1e-9);
        assert_relative_eq!(spline.eval(&xs, &ys, 3, 4.5), 58.25, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_passes_through_knots() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys = [1.0, -2.0, 0.5, 4.0];
        let spline = Spline::cubic(&xs, &ys);
        for i in 0..xs.len() - 1 {
            assert_relative_eq!(spline.eval(&xs, &ys, i, xs[i]), ys[i], epsilon = 1e-12);
            assert_relative_eq!(
                spline.eval(&xs, &ys, i, xs[i + 1]),
                ys[i + 1],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_cubic_reproduces_cubic() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x * x).collect();
        let spline = Spline::cubic(&xs, &ys);
        assert_relative_eq!(spline.eval(&xs, &ys, 1, 1.5), 3.375, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(&xs, &ys, 0, 0.5), 0.125, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(&xs, &ys, 3, 3.5), 42.875, epsilon = 1e-9);

        // Uneven spacing.
        let xs = [0.0, 0.5, 2.0, 2.5, 4.0, 7.0];
        let f = |x: f64| 2.0 * x * x * x - x * x + 3.0;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = Spline::cubic(&xs, &ys);
        assert_relative_eq!(spline.eval(&xs, &ys, 1, 1.0), f(1.0), epsilon = 1e-9);
        assert_relative_eq!(spline.eval(&xs, &ys, 4, 6.0), f(6.0), epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_on_three_knots_is_parabola() {
        let xs = [0.0, 1.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x - 2.0 * x).collect();
        let spline = Spline::cubic(&xs, &ys);
        assert_relative_eq!(spline.eval(&xs, &ys, 0, 0.5), -0.75, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(&xs, &ys, 1, 2.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_on_line_is_linear() {
        let xs = [0.0, 2.0, 3.0, 7.0];
        let ys = [1.0, 5.0, 7.0, 15.0];
        let spline = Spline::cubic(&xs, &ys);
        assert_relative_eq!(spline.eval(&xs, &ys, 2, 5.0), 11.0, epsilon = 1e-12);
    }
}
