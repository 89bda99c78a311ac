use num_traits::{Float, FromPrimitive};

/// Returns values from `start` to `end` inclusive, `step` apart.
///
/// `end` is only included when it lies on a step; the output is empty
/// unless `step` is positive and `start <= end`.
pub fn steps<T>(start: T, end: T, step: T) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let n = if step > T::zero() && start <= end {
        // Tolerate rounding in the span so a whole number of steps
        // keeps its last value.
        let slack = T::from_f64(1e-9).unwrap_or_else(T::epsilon);
        let intervals = ((end - start) / step + slack).floor();
        intervals.to_usize().map_or(0, |n| n + 1)
    } else {
        0
    };
    (0..n).map(move |i| start + T::from_usize(i).unwrap_or_else(T::zero) * step)
}
