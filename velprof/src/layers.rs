//! Partitioning of profile depths into layers.

use crate::ProfileError;

/// Splits `depths` into layers bounded by `tops[i]` and `bottoms[i]`
/// (km).
///
/// Each layer holds the depths within its bounds plus both bounds
/// themselves, ascending and without repeats, so adjacent layers share
/// the node at their interface.
pub fn layer_depths(
    depths: &[f64],
    bottoms: &[f64],
    tops: &[f64],
) -> Result<Vec<Vec<f64>>, ProfileError> {
    if bottoms.len() != tops.len() {
        return Err(ProfileError::LayerMismatch(bottoms.len(), tops.len()));
    }
    Ok(tops
        .iter()
        .zip(bottoms)
        .map(|(&top, &bottom)| {
            let mut layer: Vec<f64> = depths
                .iter()
                .copied()
                .filter(|&d| top <= d && d <= bottom)
                .chain([bottom, top])
                .collect();
            layer.sort_by(f64::total_cmp);
            layer.dedup();
            layer
        })
        .collect())
}
