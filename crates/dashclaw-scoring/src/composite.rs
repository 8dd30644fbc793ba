//! Composite aggregation of per-dimension scores.

use dashclaw_types::CompositeMethod;

use crate::round2;

/// One dimension's contribution to a composite.
#[derive(Clone, Copy, Debug)]
pub struct WeightedScore {
    pub score: Option<f64>,
    pub weight: f64,
}

/// Fold dimension scores into a single composite.
///
/// Dimensions without a score are excluded from both the numerator and the
/// weight normalization, so a profile degrades gracefully when some data
/// sources have no data. Returns `None` when nothing contributed.
pub fn compute_composite(dimensions: &[WeightedScore], method: CompositeMethod) -> Option<f64> {
    let scored: Vec<(f64, f64)> = dimensions
        .iter()
        .filter_map(|d| d.score.map(|s| (s, d.weight)))
        .collect();
    if scored.is_empty() {
        return None;
    }

    let total_weight: f64 = scored.iter().map(|(_, w)| w).sum();

    match method {
        CompositeMethod::WeightedAverage => {
            if total_weight == 0.0 {
                return None;
            }
            let sum: f64 = scored.iter().map(|(s, w)| s * w / total_weight).sum();
            Some(round2(sum))
        }
        CompositeMethod::Minimum => scored
            .iter()
            .map(|(s, _)| *s)
            .fold(None, |acc: Option<f64>, s| {
                Some(acc.map_or(s, |a| a.min(s)))
            }),
        CompositeMethod::GeometricMean => {
            // A zero score zeroes the product; special-cased so the
            // weighted power computation never sees log-domain trouble.
            if scored.iter().any(|(s, _)| *s == 0.0) {
                return Some(0.0);
            }
            if total_weight == 0.0 {
                return None;
            }
            let product: f64 = scored
                .iter()
                .map(|(s, w)| s.powf(w / total_weight))
                .product();
            Some(round2(product))
        }
    }
}
