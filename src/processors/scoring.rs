//! Score aggregation over raw model outputs.
//!
//! Two independent computations: the classification softmax (logits to a
//! probability distribution, argmax selects the label) and the severity
//! score (probability-weighted midpoint of equal-width bins, a continuous
//! proxy in [0, 1] for disease extent).

/// Converts logits to a probability distribution.
///
/// The maximum logit is subtracted before exponentiation, so the result is
/// invariant to an additive constant on all logits and safe for large
/// magnitudes.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Returns the index of the largest value, or `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
}

/// Computes the probability-weighted bin-midpoint score.
///
/// Bin `i` spans `[i*step, (i+1)*step)`; its midpoint `i*step + step/2` is
/// weighted by `probs[i]`. For a probability distribution over bins that
/// tile [0, 1], the score lies in [0, 1] and grows as mass shifts toward
/// higher bins.
pub fn severity_score(probs: &[f32], step: f32) -> f32 {
    probs
        .iter()
        .enumerate()
        .map(|(i, &p)| p * (i as f32 * step + step / 2.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::SEVERITY_STEP;

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let base = softmax(&[0.5, -1.2, 3.3]);
        let shifted = softmax(&[100.5, 98.8, 103.3]);
        for (a, b) in base.iter().zip(&shifted) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0, 1000.0]);
        for p in &probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn argmax_selects_largest() {
        assert_eq!(argmax(&[0.1, 0.8, 0.1]), Some(1));
        assert_eq!(argmax(&[0.7, 0.2, 0.1]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn severity_score_matches_reference_value() {
        // bin midpoints for step 1/3 are 1/6, 1/2, 5/6
        let score = severity_score(&[0.1, 0.1, 0.8], SEVERITY_STEP);
        let expected = 0.1 * (1.0 / 6.0) + 0.1 * (1.0 / 2.0) + 0.8 * (5.0 / 6.0);
        assert!((score - expected).abs() < 1e-6);
        assert!((score - 0.7333).abs() < 5e-5);
    }

    #[test]
    fn severity_score_grows_with_top_bin_weight() {
        let low = severity_score(&[0.8, 0.1, 0.1], SEVERITY_STEP);
        let mid = severity_score(&[0.4, 0.3, 0.3], SEVERITY_STEP);
        let high = severity_score(&[0.1, 0.1, 0.8], SEVERITY_STEP);
        assert!(low < mid && mid < high);
    }

    #[test]
    fn severity_score_stays_in_unit_interval() {
        for probs in [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.2, 0.5, 0.3]] {
            let score = severity_score(&probs, SEVERITY_STEP);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }
}
