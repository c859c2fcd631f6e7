use ndarray::Array1;

/// Converts raw logits into a probability distribution summing to 1.
///
/// Shifted by the maximum logit before exponentiation so large scores cannot
/// overflow.
pub(crate) fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
    let exp = logits.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the largest value; ties resolve to the lowest index.
pub(crate) fn argmax(values: &Array1<f32>) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

/// Rounds a probability to 3 decimal places for display.
pub(crate) fn round_score(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&array![1.0, 2.0, 3.0]);
        let sum: f32 = probs.sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn softmax_orders_by_logit() {
        let probs = softmax(&array![0.5, 3.0, -1.0]);
        assert!(probs[1] > probs[0]);
        assert!(probs[0] > probs[2]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let probs = softmax(&array![1000.0, 1000.0, 1000.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.sum() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn argmax_picks_maximum() {
        assert_eq!(argmax(&array![0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&array![0.9, 0.05, 0.05]), 0);
    }

    #[test]
    fn argmax_ties_resolve_to_lowest_index() {
        assert_eq!(argmax(&array![0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax(&array![0.2, 0.4, 0.4]), 1);
    }

    #[test]
    fn round_score_three_decimals() {
        assert_eq!(round_score(0.123_456), 0.123);
        assert_eq!(round_score(0.999_6), 1.0);
        assert_eq!(round_score(0.0), 0.0);
    }
}
