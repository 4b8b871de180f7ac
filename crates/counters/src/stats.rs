//! Summary statistics over the iterations where a metric was present.
//!
//! All functions take the present values only; callers filter out missing
//! readings first. Each returns `None` when the statistic is undefined for
//! the sample size, never a placeholder zero.

/// Arithmetic mean. `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median: middle value of the sorted sample, or the midpoint of the two
/// middle values for even sample sizes. `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n−1 denominator).
///
/// Undefined for fewer than 2 values, so `None` rather than zero.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], None)]
    #[case(&[1000.0, 1000.0], Some(1000.0))]
    #[case(&[1.0, 2.0, 3.0, 4.0], Some(2.5))]
    fn test_mean(#[case] values: &[f64], #[case] expected: Option<f64>) {
        assert_eq!(mean(values), expected);
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&[5.0], Some(5.0))]
    #[case(&[3.0, 1.0, 2.0], Some(2.0))]
    #[case(&[4.0, 1.0, 3.0, 2.0], Some(2.5))]
    fn test_median(#[case] values: &[f64], #[case] expected: Option<f64>) {
        assert_eq!(median(values), expected);
    }

    #[test]
    fn test_std_dev_undefined_below_two_samples() {
        assert_eq!(std_dev(&[]), None);
        assert_eq!(std_dev(&[42.0]), None);
    }

    #[test]
    fn test_std_dev_sample_formula() {
        // Sample variance of {2, 4, 4, 4, 5, 5, 7, 9} is 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((std_dev(&values).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_zero_for_uniform_sample() {
        assert_eq!(std_dev(&[100.0, 100.0, 100.0]), Some(0.0));
    }
}
