//! Statistical utility functions for the screening stages.
//!
//! All estimators are computed over the current candidate set of a run.
//! Standard deviations use the sample estimator (N-1 denominator) and
//! quantiles interpolate linearly between order statistics.

/// A standard deviation at or below this counts as zero dispersion.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Location and scale a set of z-scores was computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreFit {
    /// Mean of the inputs
    pub mean: f64,
    /// Sample standard deviation of the inputs
    pub std: f64,
    /// False when the inputs had no usable dispersion and every z-score is 0
    pub scaled: bool,
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (N-1 denominator), or `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile `q` in `[0, 1]` with linear interpolation between order statistics.
///
/// Non-finite values are ignored. Returns `None` if no finite value remains.
///
/// ```
/// use deepvalue_traits::stats::quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&values, 0.5), Some(2.5));
/// assert_eq!(quantile(&values, 1.0), Some(4.0));
/// ```
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().filter(|x| x.is_finite()).copied().collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Clips every value into `[floor, ceiling]` in place.
pub fn clip(values: &mut [f64], floor: f64, ceiling: f64) {
    for v in values.iter_mut() {
        *v = v.clamp(floor, ceiling);
    }
}

/// Z-scores `(x - mean) / std` over `values`.
///
/// Degenerate inputs give zeros, never NaN or infinities:
///
/// - Empty input: empty output, `scaled = false`
/// - Single value: `[0.0]`, `scaled = false`
/// - Constant values (std below [`MIN_STD_THRESHOLD`]): zeros, `scaled = false`
///
/// # Examples
///
/// ```
/// use deepvalue_traits::stats::standardize;
///
/// let (z, fit) = standardize(&[0.05, 0.10, 0.15]);
///
/// assert!(fit.scaled);
/// assert!((fit.mean - 0.10).abs() < 1e-12);
/// assert!(z[1].abs() < 1e-12);
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, ZScoreFit) {
    let Some(mean) = mean(values) else {
        return (
            Vec::new(),
            ZScoreFit {
                mean: f64::NAN,
                std: f64::NAN,
                scaled: false,
            },
        );
    };
    let std = sample_std(values).unwrap_or(0.0);
    let scaled = std.is_finite() && std > MIN_STD_THRESHOLD;

    let z = if scaled {
        values.iter().map(|x| (x - mean) / std).collect()
    } else {
        vec![0.0; values.len()]
    };

    (z, ZScoreFit { mean, std, scaled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        // Sample std of this classic set is sqrt(32/7)
        assert_relative_eq!(sample_std(&values).unwrap(), (32.0_f64 / 7.0).sqrt());
        assert!(mean(&[]).is_none());
        assert!(sample_std(&[1.0]).is_none());
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = [10.0, 1.0, 7.0, 3.5, 6.0];
        // sorted: 1, 3.5, 6, 7, 10
        assert_relative_eq!(quantile(&values, 0.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.9).unwrap(), 8.8, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.025).unwrap(), 1.25, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 10.0);
    }

    #[test]
    fn test_quantile_edge_cases() {
        assert!(quantile(&[], 0.5).is_none());
        assert!(quantile(&[f64::NAN], 0.5).is_none());
        assert!(quantile(&[1.0, 2.0], 1.5).is_none());
        assert_relative_eq!(quantile(&[42.0], 0.9).unwrap(), 42.0);
    }

    #[test]
    fn test_clip() {
        let mut values = vec![-1.0, 0.5, 2.0];
        clip(&mut values, 0.0, 1.0);
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_standardize_basic() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let (z, fit) = standardize(&values);

        assert!(fit.scaled);
        assert_relative_eq!(fit.mean, 3.0);
        assert_relative_eq!(mean(&z).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(sample_std(&z).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standardize_empty() {
        let (z, fit) = standardize(&[]);
        assert!(z.is_empty());
        assert!(!fit.scaled);
        assert!(fit.mean.is_nan());
    }

    #[test]
    fn test_standardize_single_value() {
        let (z, fit) = standardize(&[42.0]);
        assert_eq!(z, vec![0.0]);
        assert!(!fit.scaled);
    }

    #[test]
    fn test_standardize_constant_values() {
        let (z, fit) = standardize(&[5.0; 5]);
        assert!(!fit.scaled);
        assert!(z.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_min_std_threshold() {
        let values = [1.0, 1.0 + 1e-12, 1.0 - 1e-12, 1.0 + 2e-12, 1.0 - 2e-12];
        let (z, fit) = standardize(&values);
        assert!(!fit.scaled);
        assert!(z.iter().all(|&x| x == 0.0));
    }

    proptest! {
        #[test]
        fn prop_standardize_moments(values in prop::collection::vec(-1.0e3..1.0e3f64, 2..60)) {
            let (z, fit) = standardize(&values);
            prop_assert_eq!(z.len(), values.len());
            prop_assert!(z.iter().all(|x| x.is_finite()));
            if fit.scaled {
                prop_assert!(mean(&z).unwrap().abs() < 1e-9);
                prop_assert!((sample_std(&z).unwrap() - 1.0).abs() < 1e-9);
            } else {
                prop_assert!(z.iter().all(|&x| x == 0.0));
            }
        }

        #[test]
        fn prop_quantile_within_range(
            values in prop::collection::vec(-1.0e6..1.0e6f64, 1..60),
            q in 0.0..=1.0f64,
        ) {
            let v = quantile(&values, q).unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(v >= min - 1e-6 && v <= max + 1e-6);
        }
    }
}
