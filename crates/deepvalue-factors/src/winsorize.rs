//! Winsorization of factor values.
//!
//! Extreme factor values are clipped to a `[floor, ceiling]` range before
//! standardization. The range comes from one of two modes, chosen once per
//! run and applied to every factor:
//!
//! - [`WinsorMode::Fixed`]: constant bounds per factor
//! - [`WinsorMode::Quantile`]: bounds from the factor's own distribution over
//!   the candidate set
//!
//! Quantile bounds are order statistics: the lower bound rounds its rank
//! up and the upper bound rounds its rank down, so both are sample values
//! inside the linearly interpolated percentile range. Clipping keeps the
//! order of the values, so a second pass finds the same bounds again. When
//! that range holds fewer than two ranks (tiny sets) nothing is clipped.

use deepvalue_traits::{Result, ScreenError, stats};
use serde::{Deserialize, Serialize};

use crate::FactorKind;

/// A closed clipping range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest value kept as is
    pub floor: f64,
    /// Largest value kept as is
    pub ceiling: f64,
}

impl Bounds {
    /// Creates a clipping range.
    #[must_use]
    pub const fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    /// Checks that both ends are finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`] otherwise.
    pub fn validate(&self, what: &str) -> Result<()> {
        if !self.floor.is_finite() || !self.ceiling.is_finite() {
            return Err(ScreenError::InvalidConfig(format!(
                "{what} winsorization bounds must be finite"
            )));
        }
        if self.floor > self.ceiling {
            return Err(ScreenError::InvalidConfig(format!(
                "{what} winsorization floor {} exceeds ceiling {}",
                self.floor, self.ceiling
            )));
        }
        Ok(())
    }

    /// Clips `values` into this range.
    #[must_use]
    pub fn clip(&self, values: &[f64]) -> Vec<f64> {
        let mut clipped = values.to_vec();
        stats::clip(&mut clipped, self.floor, self.ceiling);
        clipped
    }
}

/// How winsorization bounds are chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WinsorMode {
    /// Constant bounds per factor.
    Fixed {
        /// Earnings-yield bounds
        earnings_yield: Bounds,
        /// Book-to-market bounds
        book_to_market: Bounds,
    },
    /// Bounds at two quantiles of each factor's distribution.
    Quantile {
        /// Lower quantile, e.g. 0.025
        lower: f64,
        /// Upper quantile, e.g. 0.975
        upper: f64,
    },
}

impl Default for WinsorMode {
    fn default() -> Self {
        Self::Quantile {
            lower: 0.025,
            upper: 0.975,
        }
    }
}

impl WinsorMode {
    /// Bounds used by the portfolio ranking preset.
    #[must_use]
    pub const fn portfolio_bounds() -> Self {
        Self::Fixed {
            earnings_yield: Bounds::new(0.035886409, 0.203502579),
            book_to_market: Bounds::new(0.118213687, 1.82251566),
        }
    }

    /// Checks the mode parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`] for non-finite or inverted
    /// bounds, or quantiles outside `[0, 1]` or out of order.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed {
                earnings_yield,
                book_to_market,
            } => {
                earnings_yield.validate("earnings_yield")?;
                book_to_market.validate("book_to_market")
            }
            Self::Quantile { lower, upper } => {
                if !(0.0..=1.0).contains(lower) || !(0.0..=1.0).contains(upper) {
                    return Err(ScreenError::InvalidConfig(format!(
                        "winsorization quantiles must lie in [0, 1], got {lower} and {upper}"
                    )));
                }
                if lower >= upper {
                    return Err(ScreenError::InvalidConfig(format!(
                        "winsorization lower quantile {lower} must be below upper quantile {upper}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Bounds for `factor` given its values over the candidate set.
    ///
    /// Returns `None` when there is nothing to clip against: an empty set in
    /// quantile mode, or a factor without fixed bounds.
    #[must_use]
    pub fn bounds(&self, factor: FactorKind, values: &[f64]) -> Option<Bounds> {
        match self {
            Self::Fixed {
                earnings_yield,
                book_to_market,
            } => match factor {
                FactorKind::EarningsYield => Some(*earnings_yield),
                FactorKind::BookToMarket => Some(*book_to_market),
                FactorKind::CashFlowYield => None,
            },
            Self::Quantile { lower, upper } => quantile_bounds(values, *lower, *upper),
        }
    }

    /// Winsorizes the values of `factor`.
    #[must_use]
    pub fn apply(&self, factor: FactorKind, values: &[f64]) -> Vec<f64> {
        match self.bounds(factor, values) {
            Some(bounds) => bounds.clip(values),
            None => values.to_vec(),
        }
    }
}

/// Order-statistic bounds at the `lower` and `upper` quantiles.
fn quantile_bounds(values: &[f64], lower: f64, upper: f64) -> Option<Bounds> {
    let mut sorted: Vec<f64> = values.iter().filter(|x| x.is_finite()).copied().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len() - 1;
    let lower_idx = rank(lower * last as f64, f64::ceil);
    let upper_idx = rank(upper * last as f64, f64::floor).min(last);
    if lower_idx >= upper_idx {
        return Some(Bounds::new(sorted[0], sorted[last]));
    }

    Some(Bounds::new(sorted[lower_idx], sorted[upper_idx]))
}

/// Rounds a fractional rank, snapping positions that are integral up to
/// float error.
fn rank(pos: f64, round: fn(f64) -> f64) -> usize {
    let nearest = pos.round();
    if (pos - nearest).abs() < 1e-9 {
        nearest as usize
    } else {
        round(pos) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_quantile() {
        assert_eq!(
            WinsorMode::default(),
            WinsorMode::Quantile {
                lower: 0.025,
                upper: 0.975
            }
        );
    }

    #[test]
    fn test_fixed_bounds_clip() {
        let mode = WinsorMode::portfolio_bounds();
        let ey = mode.apply(FactorKind::EarningsYield, &[0.01, 0.1, 0.5]);
        assert_eq!(ey, vec![0.035886409, 0.1, 0.203502579]);

        let btm = mode.apply(FactorKind::BookToMarket, &[0.0, 1.0, 3.0]);
        assert_eq!(btm, vec![0.118213687, 1.0, 1.82251566]);
    }

    #[test]
    fn test_fixed_mode_leaves_unbounded_factor() {
        let mode = WinsorMode::portfolio_bounds();
        assert!(mode.bounds(FactorKind::CashFlowYield, &[1.0]).is_none());
    }

    #[test]
    fn test_quantile_bounds() {
        let values: Vec<f64> = (1..=41).map(f64::from).collect();
        // 40 gaps: ranks 1 and 39 fall on whole positions
        let bounds = WinsorMode::default()
            .bounds(FactorKind::BookToMarket, &values)
            .unwrap();
        assert_eq!(bounds, Bounds::new(2.0, 40.0));
    }

    #[test]
    fn test_quantile_bounds_clip_single_outlier() {
        let mut values: Vec<f64> = (1..=19).map(|i| f64::from(i) / 100.0).collect();
        values.push(5.0);

        let clipped = WinsorMode::default().apply(FactorKind::EarningsYield, &values);
        // ranks ceil(0.475) = 1 and floor(18.525) = 18
        assert_eq!(clipped[0], 0.02);
        assert_eq!(clipped[19], 0.19);
        assert_eq!(clipped[1..19], values[1..19]);
    }

    #[test]
    fn test_quantile_bounds_four_values_clip_to_neighbours() {
        let clipped = WinsorMode::default().apply(FactorKind::BookToMarket, &[0.1, 0.9, 0.5, 9.0]);
        assert_eq!(clipped, vec![0.5, 0.9, 0.5, 0.9]);
    }

    #[test]
    fn test_quantile_bounds_small_sample_keep_extremes() {
        let values = [3.0, 1.0, 2.0];
        let clipped = WinsorMode::default().apply(FactorKind::EarningsYield, &values);
        assert_eq!(clipped, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_quantile_empty() {
        assert!(
            WinsorMode::default()
                .bounds(FactorKind::EarningsYield, &[])
                .is_none()
        );
        assert!(
            WinsorMode::default()
                .apply(FactorKind::EarningsYield, &[])
                .is_empty()
        );
    }

    #[test]
    fn test_validate() {
        assert!(WinsorMode::default().validate().is_ok());
        assert!(WinsorMode::portfolio_bounds().validate().is_ok());
        assert!(
            WinsorMode::Quantile {
                lower: 0.9,
                upper: 0.1
            }
            .validate()
            .is_err()
        );
        assert!(
            WinsorMode::Quantile {
                lower: -0.1,
                upper: 0.5
            }
            .validate()
            .is_err()
        );
        assert!(
            WinsorMode::Fixed {
                earnings_yield: Bounds::new(1.0, 0.0),
                book_to_market: Bounds::new(0.0, 1.0),
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_serde_tagged_mode() {
        let mode: WinsorMode =
            serde_json::from_str(r#"{"mode":"quantile","lower":0.05,"upper":0.95}"#).unwrap();
        assert_eq!(
            mode,
            WinsorMode::Quantile {
                lower: 0.05,
                upper: 0.95
            }
        );

        let unknown = serde_json::from_str::<WinsorMode>(r#"{"mode":"median"}"#);
        assert!(unknown.is_err());
    }

    proptest! {
        #[test]
        fn prop_quantile_winsorization_is_idempotent(
            values in prop::collection::vec(-10.0..10.0f64, 0..80),
        ) {
            let mode = WinsorMode::default();
            let once = mode.apply(FactorKind::EarningsYield, &values);
            let twice = mode.apply(FactorKind::EarningsYield, &once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_quantile_bounds_within_linear_percentiles(
            values in prop::collection::vec(-10.0..10.0f64, 4..80),
        ) {
            let floor = stats::quantile(&values, 0.025).unwrap();
            let ceiling = stats::quantile(&values, 0.975).unwrap();
            let clipped = WinsorMode::default().apply(FactorKind::EarningsYield, &values);
            prop_assert!(clipped.iter().all(|&v| v >= floor - 1e-12 && v <= ceiling + 1e-12));
        }

        #[test]
        fn prop_fixed_winsorization_is_idempotent(
            values in prop::collection::vec(-1.0..3.0f64, 0..80),
        ) {
            let mode = WinsorMode::portfolio_bounds();
            let once = mode.apply(FactorKind::BookToMarket, &values);
            let twice = mode.apply(FactorKind::BookToMarket, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
