//! Earnings yield value factor.

use deepvalue_traits::{Result, Universe, columns};

use crate::{FactorKind, ValueFactor};

/// Earnings yield of a single issuer.
///
/// `1 / ev_to_ebit` when EV/EBIT is positive, otherwise `1 / price_to_earnings`
/// when P/E is positive, otherwise `0.0`.
///
/// ```
/// use deepvalue_factors::value::earnings_yield;
///
/// assert_eq!(earnings_yield(5.0, 10.0), 0.2);
/// assert_eq!(earnings_yield(0.0, 10.0), 0.1);
/// assert_eq!(earnings_yield(-3.0, -4.0), 0.0);
/// ```
#[must_use]
pub fn earnings_yield(ev_to_ebit: f64, price_to_earnings: f64) -> f64 {
    if ev_to_ebit > 0.0 {
        1.0 / ev_to_ebit
    } else if price_to_earnings > 0.0 {
        1.0 / price_to_earnings
    } else {
        0.0
    }
}

/// Earnings yield factor over the candidate set.
///
/// EV/EBIT is preferred because it is capital-structure neutral; P/E is the
/// fallback for issuers whose EV/EBIT is missing or negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarningsYield;

impl ValueFactor for EarningsYield {
    fn kind(&self) -> FactorKind {
        FactorKind::EarningsYield
    }

    fn required_columns(&self) -> &[&str] {
        &[columns::EV_TO_EBIT, columns::PRICE_TO_EARNINGS]
    }

    fn compute(&self, universe: &Universe) -> Result<Vec<f64>> {
        self.validate(universe)?;
        let ev_ebit = universe.f64_values(columns::EV_TO_EBIT)?;
        let pe = universe.f64_values(columns::PRICE_TO_EARNINGS)?;

        Ok(ev_ebit
            .iter()
            .zip(&pe)
            .map(|(&ev, &pe)| earnings_yield(ev, pe))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polars::df;

    #[test]
    fn test_primary_rule() {
        assert_relative_eq!(earnings_yield(4.0, 20.0), 0.25);
    }

    #[test]
    fn test_fallback_to_pe_when_ev_ebit_zero() {
        assert_relative_eq!(earnings_yield(0.0, 10.0), 0.1);
    }

    #[test]
    fn test_fallback_to_pe_when_ev_ebit_negative() {
        assert_relative_eq!(earnings_yield(-7.5, 8.0), 0.125);
    }

    #[test]
    fn test_zero_when_both_undefined() {
        assert_eq!(earnings_yield(0.0, 0.0), 0.0);
        assert_eq!(earnings_yield(-1.0, -1.0), 0.0);
    }

    #[test]
    fn test_compute_over_universe() {
        let universe = Universe::new(
            df! {
                "ticker" => &["AAAA3", "BBBB4", "CCCC3"],
                "ev_to_ebit" => &[5.0, 0.0, -2.0],
                "price_to_earnings" => &[8.0, 10.0, 0.0],
            }
            .unwrap(),
        );

        let values = EarningsYield.compute(&universe).unwrap();
        assert_relative_eq!(values[0], 0.2);
        assert_relative_eq!(values[1], 0.1);
        assert_eq!(values[2], 0.0);
    }

    #[test]
    fn test_missing_column() {
        let universe = Universe::new(
            df! {
                "ticker" => &["AAAA3"],
                "ev_to_ebit" => &[5.0],
            }
            .unwrap(),
        );
        assert!(EarningsYield.compute(&universe).is_err());
    }
}
