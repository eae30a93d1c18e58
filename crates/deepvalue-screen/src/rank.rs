//! Final ordering of the candidates.

use deepvalue_traits::{Result, Ticker, Universe, columns};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// One row of the shortlist.
///
/// Numeric fields are plain floats so a renderer can format them as it
/// likes. The cash-flow yield is always `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based position
    pub rank: usize,
    /// Representative ticker of the issuer
    pub ticker: Ticker,
    /// Issuer name, or the ticker when unknown
    pub name: String,
    /// Composite index
    pub composite: f64,
    /// Earnings yield
    pub earnings_yield: f64,
    /// Book-to-market
    pub book_to_market: f64,
    /// Cash-flow yield (unavailable)
    pub cash_flow_yield: Option<f64>,
    /// Winsorized earnings yield
    pub earnings_yield_w: f64,
    /// Winsorized book-to-market
    pub book_to_market_w: f64,
    /// Earnings-yield z-score
    pub z_earnings_yield: f64,
    /// Book-to-market z-score
    pub z_book_to_market: f64,
    /// Market capitalization
    pub market_cap: f64,
    /// Liquidity
    pub liquidity: f64,
    /// Annualized volatility
    pub volatility: f64,
    /// Last price
    pub price: f64,
}

/// The shortlist, best candidate first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    /// The entries in rank order.
    #[must_use]
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the shortlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, RankingEntry> {
        self.entries.iter()
    }

    /// Tickers in rank order.
    #[must_use]
    pub fn tickers(&self) -> Vec<Ticker> {
        self.entries.iter().map(|e| e.ticker.clone()).collect()
    }

    /// Replaces display names with the ones found in `names`.
    ///
    /// Tickers missing from `names` keep their current name.
    #[must_use]
    pub fn with_names(mut self, names: &HashMap<Ticker, String>) -> Self {
        for entry in &mut self.entries {
            if let Some(name) = names.get(&entry.ticker) {
                entry.name.clone_from(name);
            }
        }
        self
    }

    /// The shortlist as a DataFrame, one named column per field.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let float = |name: &str, f: fn(&RankingEntry) -> f64| -> Column {
            Series::new(name.into(), self.entries.iter().map(f).collect::<Vec<f64>>()).into()
        };
        let frame = DataFrame::new(vec![
            Series::new(
                "rank".into(),
                self.entries
                    .iter()
                    .map(|e| e.rank as u64)
                    .collect::<Vec<u64>>(),
            )
            .into(),
            Series::new(
                columns::TICKER.into(),
                self.entries
                    .iter()
                    .map(|e| e.ticker.as_str())
                    .collect::<Vec<&str>>(),
            )
            .into(),
            Series::new(
                "name".into(),
                self.entries
                    .iter()
                    .map(|e| e.name.as_str())
                    .collect::<Vec<&str>>(),
            )
            .into(),
            float(columns::COMPOSITE, |e| e.composite),
            float(columns::EARNINGS_YIELD, |e| e.earnings_yield),
            float(columns::BOOK_TO_MARKET, |e| e.book_to_market),
            Series::new(
                columns::CASH_FLOW_YIELD.into(),
                self.entries
                    .iter()
                    .map(|e| e.cash_flow_yield)
                    .collect::<Vec<Option<f64>>>(),
            )
            .into(),
            float(columns::EARNINGS_YIELD_W, |e| e.earnings_yield_w),
            float(columns::BOOK_TO_MARKET_W, |e| e.book_to_market_w),
            float(columns::Z_EARNINGS_YIELD, |e| e.z_earnings_yield),
            float(columns::Z_BOOK_TO_MARKET, |e| e.z_book_to_market),
            float(columns::MARKET_CAP, |e| e.market_cap),
            float(columns::LIQUIDITY, |e| e.liquidity),
            float(columns::VOLATILITY, |e| e.volatility),
            float(columns::PRICE, |e| e.price),
        ])?;
        Ok(frame)
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankingEntry;
    type IntoIter = std::slice::Iter<'a, RankingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Orders a factor table by composite index and keeps the top `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    top_n: usize,
}

impl Ranker {
    /// Creates a ranker keeping `top_n` entries.
    #[must_use]
    pub const fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Length of the shortlist.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Ranks the factor table.
    ///
    /// The sort is stable and descending on the composite index, so equal
    /// composites keep their order in the table. Ranks are 1-based and
    /// contiguous. Names start out as the tickers.
    ///
    /// # Errors
    ///
    /// Returns an error if a factor table column is missing.
    pub fn rank(&self, table: &Universe) -> Result<Ranking> {
        let tickers = table.tickers()?;
        let composite = table.f64_values(columns::COMPOSITE)?;
        let earnings_yield = table.f64_values(columns::EARNINGS_YIELD)?;
        let book_to_market = table.f64_values(columns::BOOK_TO_MARKET)?;
        let cash_flow_yield = table.optional_f64_values(columns::CASH_FLOW_YIELD)?;
        let earnings_yield_w = table.f64_values(columns::EARNINGS_YIELD_W)?;
        let book_to_market_w = table.f64_values(columns::BOOK_TO_MARKET_W)?;
        let z_earnings_yield = table.f64_values(columns::Z_EARNINGS_YIELD)?;
        let z_book_to_market = table.f64_values(columns::Z_BOOK_TO_MARKET)?;
        let market_cap = table.f64_values(columns::MARKET_CAP)?;
        let liquidity = table.f64_values(columns::LIQUIDITY)?;
        let volatility = table.f64_values(columns::VOLATILITY)?;
        let price = table.f64_values(columns::PRICE)?;

        let mut order: Vec<usize> = (0..tickers.len()).collect();
        order.sort_by(|&a, &b| composite[b].total_cmp(&composite[a]));
        order.truncate(self.top_n);

        let entries = order
            .into_iter()
            .enumerate()
            .map(|(pos, i)| RankingEntry {
                rank: pos + 1,
                ticker: tickers[i].clone(),
                name: tickers[i].clone(),
                composite: composite[i],
                earnings_yield: earnings_yield[i],
                book_to_market: book_to_market[i],
                cash_flow_yield: cash_flow_yield[i],
                earnings_yield_w: earnings_yield_w[i],
                book_to_market_w: book_to_market_w[i],
                z_earnings_yield: z_earnings_yield[i],
                z_book_to_market: z_book_to_market[i],
                market_cap: market_cap[i],
                liquidity: liquidity[i],
                volatility: volatility[i],
                price: price[i],
            })
            .collect();

        Ok(Ranking { entries })
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(100)
    }
}
