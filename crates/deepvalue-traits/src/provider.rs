//! External collaborators of a screening run.
//!
//! A run talks to at most three collaborators: a fundamentals provider that
//! returns the raw snapshot table, a price-history provider that returns
//! daily closes, and an optional name lookup used for the final shortlist.
//! Implementations should be thread-safe (`Send + Sync`) so fetches can be
//! driven from any runtime thread.

use crate::{HistoryWindow, PriceHistory, Result, ScreenError, Ticker};
use polars::prelude::*;
use std::collections::HashMap;
use std::future::ready;

/// Source of the raw fundamentals snapshot.
///
/// Field names are provider-specific and values may be strings in a local
/// number format. The normalizer folds them into the canonical schema.
pub trait FundamentalsProvider: Send + Sync {
    /// Name of the provider, used in logs.
    fn name(&self) -> &str;

    /// Fetches the raw fundamentals table, one row per listed ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be obtained at all.
    fn fetch_fundamentals(&self) -> impl Future<Output = Result<DataFrame>> + Send;
}

/// Source of daily closing prices.
///
/// Unknown or delisted tickers must be omitted from the returned history
/// rather than failing the whole batch.
pub trait PriceHistoryProvider: Send + Sync {
    /// Name of the provider, used in logs.
    fn name(&self) -> &str;

    /// Fetches the closes of every requested ticker inside `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch request fails as a whole.
    fn fetch_closes(
        &self,
        tickers: &[Ticker],
        window: HistoryWindow,
    ) -> impl Future<Output = Result<PriceHistory>> + Send;
}

/// Resolves a ticker to a human-readable issuer name.
pub trait NameLookup: Send + Sync {
    /// Looks up the issuer name of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the lookup fails. Callers
    /// fall back to the ticker itself.
    fn issuer_name(&self, ticker: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<T: FundamentalsProvider + ?Sized> FundamentalsProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_fundamentals(&self) -> impl Future<Output = Result<DataFrame>> + Send {
        (**self).fetch_fundamentals()
    }
}

impl<T: PriceHistoryProvider + ?Sized> PriceHistoryProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_closes(
        &self,
        tickers: &[Ticker],
        window: HistoryWindow,
    ) -> impl Future<Output = Result<PriceHistory>> + Send {
        (**self).fetch_closes(tickers, window)
    }
}

impl<T: NameLookup + ?Sized> NameLookup for &T {
    fn issuer_name(&self, ticker: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).issuer_name(ticker)
    }
}

impl NameLookup for HashMap<Ticker, String> {
    fn issuer_name(&self, ticker: &str) -> impl Future<Output = Result<String>> + Send {
        ready(
            self.get(ticker)
                .cloned()
                .ok_or_else(|| ScreenError::Provider(format!("no issuer name for {ticker}"))),
        )
    }
}

/// A name lookup that knows no names, so every ticker displays as itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameLookup for NoNames {
    fn issuer_name(&self, ticker: &str) -> impl Future<Output = Result<String>> + Send {
        ready(Err(ScreenError::Provider(format!(
            "name lookup disabled for {ticker}"
        ))))
    }
}
