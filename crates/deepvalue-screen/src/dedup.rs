//! One listing per issuer.
//!
//! Issuers often list several share classes (`PETR3`, `PETR4`). Only the
//! most liquid listing of each issuer stays in the candidate set. The issuer
//! is identified by the first four characters of the ticker.

use deepvalue_traits::{Result, Universe, columns, issuer_prefix};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Keeps the most liquid listing of each issuer.
///
/// On equal liquidity the listing that appears first wins. Retained rows keep
/// their original relative order, and the ticker of the retained listing
/// stays the display identity.
///
/// # Errors
///
/// Returns an error if the ticker or liquidity column is missing.
pub fn deduplicate(universe: &Universe) -> Result<Universe> {
    let tickers = universe.tickers()?;
    let liquidity = universe.f64_values(columns::LIQUIDITY)?;

    let mut best: HashMap<&str, usize> = HashMap::with_capacity(tickers.len());
    for (row, ticker) in tickers.iter().enumerate() {
        match best.entry(issuer_prefix(ticker)) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if liquidity[row] > liquidity[*slot.get()] {
                    slot.insert(row);
                }
            }
        }
    }

    let mut keep = vec![false; tickers.len()];
    for &row in best.values() {
        keep[row] = true;
    }

    let deduplicated = universe.retain(&keep)?;
    debug!(
        listings = universe.len(),
        issuers = deduplicated.len(),
        "deduplicated listings"
    );
    Ok(deduplicated)
}
