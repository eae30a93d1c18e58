//! Value factors based on fundamental valuation multiples.
//!
//! - Earnings yield: inverse EV/EBIT, or inverse P/E when EV/EBIT is not positive
//! - Book-to-market: inverse price-to-book
//!
//! Both are "higher is cheaper" and both are zero when the underlying
//! multiple is not positive.

mod book_to_market;
mod earnings_yield;

pub use book_to_market::{BookToMarket, book_to_market};
pub use earnings_yield::{EarningsYield, earnings_yield};
