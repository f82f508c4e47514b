//! Snapshot analytics for daily close series.
//!
//! Given chronological closing prices for an instrument and a benchmark
//! index, [`AlphaLens`] computes a compact trading-style snapshot:
//! trend score, volatility percentile, breakout state, beta, and the
//! idiosyncratic portion of the latest move. Insufficient history
//! (fewer than 50 closes on either side by default) yields `None`
//! instead of a partial result.
//!
//! Everything is pure and total: no I/O, no state, and degenerate
//! inputs (flat prices, zero variance) degrade to neutral `0`-valued
//! fields rather than panicking or emitting NaN. The building blocks
//! ([`ema`], [`returns_from_closes`], [`percentile_rank`], [`cov`],
//! [`variance`]) are exported as free functions.
//!
//! ```
//! use alpha_lens::{Breakout, alpha_lens};
//!
//! let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
//! let benchmark: Vec<f64> = (0..60).map(|i| 200.0 + 0.5 * f64::from(i)).collect();
//!
//! let stats = alpha_lens(&closes, &benchmark).expect("60 closes is enough history");
//! assert_eq!(stats.breakout(), Breakout::NewHigh);
//! assert!(stats.trend_score() > 0);
//!
//! // Too little history on either side is a `None`, never a panic.
//! assert!(alpha_lens(&closes[..40], &benchmark).is_none());
//! ```

mod breakout;
mod lens;
mod stats;

pub use crate::breakout::Breakout;
pub use crate::lens::{
    AlphaLens, AlphaLensConfig, AlphaLensConfigBuilder, AlphaLensStats, BandFraction, alpha_lens,
};
pub use crate::stats::{cov, ema, percentile_rank, returns_from_closes, variance};

#[cfg(test)]
mod test_util;
