use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use crate::{Breakout, cov, ema, percentile_rank, returns_from_closes, variance};

/// Epsilon floor for the range divisor, so a flat window (high == low)
/// classifies instead of dividing by zero.
const RANGE_EPSILON: f64 = 1e-9;

/// Fraction of the price range treated as "near" an extreme.
///
/// Wraps an `f64` in the open interval `(0, 0.5)`. The constructor
/// panics outside that interval or on NaN.
///
/// Defaults to `0.1` (the top and bottom 10% of the range).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe
/// because NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct BandFraction(f64);

impl BandFraction {
    /// Creates a new near-band fraction.
    ///
    /// # Panics
    ///
    /// Panics if `value` is NaN, not positive, or at least `0.5`
    /// (bands covering half the range or more would overlap).
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "near band must not be NaN");
        assert!(value > 0.0, "near band must be positive");
        assert!(value < 0.5, "near band must be below 0.5");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for BandFraction {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for BandFraction {}

impl Hash for BandFraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for BandFraction {
    fn default() -> Self {
        Self(0.1)
    }
}

/// Configuration for the [`AlphaLens`] snapshot.
///
/// Every threshold of the composite calculation is a knob here, with
/// defaults matching the reference constants. The defaults are part of
/// the output contract: changing the volatility lookback or window
/// shifts the percentile distribution against any recorded outputs, so
/// tune them deliberately, not speculatively.
///
/// # Example
///
/// ```
/// use alpha_lens::AlphaLensConfig;
/// use std::num::NonZero;
///
/// let config = AlphaLensConfig::builder()
///     .vol_lookback(120)
///     .range_window(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.vol_lookback(), 120);
/// assert_eq!(config.range_window(), 20);
/// // Untouched knobs keep their defaults
/// assert_eq!(config.min_history(), 50);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AlphaLensConfig {
    min_history: usize,
    fast_length: usize,
    slow_length: usize,
    slope_lookback: usize,
    vol_window: usize,
    vol_lookback: usize,
    periods_per_year: usize,
    range_window: usize,
    near_band: BandFraction,
}

impl AlphaLensConfig {
    /// Returns a new builder with the reference defaults.
    #[inline]
    #[must_use]
    pub fn builder() -> AlphaLensConfigBuilder {
        AlphaLensConfigBuilder::new()
    }

    /// Minimum closes required in each series before a snapshot is
    /// produced. Shorter inputs yield `None`. Default: 50.
    #[inline]
    #[must_use]
    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Fast EMA length for the trend score. Default: 20.
    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast_length
    }

    /// Slow EMA length for the trend score. Default: 50.
    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow_length
    }

    /// Periods to look back when measuring EMA slope. Default: 5.
    #[inline]
    #[must_use]
    pub fn slope_lookback(&self) -> usize {
        self.slope_lookback
    }

    /// Rolling window, in returns, for realized volatility. Default: 60.
    #[inline]
    #[must_use]
    pub fn vol_window(&self) -> usize {
        self.vol_window
    }

    /// Trailing returns the rolling-volatility history is built over
    /// (all available when fewer). Default: 240.
    #[inline]
    #[must_use]
    pub fn vol_lookback(&self) -> usize {
        self.vol_lookback
    }

    /// Trading periods per year, used to annualize volatility.
    /// Default: 252.
    #[inline]
    #[must_use]
    pub fn periods_per_year(&self) -> usize {
        self.periods_per_year
    }

    /// Closes considered for the breakout range. Default: 60.
    #[inline]
    #[must_use]
    pub fn range_window(&self) -> usize {
        self.range_window
    }

    /// Fraction of the range classified as near an extreme.
    /// Default: 0.1.
    #[inline]
    #[must_use]
    pub fn near_band(&self) -> BandFraction {
        self.near_band
    }
}

impl Default for AlphaLensConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for AlphaLensConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AlphaLensConfig(ema {}/{}, vol {}/{}, range {})",
            self.fast_length, self.slow_length, self.vol_window, self.vol_lookback,
            self.range_window
        )
    }
}

/// Builder for [`AlphaLensConfig`].
///
/// Every knob has a default (the reference constants), so `build`
/// never fails. Window lengths take `NonZero<usize>`: a zero-length
/// EMA or range window has no meaning.
pub struct AlphaLensConfigBuilder {
    config: AlphaLensConfig,
}

impl AlphaLensConfigBuilder {
    fn new() -> Self {
        Self {
            config: AlphaLensConfig {
                min_history: 50,
                fast_length: 20,
                slow_length: 50,
                slope_lookback: 5,
                vol_window: 60,
                vol_lookback: 240,
                periods_per_year: 252,
                range_window: 60,
                near_band: BandFraction::default(),
            },
        }
    }

    /// Sets the minimum history floor.
    #[inline]
    #[must_use]
    pub fn min_history(mut self, min_history: usize) -> Self {
        self.config.min_history = min_history;
        self
    }

    /// Sets the fast EMA length.
    #[inline]
    #[must_use]
    pub fn fast_length(mut self, length: NonZero<usize>) -> Self {
        self.config.fast_length = length.get();
        self
    }

    /// Sets the slow EMA length.
    #[inline]
    #[must_use]
    pub fn slow_length(mut self, length: NonZero<usize>) -> Self {
        self.config.slow_length = length.get();
        self
    }

    /// Sets the EMA slope lookback.
    #[inline]
    #[must_use]
    pub fn slope_lookback(mut self, lookback: usize) -> Self {
        self.config.slope_lookback = lookback;
        self
    }

    /// Sets the rolling volatility window.
    #[inline]
    #[must_use]
    pub fn vol_window(mut self, window: NonZero<usize>) -> Self {
        self.config.vol_window = window.get();
        self
    }

    /// Sets the rolling-volatility history lookback.
    #[inline]
    #[must_use]
    pub fn vol_lookback(mut self, lookback: usize) -> Self {
        self.config.vol_lookback = lookback;
        self
    }

    /// Sets the annualization basis.
    #[inline]
    #[must_use]
    pub fn periods_per_year(mut self, periods: NonZero<usize>) -> Self {
        self.config.periods_per_year = periods.get();
        self
    }

    /// Sets the breakout range window.
    #[inline]
    #[must_use]
    pub fn range_window(mut self, window: NonZero<usize>) -> Self {
        self.config.range_window = window.get();
        self
    }

    /// Sets the near-extreme band fraction.
    #[inline]
    #[must_use]
    pub fn near_band(mut self, band: BandFraction) -> Self {
        self.config.near_band = band;
        self
    }

    /// Builds the config.
    #[inline]
    #[must_use]
    pub fn build(self) -> AlphaLensConfig {
        self.config
    }
}

/// Snapshot statistics for one instrument against a benchmark.
///
/// All five fields are produced together; there are no partial
/// snapshots. `beta` and `idio_today_pct` are rounded to two decimals
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaLensStats {
    trend_score: u8,
    vol_percentile: u8,
    breakout: Breakout,
    beta: f64,
    idio_today_pct: f64,
}

impl AlphaLensStats {
    /// Trend strength in `0..=5`, from EMA alignment and slope.
    #[inline]
    #[must_use]
    pub fn trend_score(&self) -> u8 {
        self.trend_score
    }

    /// Percentile of current realized volatility within its own
    /// trailing history, in `0..=100`.
    #[inline]
    #[must_use]
    pub fn vol_percentile(&self) -> u8 {
        self.vol_percentile
    }

    /// Position of the latest close within the recent range.
    #[inline]
    #[must_use]
    pub fn breakout(&self) -> Breakout {
        self.breakout
    }

    /// Sensitivity to benchmark returns, rounded to two decimals.
    /// `0.0` when the benchmark has zero variance.
    #[inline]
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Latest-period return not explained by beta-scaled benchmark
    /// exposure, in percent, rounded to two decimals.
    #[inline]
    #[must_use]
    pub fn idio_today_pct(&self) -> f64 {
        self.idio_today_pct
    }
}

impl Display for AlphaLensStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lens(trend: {}/5, vol: {}, {}, beta: {:.2}, idio: {:+.2}%)",
            self.trend_score, self.vol_percentile, self.breakout, self.beta, self.idio_today_pct
        )
    }
}

/// Composite analytics over two daily close series.
///
/// Given chronological closes (oldest first) for a target instrument
/// and a benchmark index, [`compute`](Self::compute) produces an
/// [`AlphaLensStats`] snapshot, or `None` when either series is
/// shorter than the configured history floor.
///
/// The calculation is pure: no I/O, no interior state, inputs are
/// never mutated, and identical inputs always produce identical
/// output. Degenerate-but-sufficient inputs (flat prices, zero
/// variance) yield neutral `0`-valued fields rather than NaN.
///
/// # Example
///
/// ```
/// use alpha_lens::{AlphaLens, AlphaLensConfig, Breakout};
///
/// let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
/// let benchmark: Vec<f64> = (0..60).map(|i| 200.0 + 0.5 * f64::from(i)).collect();
///
/// let lens = AlphaLens::new(AlphaLensConfig::default());
/// let stats = lens.compute(&closes, &benchmark).unwrap();
///
/// assert!(stats.trend_score() > 0);
/// assert_eq!(stats.breakout(), Breakout::NewHigh);
/// ```
#[derive(Default, Clone, Copy, Debug)]
pub struct AlphaLens {
    config: AlphaLensConfig,
}

impl AlphaLens {
    /// Creates a lens from the given config.
    #[must_use]
    pub fn new(config: AlphaLensConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &AlphaLensConfig {
        &self.config
    }

    /// Computes the snapshot for `closes` against `benchmark_closes`.
    ///
    /// Returns `None` when either series is shorter than
    /// [`min_history`](AlphaLensConfig::min_history).
    #[must_use]
    pub fn compute(&self, closes: &[f64], benchmark_closes: &[f64]) -> Option<AlphaLensStats> {
        let config = &self.config;

        if closes.len() < config.min_history || benchmark_closes.len() < config.min_history {
            return None;
        }
        let last = closes.len().checked_sub(1)?;

        let trend_score = self.trend_score(closes, last);

        let returns = returns_from_closes(closes);
        let vol_percentile = self.vol_percentile(&returns);

        let breakout = self.breakout(closes, last);

        let benchmark_returns = returns_from_closes(benchmark_closes);
        let (beta, idio_today_pct) = Self::beta_and_idio(&returns, &benchmark_returns);

        Some(AlphaLensStats {
            trend_score,
            vol_percentile,
            breakout,
            beta: round2(beta),
            idio_today_pct: round2(idio_today_pct),
        })
    }

    /// Additive trend score: +2 for fast EMA above slow, +2 for a
    /// rising fast EMA, +1 for a rising slow EMA.
    fn trend_score(&self, closes: &[f64], last: usize) -> u8 {
        let fast = ema(closes, self.config.fast_length);
        let slow = ema(closes, self.config.slow_length);
        // Degenerate configs can set the floor below the lookback;
        // saturate so the slope base never underflows.
        let base = last.saturating_sub(self.config.slope_lookback);

        let mut score = 0;
        if fast[last] > slow[last] {
            score += 2;
        }
        if fast[last] - fast[base] > 0.0 {
            score += 2;
        }
        if slow[last] - slow[base] > 0.0 {
            score += 1;
        }
        score.min(5)
    }

    /// Current annualized volatility ranked against its own rolling
    /// history over the trailing lookback.
    fn vol_percentile(&self, returns: &[f64]) -> u8 {
        let window = self.config.vol_window;

        let vol_now = self.annualized_vol(tail(returns, window));

        let sample = tail(returns, self.config.vol_lookback);
        let mut rolling = Vec::new();
        if sample.len() >= window {
            rolling.reserve(sample.len() - window + 1);
            for end in window..=sample.len() {
                rolling.push(self.annualized_vol(&sample[end - window..end]));
            }
        }

        percentile_rank(&rolling, vol_now)
    }

    fn breakout(&self, closes: &[f64], last: usize) -> Breakout {
        let look = tail(closes, self.config.range_window);
        let hi = look.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = look.iter().copied().fold(f64::INFINITY, f64::min);

        let pos = (closes[last] - lo) / (hi - lo).max(RANGE_EPSILON);
        Breakout::classify(pos, self.config.near_band.value())
    }

    /// Beta over the most recent overlapping return window, and the
    /// latest-period return in percent net of beta-scaled benchmark
    /// exposure.
    fn beta_and_idio(returns: &[f64], benchmark_returns: &[f64]) -> (f64, f64) {
        let n = returns.len().min(benchmark_returns.len());
        let own = &returns[returns.len() - n..];
        let bench = &benchmark_returns[benchmark_returns.len() - n..];

        let bench_var = variance(bench);
        let beta = if bench_var == 0.0 {
            0.0
        } else {
            cov(own, bench) / bench_var
        };

        let today_own = returns.last().copied().unwrap_or(0.0);
        let today_bench = benchmark_returns.last().copied().unwrap_or(0.0);
        let idio_today_pct = (today_own - beta * today_bench) * 100.0;

        (beta, idio_today_pct)
    }

    #[allow(clippy::cast_precision_loss)]
    fn annualized_vol(&self, returns: &[f64]) -> f64 {
        (self.config.periods_per_year as f64).sqrt() * variance(returns).sqrt()
    }
}

impl Display for AlphaLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AlphaLens({}/{})",
            self.config.fast_length, self.config.slow_length
        )
    }
}

/// Snapshot with the reference defaults. See [`AlphaLens::compute`].
#[must_use]
pub fn alpha_lens(closes: &[f64], benchmark_closes: &[f64]) -> Option<AlphaLensStats> {
    AlphaLens::new(AlphaLensConfig::default()).compute(closes, benchmark_closes)
}

/// Last `n` elements of `values`, or all of them when shorter.
fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
