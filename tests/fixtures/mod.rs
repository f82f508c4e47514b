#![allow(dead_code)]

use serde::Deserialize;

/// One trading day of the reference fixture: closes for the target
/// symbol and the benchmark index.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyClose {
    pub day: u64,
    pub symbol: f64,
    pub benchmark: f64,
}

const CLOSES_PATH: &str = "tests/fixtures/data/daily-closes.csv";

/// Loads the reference close series: `(symbol, benchmark)`, oldest first.
///
/// The fixture is a deterministic 260-day geometric walk where the
/// symbol carries roughly 1.3x benchmark exposure plus independent
/// noise, so beta and the idiosyncratic return are both meaningfully
/// non-trivial.
pub fn load_daily_closes() -> (Vec<f64>, Vec<f64>) {
    let mut rdr = csv::Reader::from_path(CLOSES_PATH)
        .unwrap_or_else(|e| panic!("failed to open {CLOSES_PATH}: {e}"));

    let rows: Vec<DailyClose> = rdr
        .deserialize()
        .map(|r| r.expect("invalid close record"))
        .collect();

    let symbol = rows.iter().map(|r| r.symbol).collect();
    let benchmark = rows.iter().map(|r| r.benchmark).collect();
    (symbol, benchmark)
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}
