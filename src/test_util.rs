// src/test_util.rs

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Arithmetic close series: `start`, `start + step`, `start + 2*step`, ...
///
/// Positive step builds a steady uptrend, negative step a downtrend.
#[allow(clippy::cast_precision_loss)]
pub fn stepped(len: usize, start: f64, step: f64) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Constant close series.
pub fn flat(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

/// Compounds a close series from `start` and a sequence of fractional
/// returns. Output length is one greater than the number of returns.
pub fn from_returns(start: f64, returns: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut closes = vec![start];
    let mut prev = start;
    for r in returns {
        prev *= 1.0 + r;
        closes.push(prev);
    }
    closes
}
