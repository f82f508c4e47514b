//! Free statistics helpers over price and return series.
//!
//! Every function here is total: degenerate inputs (empty slices, zero
//! divisors, zero variance) degrade to `0`-valued outputs instead of
//! panicking or leaking NaN. The composite [`AlphaLens`](crate::AlphaLens)
//! snapshot is built entirely from these primitives.

/// Exponential moving average of `values` with the standard smoothing
/// constant `k = 2 / (period + 1)`.
///
/// The output has the same length as the input; index 0 equals
/// `values[0]`, each later index `i` is `values[i] * k + prev * (1 - k)`.
///
/// An empty input yields a single-element `[0.0]` — a defined fallback,
/// not an error.
///
/// # Example
///
/// ```
/// use alpha_lens::ema;
///
/// let smoothed = ema(&[2.0, 4.0, 6.0], 3);
/// assert_eq!(smoothed[0], 2.0);
/// // k = 0.5: 4 * 0.5 + 2 * 0.5 = 3.0
/// assert_eq!(smoothed[1], 3.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);

    let mut prev = values.first().copied().unwrap_or(0.0);
    let mut out = Vec::with_capacity(values.len().max(1));
    out.push(prev);

    for &v in values.iter().skip(1) {
        let next = v * k + prev * (1.0 - k);
        out.push(next);
        prev = next;
    }

    out
}

/// Simple fractional returns between consecutive closes.
///
/// The output has length `len(closes) - 1` (empty for fewer than two
/// closes); element `i` is `(closes[i + 1] - closes[i]) / closes[i]`.
///
/// A zero closing price would make the next return undefined; it is
/// mapped to `0.0` so the result stays NaN-free.
#[must_use]
pub fn returns_from_closes(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                0.0
            } else {
                (pair[1] - pair[0]) / pair[0]
            }
        })
        .collect()
}

/// Percentile rank of `value` within `sample`, as an integer in `0..=100`.
///
/// The rank is the number of sample elements not greater than `value`
/// (the index of the first strictly-greater element in the sorted
/// sample), scaled by the sample size and rounded. Exact matches count
/// toward the rank; this first-strictly-greater tie-break is part of
/// the contract — changing it shifts every reported percentile.
///
/// An empty sample ranks everything at `0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentile_rank(sample: &[f64], value: f64) -> u8 {
    if sample.is_empty() {
        return 0;
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = sorted.partition_point(|v| *v <= value);

    (rank as f64 / sorted.len() as f64 * 100.0).round() as u8
}

/// Population covariance of `x` and `y` (denominator `n`, not `n − 1`).
///
/// Pairs the first `n = min(len(x), len(y))` elements; callers align
/// their windows before the call. Empty input returns `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cov(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let (x, y) = (&x[..n], &y[..n]);
    let len = n as f64;
    let mx = x.iter().sum::<f64>() / len;
    let my = y.iter().sum::<f64>() / len;

    let mut acc = 0.0;
    for (a, b) in x.iter().zip(y) {
        acc += (a - mx) * (b - my);
    }
    acc / len
}

/// Population variance of `x` (denominator `n`, not `n − 1`).
///
/// Empty input returns `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn variance(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;

    let mut acc = 0.0;
    for &v in x {
        acc += (v - mean) * (v - mean);
    }
    acc / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    mod ema_fn {
        use super::*;

        #[test]
        fn first_element_equals_input_head() {
            let out = ema(&[10.0, 11.0, 12.0, 13.0, 14.0], 2);
            assert_eq!(out[0], 10.0);
        }

        #[test]
        fn same_length_as_input() {
            let values = [1.0, 2.0, 3.0, 4.0];
            assert_eq!(ema(&values, 3).len(), values.len());
        }

        #[test]
        fn empty_input_yields_single_zero() {
            assert_eq!(ema(&[], 10), vec![0.0]);
        }

        #[test]
        fn applies_smoothing_constant() {
            // k = 2/(2+1) = 2/3
            // i=1: 11 * 2/3 + 10 * 1/3 = 10.666...
            let out = ema(&[10.0, 11.0, 12.0, 13.0, 14.0], 2);
            assert_approx!(out[1], 32.0 / 3.0);
        }

        #[test]
        fn constant_input_stays_constant() {
            let out = ema(&[50.0; 20], 5);
            for v in out {
                assert_eq!(v, 50.0);
            }
        }

        #[test]
        fn period_one_tracks_input() {
            // k = 2/(1+1) = 1
            let values = [10.0, 20.0, 5.0];
            assert_eq!(ema(&values, 1), values.to_vec());
        }
    }

    mod returns {
        use super::*;

        #[test]
        fn computes_simple_returns() {
            let rets = returns_from_closes(&[100.0, 110.0, 99.0]);
            assert_eq!(rets.len(), 2);
            assert_approx!(rets[0], 0.1);
            assert_approx!(rets[1], -0.1);
        }

        #[test]
        fn empty_and_single_close_yield_empty() {
            assert!(returns_from_closes(&[]).is_empty());
            assert!(returns_from_closes(&[42.0]).is_empty());
        }

        #[test]
        fn zero_close_maps_to_zero_return() {
            let rets = returns_from_closes(&[0.0, 10.0, 20.0]);
            assert_eq!(rets[0], 0.0);
            assert_eq!(rets[1], 1.0);
            assert!(rets.iter().all(|r| r.is_finite()));
        }
    }

    mod percentile {
        use super::*;

        #[test]
        fn interior_value() {
            // 3 of 5 elements are <= 3: 3/5 = 60
            assert_eq!(percentile_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], 3.0), 60);
        }

        #[test]
        fn below_all() {
            assert_eq!(percentile_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.0), 0);
        }

        #[test]
        fn above_all() {
            assert_eq!(percentile_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], 6.0), 100);
        }

        #[test]
        fn empty_sample_is_zero() {
            assert_eq!(percentile_rank(&[], 3.0), 0);
        }

        #[test]
        fn exact_matches_count_toward_rank() {
            // All three elements are "not greater than" 1
            assert_eq!(percentile_rank(&[1.0, 1.0, 1.0], 1.0), 100);
        }

        #[test]
        fn unsorted_sample_is_sorted_internally() {
            assert_eq!(percentile_rank(&[5.0, 1.0, 4.0, 2.0, 3.0], 3.0), 60);
        }

        #[test]
        fn duplicate_boundary_values() {
            // <= 2 matches 1, 2, 2: rank 3 of 5 = 60
            assert_eq!(percentile_rank(&[1.0, 2.0, 2.0, 3.0, 4.0], 2.0), 60);
        }
    }

    mod dispersion {
        use super::*;

        #[test]
        #[allow(clippy::float_cmp)]
        fn variance_of_known_sample() {
            // mean = 5, squared diffs sum to 32, 32/8 = 4
            let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
            assert_eq!(variance(&data), 4.0);
        }

        #[test]
        fn variance_of_empty_is_zero() {
            assert_eq!(variance(&[]), 0.0);
        }

        #[test]
        fn variance_of_constant_is_zero() {
            assert_eq!(variance(&[7.0; 12]), 0.0);
        }

        #[test]
        fn cov_of_identical_series() {
            // mean 2, squared diffs 1 + 0 + 1 = 2, 2/3
            let x = [1.0, 2.0, 3.0];
            assert_approx!(cov(&x, &x), 2.0 / 3.0);
        }

        #[test]
        fn cov_matches_variance_on_self() {
            let x = [0.3, -0.1, 0.7, 0.2, -0.4];
            assert_approx!(cov(&x, &x), variance(&x));
        }

        #[test]
        fn cov_truncates_to_shorter_input() {
            let x = [1.0, 2.0, 3.0, 100.0, 200.0];
            let y = [1.0, 2.0, 3.0];
            assert_approx!(cov(&x, &y), 2.0 / 3.0);
        }

        #[test]
        fn cov_of_empty_is_zero() {
            assert_eq!(cov(&[], &[1.0, 2.0]), 0.0);
        }

        #[test]
        fn anti_correlated_series_has_negative_cov() {
            let x = [1.0, 2.0, 3.0];
            let y = [3.0, 2.0, 1.0];
            assert!(cov(&x, &y) < 0.0);
        }
    }
}
