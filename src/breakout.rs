use std::fmt::Display;

/// Position of the latest close within its recent trading range.
///
/// Produced by [`AlphaLens::compute`](crate::AlphaLens::compute) from the
/// normalized range position `pos = (last − lo) / (hi − lo)` over the
/// configured range window. Exact extremes (`pos >= 1`, `pos <= 0`) take
/// precedence over the near bands, so a close sitting exactly on the
/// window high is `NewHigh`, never `NearHigh`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Breakout {
    /// Close at or above the window high.
    NewHigh,
    /// Close within the near band below the high.
    NearHigh,
    /// Close in the middle of the range.
    Range,
    /// Close within the near band above the low.
    NearLow,
    /// Close at or below the window low.
    NewLow,
}

impl Breakout {
    /// Classifies a normalized range position.
    ///
    /// `near_band` is the fraction of the range treated as "near" an
    /// extreme (0.1 means the top and bottom 10%).
    pub(crate) fn classify(pos: f64, near_band: f64) -> Self {
        if pos >= 1.0 {
            Self::NewHigh
        } else if pos >= 1.0 - near_band {
            Self::NearHigh
        } else if pos <= 0.0 {
            Self::NewLow
        } else if pos <= near_band {
            Self::NearLow
        } else {
            Self::Range
        }
    }
}

impl Display for Breakout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NewHigh => "New High",
            Self::NearHigh => "Near High",
            Self::Range => "Range",
            Self::NearLow => "Near Low",
            Self::NewLow => "New Low",
        };
        write!(f, "{label}")
    }
}
