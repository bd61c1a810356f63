use serde::Deserialize;

/// Below this magnitude an outstanding amount counts as settled.
pub const EPSILON: f64 = 1e-9;

/// Slack allowed when checking that a set of balances sums to zero.
pub const BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub epsilon: f64,
    pub balance: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            epsilon: EPSILON,
            balance: BALANCE_TOLERANCE,
        }
    }
}

impl Tolerance {
    /// `epsilon` clamped to a non-negative number; NaN counts as zero.
    pub fn epsilon(&self) -> f64 {
        self.epsilon.max(0.0)
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.epsilon()
    }
}
