use crate::error::StrategyError;
use std::collections::VecDeque;
use ta::{Next, Period, Reset};

/// A trailing arithmetic mean over at most `window` observations.
///
/// Until `window` values have been seen, the mean is taken over however many
/// are available (minimum periods = 1), so the first output equals the first
/// input.
///
/// The mean is recomputed from the buffer on every step with compensated
/// summation, so rounding error never accumulates across the series. A window
/// holding identical values returns that value exactly.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    buffer: VecDeque<f64>,
}

impl RollingMean {
    pub fn new(window: usize) -> Result<Self, StrategyError> {
        if window == 0 {
            return Err(StrategyError::InvalidParameters(
                "Rolling window must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window,
            buffer: VecDeque::with_capacity(window),
        })
    }

    /// Number of observations currently inside the window.
    pub fn filled(&self) -> usize {
        self.buffer.len()
    }

    fn mean(&self) -> f64 {
        let Some(&first) = self.buffer.front() else {
            return f64::NAN;
        };
        if self.buffer.iter().all(|&v| v == first) {
            return first;
        }

        // Kahan summation.
        let mut sum = 0.0;
        let mut compensation = 0.0;
        for &value in &self.buffer {
            let y = value - compensation;
            let t = sum + y;
            compensation = (t - sum) - y;
            sum = t;
        }
        sum / self.buffer.len() as f64
    }
}

impl Next<f64> for RollingMean {
    type Output = f64;

    fn next(&mut self, input: f64) -> Self::Output {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(input);
        self.mean()
    }
}

impl Period for RollingMean {
    fn period(&self) -> usize {
        self.window
    }
}

impl Reset for RollingMean {
    fn reset(&mut self) {
        self.buffer.clear();
    }
}
