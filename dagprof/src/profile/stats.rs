use serde::{Deserialize, Serialize};

/// Online accumulator for a timing series: running sum, sum of squares and
/// an invocation counter — enough to derive mean and stddev without
/// retaining raw samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingStat {
    pub sum: f64,
    pub sqrsum: f64,
    /// Per-type tables use this as the invocation counter; per-node slots
    /// leave it at zero.
    pub cnt: u64,
}

impl TimingStat {
    /// Fold one sample (milliseconds) into the running sums.
    pub fn accumulate(&mut self, ms: f64) {
        self.sum += ms;
        self.sqrsum += ms * ms;
    }

    /// Mean over `samples` measured runs; `None` when nothing was measured.
    pub fn mean(&self, samples: u64) -> Option<f64> {
        if samples == 0 {
            return None;
        }
        Some(self.sum / samples as f64)
    }

    /// Standard deviation over `samples` measured runs. Rounding can push
    /// the variance marginally negative, so it is clamped at zero.
    pub fn stddev(&self, samples: u64) -> Option<f64> {
        let mean = self.mean(samples)?;
        let variance = self.sqrsum / samples as f64 - mean * mean;
        Some(variance.max(0.0).sqrt())
    }
}
