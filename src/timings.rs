use std::fmt;

/// Collects render durations and summarizes them once the window is full.
pub struct RenderTimings {
    samples: Vec<u128>,
    window: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSummary {
    pub min: u128,
    pub max: u128,
    pub avg: u128,
    pub p50: u128,
    pub p90: u128,
    pub p99: u128,
}

impl RenderTimings {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: Vec::with_capacity(window),
            window,
        }
    }

    /// Records one frame. Returns a summary and starts over every `window`
    /// frames.
    pub fn record(&mut self, elapsed_ms: u128) -> Option<TimingSummary> {
        self.samples.push(elapsed_ms);
        if self.samples.len() < self.window {
            return None;
        }
        self.samples.sort_unstable();
        let len = self.samples.len();
        let at = |fraction: f32| self.samples[((len as f32 * fraction) as usize).min(len - 1)];
        let summary = TimingSummary {
            min: self.samples[0],
            max: self.samples[len - 1],
            avg: self.samples.iter().sum::<u128>() / len as u128,
            p50: self.samples[len / 2],
            p90: at(0.9),
            p99: at(0.99),
        };
        self.samples.clear();
        Some(summary)
    }
}

impl fmt::Display for TimingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Average render timings:\n * min: {}ms\n * max: {}ms\n * avg: {}ms\n * p50: {}ms\n * p90: {}ms\n * p99: {}ms",
            self.min, self.max, self.avg, self.p50, self.p90, self.p99
        )
    }
}
