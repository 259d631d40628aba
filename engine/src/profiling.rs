use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PassTimings {
    pub resolve: Duration,
    pub detect: Duration,
    pub total: Duration,
}

/// Optional hook interface for capturing per-frame pass timings.
///
/// Kept free of input/action types so hosts can share one profiler across ports and
/// across headless and in-game integrations.
pub trait Profiler {
    fn on_pass(&mut self, _port: u8, _polls: usize, _timings: PassTimings) {}
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PassSummary {
    pub passes: usize,
    pub polls: usize,
    pub max_total: Duration,
    pub sum_total: Duration,
}

impl PassSummary {
    pub fn avg_total(&self) -> Duration {
        if self.passes == 0 {
            Duration::ZERO
        } else {
            self.sum_total / self.passes as u32
        }
    }
}

impl Profiler for PassSummary {
    fn on_pass(&mut self, _port: u8, polls: usize, timings: PassTimings) {
        self.passes = self.passes.saturating_add(1);
        self.polls = self.polls.saturating_add(polls);
        self.max_total = self.max_total.max(timings.total);
        self.sum_total = self.sum_total.saturating_add(timings.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accumulates_passes() {
        let mut summary = PassSummary::default();
        assert_eq!(summary.avg_total(), Duration::ZERO);

        summary.on_pass(
            0,
            4,
            PassTimings {
                total: Duration::from_micros(10),
                ..PassTimings::default()
            },
        );
        summary.on_pass(
            1,
            2,
            PassTimings {
                total: Duration::from_micros(30),
                ..PassTimings::default()
            },
        );

        assert_eq!(summary.passes, 2);
        assert_eq!(summary.polls, 6);
        assert_eq!(summary.max_total, Duration::from_micros(30));
        assert_eq!(summary.avg_total(), Duration::from_micros(20));
    }
}
