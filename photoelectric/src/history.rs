//! Rolling sample buffer for the kinetic-energy tracker
//!
//! Arrivals are stamped at the right edge of the display window and every
//! tick shifts all markers left, so the plot scrolls like a chart recorder.

use std::collections::VecDeque;

/// Buffer grows past this on demand
const PREALLOCATE_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Points kept before a trim
    pub max_retained: usize,
    /// Oldest points dropped per trim
    pub trim_batch: usize,
    /// Time-marker decrement per advance
    pub scroll_step: f64,
    /// Time marker new samples are recorded at
    pub arrival_marker: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_retained: 1500,
            trim_batch: 500,
            scroll_step: 0.01,
            arrival_marker: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RollingHistory {
    config: HistoryConfig,
    points: VecDeque<HistoryPoint>,
}

impl RollingHistory {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            points: VecDeque::with_capacity(config.max_retained.saturating_add(1).min(PREALLOCATE_LIMIT)),
            config,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn record(&mut self, time: f64, value: f64) {
        self.points.push_back(HistoryPoint { time, value });
    }

    /// Record a sample at the configured arrival marker
    pub fn record_arrival(&mut self, value: f64) {
        self.record(self.config.arrival_marker, value);
    }

    /// Trim if over capacity, then scroll every marker by one step
    pub fn advance(&mut self) {
        if self.points.len() > self.config.max_retained {
            let n = self.config.trim_batch.min(self.points.len());
            self.points.drain(..n);
        }
        let step = self.config.scroll_step;
        for point in &mut self.points {
            point.time -= step;
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &HistoryPoint> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scrolls_markers() {
        let mut history = RollingHistory::default();
        history.record_arrival(2.5);
        history.advance();
        history.advance();

        let point = history.points().next().unwrap();
        assert!((point.time - 9.98).abs() < 1e-9);
        assert_eq!(point.value, 2.5);
    }

    #[test]
    fn test_huge_capacity_is_not_preallocated() {
        let mut history = RollingHistory::new(HistoryConfig {
            max_retained: usize::MAX,
            ..HistoryConfig::default()
        });
        history.record_arrival(1.0);
        history.advance();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_trim_drops_oldest_batch() {
        let mut history = RollingHistory::default();
        for i in 0..1501 {
            history.record(i as f64, i as f64);
        }
        history.advance();

        assert_eq!(history.len(), 1001);
        let first = history.points().next().unwrap();
        assert_eq!(first.value, 500.0, "oldest 500 removed");
    }

    #[test]
    fn test_at_capacity_is_not_trimmed() {
        let mut history = RollingHistory::default();
        for i in 0..1500 {
            history.record(0.0, i as f64);
        }
        history.advance();
        assert_eq!(history.len(), 1500);
    }

    #[test]
    fn test_small_capacity_trim_is_bounded() {
        let mut history = RollingHistory::new(HistoryConfig {
            max_retained: 2,
            trim_batch: 10,
            ..HistoryConfig::default()
        });
        for _ in 0..3 {
            history.record_arrival(1.0);
        }
        history.advance();
        assert!(history.is_empty());
    }
}
