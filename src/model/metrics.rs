use std::collections::VecDeque;

use serde::Serialize;

pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Totals across every running container.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub cpu_percent: f64,
    pub cpu_available: f64,
    pub memory_percent: f64,
    pub memory_available: f64,
    pub net_rx: u64,
    pub net_tx: u64,
    pub block_read: u64,
    pub block_write: u64,
    pub container_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsSample {
    pub time: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Bounded history of aggregate samples for the line charts.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsHistory {
    pub capacity: usize,
    pub samples: VecDeque<MetricsSample>,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl MetricsHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: MetricsSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn cpu_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.cpu_percent).collect()
    }

    pub fn memory_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.memory_percent).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> MetricsSample {
        MetricsSample {
            time: format!("12:00:{:02}", i),
            cpu_percent: i as f64,
            memory_percent: (i * 2) as f64,
        }
    }

    #[test]
    fn history_push_caps_at_capacity() {
        let mut history = MetricsHistory::new(5);
        for i in 0..8 {
            history.push(sample(i));
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.cpu_series(), vec![3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(history.memory_series().last(), Some(&14.0));
    }

    #[test]
    fn history_zero_capacity_keeps_one_sample() {
        let mut history = MetricsHistory::new(0);
        history.push(sample(1));
        history.push(sample(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.samples.front().map(|s| s.time.as_str()), Some("12:00:02"));
    }

    #[test]
    fn history_default_capacity() {
        let history = MetricsHistory::default();
        assert_eq!(history.capacity, DEFAULT_HISTORY_CAPACITY);
        assert!(history.is_empty());
    }
}
