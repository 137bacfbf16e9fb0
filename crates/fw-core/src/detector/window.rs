//! Fixed-capacity sliding window over the reading stream.

use std::collections::VecDeque;

/// The last N temperatures and their matching timestamps, FIFO eviction.
///
/// Owned exclusively by the detector; both queues always hold the same
/// number of entries and never exceed capacity.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    temperatures: VecDeque<f64>,
    timestamps: VecDeque<f64>,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SlidingWindow {
            capacity,
            temperatures: VecDeque::with_capacity(capacity),
            timestamps: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a reading, evicting the oldest entry at capacity.
    pub fn push(&mut self, temperature: f64, timestamp: f64) {
        if self.temperatures.len() == self.capacity {
            self.temperatures.pop_front();
            self.timestamps.pop_front();
        }
        self.temperatures.push_back(temperature);
        self.timestamps.push_back(timestamp);
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.temperatures.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Temperatures in arrival order, oldest first.
    pub fn temperatures(&self) -> Vec<f64> {
        self.temperatures.iter().copied().collect()
    }

    /// Timestamp of the oldest retained reading.
    pub fn oldest_timestamp(&self) -> Option<f64> {
        self.timestamps.front().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_to_capacity() {
        let mut w = SlidingWindow::new(3);
        assert!(w.is_empty());
        w.push(1.0, 10.0);
        w.push(2.0, 11.0);
        assert!(!w.is_full());
        w.push(3.0, 12.0);
        assert!(w.is_full());
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_evicts_oldest_in_lockstep() {
        let mut w = SlidingWindow::new(3);
        for (i, t) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            w.push(*t, 10.0 + i as f64);
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.temperatures(), vec![2.0, 3.0, 4.0]);
        assert_eq!(w.oldest_timestamp(), Some(11.0));
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let mut w = SlidingWindow::new(0);
        w.push(1.0, 0.0);
        w.push(2.0, 1.0);
        assert_eq!(w.len(), 1);
        assert_eq!(w.temperatures(), vec![2.0]);
    }
}
