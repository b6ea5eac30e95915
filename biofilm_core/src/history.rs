//! Bounded FIFO of the most recent normalized readings.
//!
//! Insertion order is poll order and is never rearranged; trend analysis and
//! chart/export consumers rely on it.

use crate::reading::SensorReading;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryWindow {
    buf: VecDeque<SensorReading>,
    capacity: usize,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryWindow {
    /// Capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, reading: SensorReading) {
        while self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(reading);
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.buf.back()
    }

    /// Entry appended just before `latest()`.
    pub fn previous(&self) -> Option<&SensorReading> {
        self.buf.len().checked_sub(2).and_then(|i| self.buf.get(i))
    }

    /// Chronological iterator, oldest first.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &SensorReading> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
