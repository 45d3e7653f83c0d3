// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-capacity circular buffer.

use crate::error::TelemetryError;

/// Circular buffer that overwrites its oldest entry once full
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    cursor: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self, TelemetryError> {
        if capacity == 0 {
            return Err(TelemetryError::ZeroCapacity);
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    /// Write at the cursor and advance it
    pub fn push(&mut self, value: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[self.cursor] = value;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Number of populated slots, never more than the capacity
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the next push overwrites an entry
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Most recently written entry
    pub fn latest(&self) -> Option<&T> {
        let index = (self.cursor + self.capacity - 1) % self.capacity;
        self.slots.get(index)
    }

    /// Populated entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = if self.is_full() {
            self.slots.split_at(self.cursor)
        } else {
            (&self.slots[..], &self.slots[..0])
        };
        older.iter().chain(newer.iter())
    }

    /// Drop every entry, keeping the capacity
    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_capacity() {
        assert_eq!(RingBuffer::<u32>::new(0).err(), Some(TelemetryError::ZeroCapacity));
    }

    #[test]
    fn test_fills_then_overwrites_oldest() {
        let mut ring = RingBuffer::new(3).unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.latest(), None);

        ring.push(1);
        ring.push(2);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ring.latest(), Some(&2));

        ring.push(3);
        ring.push(4);
        ring.push(5);
        assert_eq!(ring.len(), 3);
        assert!(ring.is_full());
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(ring.latest(), Some(&5));
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut ring = RingBuffer::new(2).unwrap();
        ring.push('a');
        ring.push('b');
        ring.push('c');
        ring.clear();
        assert!(ring.is_empty());
        ring.push('d');
        assert_eq!(ring.latest(), Some(&'d'));
        assert_eq!(ring.capacity(), 2);
    }
}
