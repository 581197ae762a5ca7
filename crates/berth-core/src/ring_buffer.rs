//! Fixed-capacity circular buffer backing every retained history.
//!
//! Pushing past capacity silently overwrites the oldest element. Reads always
//! produce oldest-first views; [`RingBuffer::data`] hands out a fresh `Vec` so
//! callers never observe the backing storage being rewritten underneath them.

/// Fixed-capacity ring buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBuffer<T> {
    /// Backing storage, grows up to `capacity` and is then overwritten in place.
    slots: Vec<T>,
    /// Index of the slot the next push writes to once the buffer is full.
    cursor: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` elements.
    ///
    /// A zero capacity buffer accepts pushes but retains nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Append a value, evicting the oldest one when full.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[self.cursor] = value;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Newest element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        if self.slots.is_empty() {
            return None;
        }
        let newest = (self.cursor + self.capacity - 1) % self.capacity;
        self.slots.get(newest)
    }

    /// Number of retained elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of retained elements.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first borrowing iterator.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        // Until the first wrap the cursor equals len, so the split is a no-op.
        let split = if self.slots.len() < self.capacity {
            0
        } else {
            self.cursor
        };
        let (newer, older) = self.slots.split_at(split);
        older.iter().chain(newer.iter())
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Oldest-first snapshot of the retained elements.
    #[must_use]
    pub fn data(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ring_buffer_new_is_empty() {
        let buf: RingBuffer<f64> = RingBuffer::new(4);
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 4);
        assert!(buf.data().is_empty());
        assert!(buf.last().is_none());
    }

    #[test]
    fn test_ring_buffer_partial_fill() {
        let mut buf = RingBuffer::new(5);
        buf.extend([1, 2, 3]);
        assert_eq!(buf.data(), vec![1, 2, 3]);
        assert_eq!(buf.last(), Some(&3));
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut buf = RingBuffer::new(3);
        buf.extend([1, 2, 3, 4, 5]);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.data(), vec![3, 4, 5]);
        assert_eq!(buf.last(), Some(&5));
    }

    #[test]
    fn test_ring_buffer_exact_capacity() {
        let mut buf = RingBuffer::new(3);
        buf.extend([7, 8, 9]);
        assert_eq!(buf.data(), vec![7, 8, 9]);
        assert_eq!(buf.last(), Some(&9));
    }

    #[test]
    fn test_ring_buffer_data_is_idempotent() {
        let mut buf = RingBuffer::new(2);
        buf.extend([1, 2, 3]);
        let first = buf.data();
        let second = buf.data();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ring_buffer_data_does_not_alias() {
        let mut buf = RingBuffer::new(2);
        buf.extend([1, 2]);
        let mut snapshot = buf.data();
        snapshot[0] = 99;
        buf.push(3);
        assert_eq!(snapshot, vec![99, 2]);
        assert_eq!(buf.data(), vec![2, 3]);
    }

    #[test]
    fn test_ring_buffer_zero_capacity_discards() {
        let mut buf = RingBuffer::new(0);
        buf.push(1);
        buf.push(2);
        assert!(buf.is_empty());
        assert!(buf.last().is_none());
    }

    #[test]
    fn test_ring_buffer_iter_reverse() {
        let mut buf = RingBuffer::new(3);
        buf.extend([1, 2, 3, 4]);
        let newest_first: Vec<_> = buf.iter().rev().copied().collect();
        assert_eq!(newest_first, vec![4, 3, 2]);
    }

    #[test]
    fn test_ring_buffer_clear() {
        let mut buf = RingBuffer::new(2);
        buf.extend([1, 2, 3]);
        buf.clear();
        assert!(buf.is_empty());
        buf.push(4);
        assert_eq!(buf.data(), vec![4]);
    }

    proptest! {
        #[test]
        fn prop_data_is_last_capacity_pushes(
            capacity in 1usize..64,
            values in proptest::collection::vec(any::<i32>(), 0..200),
        ) {
            let mut buf = RingBuffer::new(capacity);
            buf.extend(values.iter().copied());

            let keep = values.len().min(capacity);
            let expected = values[values.len() - keep..].to_vec();
            prop_assert_eq!(buf.data(), expected);
            prop_assert_eq!(buf.last().copied(), values.last().copied());
        }
    }
}
