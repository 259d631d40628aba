pub mod profiling;

use serde::{Deserialize, Serialize};

/// Fixed-capacity circular store addressed by monotonically increasing logical index.
///
/// Every `add` is assigned the next logical index. Once the buffer is full the oldest
/// element is overwritten, and lookups of its index report `None` from then on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    next_index: usize,
    first_index: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            next_index: 0,
            first_index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total number of values ever added, i.e. the logical index the next value gets.
    pub fn count(&self) -> usize {
        self.next_index
    }

    pub fn stored(&self) -> usize {
        self.next_index
            .saturating_sub(self.first_index)
            .min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.stored() == 0
    }

    pub fn head_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.next_index - 1)
        }
    }

    pub fn tail_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.next_index - self.stored())
        }
    }

    pub fn is_resident(&self, index: usize) -> bool {
        index < self.next_index && index >= self.next_index - self.stored()
    }

    pub fn add(&mut self, value: T) -> usize {
        let index = self.next_index;
        let capacity = self.capacity();
        if capacity == 0 {
            return index;
        }
        self.slots[index % capacity] = Some(value);
        self.next_index += 1;
        index
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if !self.is_resident(index) {
            return None;
        }
        self.slots[index % self.capacity()].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.is_resident(index) {
            return None;
        }
        let capacity = self.capacity();
        self.slots[index % capacity].as_mut()
    }

    /// `head(0)` is the newest resident value.
    pub fn head(&self, offset: usize) -> Option<&T> {
        self.head_offset_index(offset).and_then(|index| self.get(index))
    }

    pub fn head_mut(&mut self, offset: usize) -> Option<&mut T> {
        let index = self.head_offset_index(offset)?;
        self.get_mut(index)
    }

    /// `tail(0)` is the oldest resident value.
    pub fn tail(&self, offset: usize) -> Option<&T> {
        self.tail_offset_index(offset).and_then(|index| self.get(index))
    }

    pub fn tail_mut(&mut self, offset: usize) -> Option<&mut T> {
        let index = self.tail_offset_index(offset)?;
        self.get_mut(index)
    }

    /// Resident values from newest to oldest, paired with their logical index.
    pub fn iter_newest(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (0..self.stored()).filter_map(move |offset| {
            let index = self.head_offset_index(offset)?;
            self.get(index).map(|value| (index, value))
        })
    }

    /// Resident values from oldest to newest, paired with their logical index.
    pub fn iter_oldest(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (0..self.stored()).filter_map(move |offset| {
            let index = self.tail_offset_index(offset)?;
            self.get(index).map(|value| (index, value))
        })
    }

    /// Drops every resident value. Logical indices keep counting from where they were.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.first_index = self.next_index;
    }

    fn head_offset_index(&self, offset: usize) -> Option<usize> {
        if offset >= self.stored() {
            return None;
        }
        self.head_index().map(|head| head - offset)
    }

    fn tail_offset_index(&self, offset: usize) -> Option<usize> {
        if offset >= self.stored() {
            return None;
        }
        self.tail_index().map(|tail| tail + offset)
    }
}
