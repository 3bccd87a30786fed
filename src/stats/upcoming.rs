use super::QUEUE_CAPACITY;
use tracing::debug;

/// FIFO ring buffer of titles waiting to be played.
///
/// When full, the buffer doubles and re-lays its items from slot 0.
pub struct UpcomingSongs {
    slots: Vec<Option<String>>,
    front: usize,
    size: usize,
}

impl Default for UpcomingSongs {
    fn default() -> Self {
        UpcomingSongs::with_capacity(QUEUE_CAPACITY)
    }
}

impl UpcomingSongs {
    pub fn with_capacity(capacity: usize) -> Self {
        UpcomingSongs {
            slots: vec![None; capacity.max(1)],
            front: 0,
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    pub fn enqueue(&mut self, title: &str) {
        if self.is_full() {
            self.resize();
        }
        let rear = (self.front + self.size) % self.capacity();
        self.slots[rear] = Some(title.to_string());
        self.size += 1;
    }

    pub fn dequeue(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let title = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.size -= 1;
        title
    }

    pub fn peek(&self) -> Option<&str> {
        match self.is_empty() {
            true => None,
            false => self.slots[self.front].as_deref(),
        }
    }

    /// Titles in the order they will be played.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let cap = self.capacity();
        (0..self.size).filter_map(move |i| self.slots[(self.front + i) % cap].as_deref())
    }

    /// Drop the entry at `index` (0 = next up).
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.size {
            return None;
        }

        let mut items = self.drain_in_order();
        let removed = items.remove(index);
        for (slot, item) in self.slots.iter_mut().zip(items) {
            *slot = Some(item);
        }
        self.size -= 1;
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.front = 0;
        self.size = 0;
    }

    fn resize(&mut self) {
        let new_cap = self.capacity() * 2;
        let items = self.drain_in_order();

        self.slots = items.into_iter().map(Some).collect();
        self.slots.resize(new_cap, None);
        debug!(capacity = new_cap, "Upcoming queue resized");
    }

    /// Take every item out in FIFO order, leaving `front` at 0.
    /// `size` is left for the caller to fix up.
    fn drain_in_order(&mut self) -> Vec<String> {
        let cap = self.capacity();
        let items = (0..self.size)
            .filter_map(|i| self.slots[(self.front + i) % cap].take())
            .collect();
        self.front = 0;
        items
    }
}
