use super::HISTORY_CAPACITY;
use std::collections::VecDeque;

/// Bounded stack of recently played titles. Once full, the
/// oldest entry is dropped on every push.
pub struct RecentlyPlayed {
    stack: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        RecentlyPlayed::with_capacity(HISTORY_CAPACITY)
    }
}

impl RecentlyPlayed {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RecentlyPlayed {
            stack: VecDeque::with_capacity(capacity.min(HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, title: &str) {
        self.stack.push_back(title.to_string());
        while self.stack.len() > self.capacity {
            self.stack.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop_back()
    }

    pub fn peek(&self) -> Option<&str> {
        self.stack.back().map(String::as_str)
    }

    /// Most recent first.
    pub fn get_all(&self) -> Vec<&str> {
        self.stack.iter().rev().map(String::as_str).collect()
    }

    pub fn clear(&mut self) {
        self.stack.clear()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_stack() {
        let mut history = RecentlyPlayed::default();
        history.push("first");
        history.push("second");

        assert_eq!(history.peek(), Some("second"));
        assert_eq!(history.get_all(), vec!["second", "first"]);
        assert_eq!(history.pop().as_deref(), Some("second"));
        assert_eq!(history.pop().as_deref(), Some("first"));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut history = RecentlyPlayed::with_capacity(3);
        for title in ["a", "b", "c", "d", "e"] {
            history.push(title);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.get_all(), vec!["e", "d", "c"]);
    }

    #[test]
    fn repeated_plays_are_all_recorded() {
        let mut history = RecentlyPlayed::default();
        history.push("loop");
        history.push("loop");
        assert_eq!(history.len(), 2);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn zero_capacity_still_keeps_one() {
        let mut history = RecentlyPlayed::with_capacity(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.get_all(), vec!["b"]);
    }
}
