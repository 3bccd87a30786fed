use crate::normalize_title;
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

struct Entry {
    title: String,
    count: u32,
}

/// Per-title play counter with a top-N ranking.
#[derive(Default)]
pub struct PlayCounts {
    counts: HashMap<String, Entry>,
}

impl PlayCounts {
    pub fn new() -> Self {
        PlayCounts::default()
    }

    /// Record one play and return the new count.
    pub fn add_play(&mut self, title: &str) -> u32 {
        let entry = self
            .counts
            .entry(normalize_title(title))
            .or_insert_with(|| Entry {
                title: title.to_string(),
                count: 0,
            });

        // Keep the latest spelling for display
        if entry.title != title {
            entry.title = title.to_string();
        }
        entry.count = entry.count.saturating_add(1);
        entry.count
    }

    pub fn set(&mut self, title: &str, count: u32) {
        self.counts.insert(
            normalize_title(title),
            Entry {
                title: title.to_string(),
                count,
            },
        );
    }

    pub fn count(&self, title: &str) -> u32 {
        self.counts
            .get(&normalize_title(title))
            .map_or(0, |entry| entry.count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts
            .values()
            .map(|entry| (entry.title.as_str(), entry.count))
    }

    /// The `n` most played titles, highest first. Equal counts are
    /// ordered alphabetically. Counters are left untouched.
    pub fn top_n(&self, n: usize) -> Vec<(String, u32)> {
        let mut heap: BinaryHeap<(u32, Reverse<&str>, &str)> = self
            .counts
            .iter()
            .map(|(key, entry)| (entry.count, Reverse(key.as_str()), entry.title.as_str()))
            .collect();

        let mut top = Vec::with_capacity(n.min(heap.len()));
        while top.len() < n {
            match heap.pop() {
                Some((count, _, title)) => top.push((title.to_string(), count)),
                None => break,
            }
        }
        top
    }
}
