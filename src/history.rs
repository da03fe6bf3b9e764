use std::collections::VecDeque;

pub const UNDO_CAPACITY: usize = 10;

/// Fixed-capacity undo stack. Pushing onto a full history evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_most_recent_first() {
        let mut history = History::default();
        history.push("a");
        history.push("b");
        assert_eq!(history.peek(), Some(&"b"));
        assert_eq!(history.pop(), Some("b"));
        assert_eq!(history.pop(), Some("a"));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut history = History::default();
        for i in 0..13 {
            history.push(i);
        }
        assert_eq!(history.len(), UNDO_CAPACITY);
        let drained: Vec<_> = std::iter::from_fn(|| history.pop()).collect();
        assert_eq!(drained, (3..13).rev().collect::<Vec<_>>());
    }
}
