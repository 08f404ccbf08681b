//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted so the store can evict the
//! oldest insertion when it reaches capacity. Reads never reorder keys: this
//! is FIFO-by-insertion, not least-recently-used.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys ordered by insertion time.
///
/// - Front = oldest insertion
/// - Back = newest insertion
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a fresh insertion of `key`.
    ///
    /// A key that is already tracked moves to the back, since an overwrite
    /// replaces the entry and its insertion time.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the earliest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
