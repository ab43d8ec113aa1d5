//! Blocking FIFO job queue shared between submitting threads and workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Unbounded multi-producer/multi-consumer FIFO. `submit` never blocks on
/// capacity; callers that need backpressure throttle on `pending_count`.
/// Exactly one `take` caller receives each submitted item, in submission
/// order.
pub(crate) struct JobQueue<T> {
    items: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    /// Enqueues `item` and returns the queue length after the push.
    pub fn submit(&self, item: T) -> usize {
        let mut items = self.items.lock().unwrap();
        items.push_back(item);
        let len = items.len();
        drop(items);
        self.ready.notify_one();
        len
    }

    /// Blocks until an item is available and removes it.
    pub fn take(&self) -> T {
        let mut items = self.items.lock().unwrap();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self.ready.wait(items).unwrap();
        }
    }

    /// Items queued but not yet taken.
    pub fn pending_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}
