//! Bounded FIFO of pending records.
//!
//! Producers push under a single mutex and signal one waiting consumer.
//! When the queue is full the incoming record is discarded (tail drop) and
//! the drop counter advances. Sequence stamping and acceptance counting
//! happen under the queue lock and only after the capacity check passes, so
//! accepted sequence numbers are gap-free and queue order equals sequence
//! order across producer threads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::metrics::Metrics;
use crate::record::Record;

pub(crate) struct RecordQueue {
    inner: Mutex<VecDeque<Record>>,
    available: Condvar,
    sequence: AtomicU64,
    metrics: Metrics,
}

impl RecordQueue {
    pub fn new() -> Self {
        RecordQueue {
            inner: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            sequence: AtomicU64::new(0),
            metrics: Metrics::default(),
        }
    }

    /// Append one record, stamping its sequence. The capacity bound is
    /// re-read on every push; shrinking it below the current length does
    /// not trim, the excess drains naturally. Returns false on tail drop.
    pub fn push(&self, mut record: Record, capacity: usize) -> bool {
        {
            let mut queue = self.inner.lock();
            if queue.len() >= capacity {
                drop(queue);
                self.metrics.record_dropped(1);
                return false;
            }
            record.sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            self.metrics.record_accepted(record.level);
            queue.push_back(record);
        }
        self.available.notify_one();
        true
    }

    /// Block until a record is available or `stop` is raised, then move at
    /// most `max` records out. The returned batch is dispatched with the
    /// queue lock released.
    pub fn pop_batch(&self, max: usize, stop: &AtomicBool) -> Vec<Record> {
        let mut queue = self.inner.lock();
        self.available
            .wait_while(&mut queue, |q| q.is_empty() && !stop.load(Ordering::Acquire));
        let take = queue.len().min(max);
        queue.drain(..take).collect()
    }

    /// Move every remaining record out. Used for the worker's final pass.
    pub fn drain_all(&self) -> Vec<Record> {
        self.inner.lock().drain(..).collect()
    }

    /// Discard everything still queued, counting the residue as dropped.
    /// Returns how many records were discarded.
    pub fn clear_dropping(&self) -> usize {
        let mut queue = self.inner.lock();
        let remaining = queue.len();
        if remaining > 0 {
            self.metrics.record_dropped(remaining as u64);
            queue.clear();
        }
        remaining
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Nudge the consumer, used by flush and shutdown drains.
    pub fn notify_one(&self) {
        self.available.notify_one();
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
