//! Single-threaded deferred task queue
//!
//! Tasks are posted with a delay and run one at a time in deadline order,
//! FIFO on equal deadlines. A task "yields" by posting its own continuation.
//! Cancellation is lazy: cancelled entries stay in the heap and are skipped
//! when they surface.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::Millis;

/// Handle to a posted task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry<T> {
    deadline: Millis,
    seq: u64,
    task: T,
}

// Reversed so the max-heap pops the earliest (deadline, seq) first
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

/// Ordered queue of delayed tasks
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    live: HashSet<u64>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Post `task` to run at `now + delay`
    pub fn post(&mut self, now: Millis, delay: Millis, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            deadline: now.saturating_add(delay),
            seq,
            task,
        });
        self.live.insert(seq);
        TimerId(seq)
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id.0)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains(&id.0)
    }

    /// Deadline of the next live task
    pub fn next_deadline(&mut self) -> Option<Millis> {
        self.discard_cancelled();
        self.heap.peek().map(|e| e.deadline)
    }

    /// Pop the next task whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, TimerId, T)> {
        self.discard_cancelled();
        if self.heap.peek()?.deadline > now {
            return None;
        }
        let entry = self.heap.pop()?;
        self.live.remove(&entry.seq);
        Some((entry.deadline, TimerId(entry.seq), entry.task))
    }

    /// Number of live (uncancelled) tasks
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                break;
            }
            self.heap.pop();
        }
    }
}
