use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Coalescing scheduler for chunk recomputation, keyed by packed chunk
/// position. A key is either waiting in line, in flight, or absent; marking
/// a waiting key again is a no-op and marking an in-flight key arms exactly
/// one follow-up, however many times it happens before `finish`.
pub struct RemeshQueue {
    state: Mutex<QueueState>,
    wake: Notify,
}

#[derive(Default)]
struct QueueState {
    queued: VecDeque<u64>,
    members: HashSet<u64>,
    in_flight: HashMap<u64, bool>,
}

impl RemeshQueue {
    pub fn new() -> RemeshQueue {
        RemeshQueue {
            state: Mutex::new(QueueState::default()),
            wake: Notify::new(),
        }
    }

    /// Records that a chunk needs recomputation.
    pub fn mark_dirty(&self, key: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(follow_up) = state.in_flight.get_mut(&key) {
            *follow_up = true;
            return;
        }
        if state.members.insert(key) {
            state.queued.push_back(key);
            drop(state);
            self.wake.notify_one();
        }
    }

    /// Yields the next dirty key, waiting while the queue is idle. The key
    /// stays in flight, absorbing further marks, until `finish` is called
    /// for it.
    pub async fn next_key(&self) -> u64 {
        loop {
            {
                let mut state = self.state.lock().unwrap();
                if let Some(key) = state.queued.pop_front() {
                    state.members.remove(&key);
                    state.in_flight.insert(key, false);
                    let more = !state.queued.is_empty();
                    drop(state);
                    if more {
                        // pass the wakeup along for other waiting workers
                        self.wake.notify_one();
                    }
                    return key;
                }
            }
            self.wake.notified().await;
        }
    }

    /// Ends a flight. When marks arrived during the flight the key is
    /// re-queued exactly once and this returns true.
    pub fn finish(&self, key: u64) -> bool {
        let mut state = self.state.lock().unwrap();
        let follow_up = state.in_flight.remove(&key).unwrap_or(false);
        if follow_up {
            state.members.insert(key);
            state.queued.push_back(key);
            drop(state);
            self.wake.notify_one();
        }
        follow_up
    }

    pub fn waiting(&self) -> usize {
        self.state.lock().unwrap().queued.len()
    }

    pub fn is_idle(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.queued.is_empty() && state.in_flight.is_empty()
    }
}

impl Default for RemeshQueue {
    fn default() -> RemeshQueue {
        RemeshQueue::new()
    }
}
