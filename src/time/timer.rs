use crate::context::Callback;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// An entry in the timer queue.
///
/// Represents a callback scheduled to fire at a specific deadline,
/// stored inside a binary heap ordered by deadline.
struct TimerEntry {
    /// The time at which the timer should fire.
    deadline: Instant,

    /// Callback invoked once the deadline is reached.
    callback: Callback,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    /// Two timer entries are equal if their deadlines are equal.
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Orders timer entries by deadline.
    ///
    /// Note that the comparison is **reversed** so that a
    /// `BinaryHeap<TimerEntry>` behaves as a min-heap,
    /// where the earliest deadline is popped first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    /// Partial ordering consistent with [`Ord`].
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct TimerState {
    entries: BinaryHeap<TimerEntry>,
    shutdown: bool,
}

struct TimerShared {
    state: Mutex<TimerState>,
    condvar: Condvar,
}

/// A one-shot timer service.
///
/// The `Timer` owns a dedicated thread that sleeps until the earliest
/// scheduled deadline and fires each callback exactly once, on that
/// thread. Dropping the timer stops the thread; entries still pending
/// at that point are dropped without firing.
pub struct Timer {
    shared: Arc<TimerShared>,

    /// Join handle for the timer thread.
    thread: Option<JoinHandle<()>>,
}

impl Timer {
    /// Creates a new timer service and starts its thread.
    pub fn new() -> Self {
        let shared = Arc::new(TimerShared {
            state: Mutex::new(TimerState {
                entries: BinaryHeap::new(),
                shutdown: false,
            }),
            condvar: Condvar::new(),
        });

        let worker = shared.clone();

        let thread = thread::Builder::new()
            .name("segue-timer".to_string())
            .spawn(move || run(&worker))
            .expect("failed to spawn timer thread");

        Self {
            shared,
            thread: Some(thread),
        }
    }

    /// Schedules `callback` to fire exactly once after `duration`
    /// elapses.
    ///
    /// The callback runs on the timer thread; anything heavier than
    /// completing a task should be bounced onto an executor.
    pub fn schedule_once<F>(&self, duration: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let entry = TimerEntry {
            deadline: Instant::now() + duration,
            callback: Box::new(callback),
        };

        let mut state = self.shared.state.lock().unwrap();
        state.entries.push(entry);
        drop(state);

        self.shared.condvar.notify_one();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Timer {
    /// Stops the timer thread and joins it.
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.shutdown = true;
        }

        self.shared.condvar.notify_one();

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// The timer thread loop.
///
/// Sleeps until the earliest deadline, pops every due entry, and fires
/// the callbacks with the state lock released.
fn run(shared: &TimerShared) {
    let mut state = shared.state.lock().unwrap();

    loop {
        if state.shutdown {
            break;
        }

        let now = Instant::now();

        let mut due = Vec::new();
        while let Some(entry) = state.entries.peek() {
            if entry.deadline > now {
                break;
            }
            due.push(state.entries.pop().unwrap());
        }

        if !due.is_empty() {
            drop(state);

            for entry in due {
                tracing::trace!("timer fired");
                (entry.callback)();
            }

            state = shared.state.lock().unwrap();
            continue;
        }

        state = match state.entries.peek() {
            Some(entry) => {
                let timeout = entry.deadline.saturating_duration_since(now);
                shared.condvar.wait_timeout(state, timeout).unwrap().0
            }
            None => shared.condvar.wait(state).unwrap(),
        };
    }

    tracing::debug!("timer thread exiting");
}
