//! Cooperative tick scheduling.
//!
//! Animation ticks and pagination continuations are fire-and-forget
//! single-shot callbacks submitted to a [`Scheduler`], never blocking
//! waits. Cancellation is a token flipped on the [`TaskHandle`] and
//! checked when the callback comes due; task bodies additionally
//! re-check their own run-state, since cancellation of an already
//! pending callback is not guaranteed to be instantaneous.
//!
//! Two implementations ship with the crate:
//!
//! - [`ManualScheduler`] - deterministic, driven by explicit
//!   [`advance`] calls. Embed it in the host's tick loop, or drive it
//!   by hand in tests.
//! - [`TokioScheduler`] - maps ticks onto wall-clock delays on a tokio
//!   runtime.
//!
//! [`advance`]: ManualScheduler::advance

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;

/// A single-shot callback submitted to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

// =============================================================================
// Scheduler trait
// =============================================================================

/// Accepts delayed single-shot callbacks bound to the execution context
/// that is authoritative for surface mutation, plus async continuations
/// for the pagination fetch path.
pub trait Scheduler: Send + Sync + 'static {
    /// Run `task` after `delay_ticks` ticks. A delay of zero means "as
    /// soon as the context next runs tasks", not inline.
    fn later(&self, delay_ticks: u64, task: Task) -> TaskHandle;

    /// Drive a future to completion off the authoritative context.
    ///
    /// The future must not touch surface state directly; it re-enters
    /// the owning context through [`later`](Scheduler::later).
    fn spawn(&self, fut: BoxFuture<'static, ()>);
}

/// Cancellation handle for a scheduled task.
///
/// Cancelling flips an atomic token; a pending callback observed the
/// token when it comes due and does nothing. Dropping the handle does
/// not cancel.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel the task if it has not fired yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](TaskHandle::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Manual scheduler
// =============================================================================

struct Entry {
    due: u64,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    task: Task,
}

struct ManualState {
    now: u64,
    seq: u64,
    queue: Vec<Entry>,
}

/// Deterministic tick-driven scheduler.
///
/// Nothing runs until [`advance`](ManualScheduler::advance) is called;
/// due tasks then run in (due tick, submission order). Spawned futures
/// are driven to completion inline, which keeps async pagination fully
/// deterministic under test as long as the fetch future is ready or
/// becomes ready without external wakeups.
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualState {
                now: 0,
                seq: 0,
                queue: Vec::new(),
            }),
        }
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.state.lock().now
    }

    /// Number of tasks waiting to fire (cancelled ones included).
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Advance the clock by `ticks`, running every task as it comes due.
    ///
    /// `advance(0)` runs tasks already due at the current tick (i.e.
    /// tasks scheduled with a zero delay since the last advance). Tasks
    /// may schedule further tasks; a task scheduled with zero delay from
    /// within a running task fires in the same advance.
    pub fn advance(&self, ticks: u64) {
        self.run_due();
        for _ in 0..ticks {
            self.state.lock().now += 1;
            self.run_due();
        }
    }

    /// Run everything due at the current tick.
    fn run_due(&self) {
        loop {
            let entry = {
                let mut state = self.state.lock();
                let now = state.now;
                let next = state
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= now)
                    .min_by_key(|(_, e)| (e.due, e.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => state.queue.swap_remove(i),
                    None => return,
                }
            };
            // Run outside the lock: the task may schedule more tasks.
            if !entry.cancelled.load(Ordering::SeqCst) {
                (entry.task)();
            }
        }
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn later(&self, delay_ticks: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.lock();
        let entry = Entry {
            due: state.now + delay_ticks,
            seq: state.seq,
            cancelled: handle.cancelled.clone(),
            task,
        };
        state.seq += 1;
        state.queue.push(entry);
        handle
    }

    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        futures::executor::block_on(fut);
    }
}

// =============================================================================
// Tokio scheduler
// =============================================================================

/// Scheduler backed by a tokio runtime.
///
/// One tick maps to a fixed wall-clock duration. Tasks run on runtime
/// workers; use this where surface mutation is safe from those workers,
/// or wrap it in an adapter that hops to the host's authoritative
/// thread.
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
    tick: Duration,
}

impl TokioScheduler {
    /// Bind to the current runtime.
    ///
    /// Panics outside a tokio runtime context.
    pub fn new(tick: Duration) -> Self {
        Self::with_handle(tokio::runtime::Handle::current(), tick)
    }

    pub fn with_handle(handle: tokio::runtime::Handle, tick: Duration) -> Self {
        Self { handle, tick }
    }

    /// Wall-clock duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }
}

impl Scheduler for TokioScheduler {
    fn later(&self, delay_ticks: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let cancelled = handle.cancelled.clone();
        let delay = self
            .tick
            .saturating_mul(delay_ticks.min(u64::from(u32::MAX)) as u32);
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !cancelled.load(Ordering::SeqCst) {
                task();
            }
        });
        handle
    }

    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        self.handle.spawn(fut);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_nothing_runs_before_due() {
        let sched = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        sched.later(5, counter_task(&hits));

        sched.advance(4);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        sched.advance(1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_delay_runs_on_advance_zero() {
        let sched = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        sched.later(0, counter_task(&hits));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        sched.advance(0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let sched = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handle = sched.later(1, counter_task(&hits));
        handle.cancel();

        sched.advance(3);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_submission_order_preserved_within_tick() {
        let sched = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["a", "b", "c"] {
            let log = log.clone();
            sched.later(2, Box::new(move || log.lock().push(label)));
        }
        sched.advance(2);
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_task_can_reschedule_itself() {
        let sched = Arc::new(ManualScheduler::new());
        let hits = Arc::new(AtomicUsize::new(0));

        fn tick(sched: &Arc<ManualScheduler>, hits: &Arc<AtomicUsize>) {
            let s = sched.clone();
            let h = hits.clone();
            sched.later(
                2,
                Box::new(move || {
                    h.fetch_add(1, Ordering::SeqCst);
                    tick(&s, &h);
                }),
            );
        }

        tick(&sched, &hits);
        sched.advance(6);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_spawn_runs_future_inline() {
        let sched = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        sched.spawn(Box::pin(async move {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
