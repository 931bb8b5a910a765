//! Cooperative scheduler for per-session recurring work.
//!
//! Sessions that need a heartbeat (the countdown timer, the stats
//! monitor) register a [`PeriodicTask`] here. The event loop calls
//! [`Scheduler::tick`] once per iteration; every task whose deadline
//! has elapsed fires at most once per call, in registration order.
//! Cancellation is synchronous: once [`Scheduler::cancel`] returns the
//! task cannot fire again.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::Result;

/// Identifies one registered task. Minted from the owning session's id,
/// since a session owns at most one task at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub(crate) u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Errors surfaced by the scheduler itself. Callback failures are not
/// errors of the scheduler; they are reported as [`TaskEvent::Faulted`].
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("{0} is already registered")]
    DuplicateTask(TaskHandle),
}

/// What a task callback tells the scheduler after a fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep firing on the task's interval.
    Continue,
    /// The task's work is done; cancel it on this tick.
    Finished,
}

/// Lifecycle notifications produced by [`Scheduler::tick`]. The owner
/// uses these to drop its handle and to surface failures.
pub enum TaskEvent {
    /// The task finished naturally (budget exhausted or callback
    /// signalled [`TickOutcome::Finished`]) and was removed.
    Completed(TaskHandle),
    /// The callback returned an error; the task was cancelled and all
    /// other tasks were left untouched.
    Faulted(TaskHandle, anyhow::Error),
}

type Callback = Box<dyn FnMut(Instant) -> Result<TickOutcome>>;

/// A cancellable unit of recurring work with its own interval.
pub struct PeriodicTask {
    handle: TaskHandle,
    interval: Duration,
    /// Remaining fires for finite tasks; `None` repeats until cancelled.
    budget: Option<u32>,
    next_due: Instant,
    callback: Callback,
}

impl PeriodicTask {
    /// An unbounded task; repeats until cancelled.
    pub fn new(
        handle: TaskHandle,
        interval: Duration,
        callback: impl FnMut(Instant) -> Result<TickOutcome> + 'static,
    ) -> Self {
        Self {
            handle,
            interval,
            budget: None,
            // Placeholder; register() rebases this on its own clock.
            next_due: Instant::now(),
            callback: Box::new(callback),
        }
    }

    /// Limit the task to exactly `ticks` fires, after which it
    /// auto-cancels.
    pub fn with_budget(mut self, ticks: u32) -> Self {
        self.budget = Some(ticks);
        self
    }

    pub fn handle(&self) -> TaskHandle {
        self.handle
    }
}

/// Advances all live tasks on one logical clock. Single-threaded by
/// construction: `tick` is the only entry point that runs callbacks,
/// and registration/cancellation are plain synchronous calls between
/// ticks.
pub struct Scheduler {
    /// Registration order, which is also firing order within a tick.
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task to the active set. The first fire happens one
    /// interval after `now`.
    pub fn register(&mut self, mut task: PeriodicTask, now: Instant) -> Result<(), SchedulerError> {
        if self.contains(task.handle) {
            return Err(SchedulerError::DuplicateTask(task.handle));
        }
        task.next_due = now + task.interval;
        self.tasks.push(task);
        Ok(())
    }

    /// Remove a task from the active set. Idempotent; unknown handles
    /// are a no-op.
    pub fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|t| t.handle != handle);
    }

    /// Whether a task with this handle is currently registered.
    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Fire every task whose deadline has elapsed, at most once each,
    /// in registration order. Finite budgets are decremented after the
    /// fire; a task whose budget reaches zero, whose callback returns
    /// [`TickOutcome::Finished`], or whose callback errors is removed
    /// before `tick` returns.
    pub fn tick(&mut self, now: Instant) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        let mut done: Vec<TaskHandle> = Vec::new();

        for task in &mut self.tasks {
            if now < task.next_due {
                continue;
            }
            // Rebase from `now` rather than the missed deadline so a
            // stalled driver never produces a burst of catch-up fires.
            task.next_due = now + task.interval;

            match (task.callback)(now) {
                Ok(TickOutcome::Continue) => {
                    if let Some(budget) = task.budget.as_mut() {
                        *budget = budget.saturating_sub(1);
                        if *budget == 0 {
                            done.push(task.handle);
                            events.push(TaskEvent::Completed(task.handle));
                        }
                    }
                }
                Ok(TickOutcome::Finished) => {
                    done.push(task.handle);
                    events.push(TaskEvent::Completed(task.handle));
                }
                Err(err) => {
                    done.push(task.handle);
                    events.push(TaskEvent::Faulted(task.handle, err));
                }
            }
        }

        self.tasks.retain(|t| !done.contains(&t.handle));
        events
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const SEC: Duration = Duration::from_secs(1);

    fn counting_task(handle: u64, interval: Duration, fires: &Rc<Cell<u32>>) -> PeriodicTask {
        let fires = Rc::clone(fires);
        PeriodicTask::new(TaskHandle(handle), interval, move |_| {
            fires.set(fires.get() + 1);
            Ok(TickOutcome::Continue)
        })
    }

    #[test]
    fn finite_budget_fires_exactly_budget_times_then_auto_cancels() {
        let mut sched = Scheduler::new();
        let fires = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        let task = counting_task(1, SEC, &fires).with_budget(3);
        sched.register(task, t0).unwrap();

        // Drive well past the budget; firing count must not exceed it.
        let mut now = t0;
        for _ in 0..10 {
            now += SEC;
            sched.tick(now);
        }

        assert_eq!(fires.get(), 3);
        assert!(!sched.contains(TaskHandle(1)));
        assert!(sched.is_empty());
    }

    #[test]
    fn duplicate_handle_is_rejected() {
        let mut sched = Scheduler::new();
        let fires = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        sched.register(counting_task(7, SEC, &fires), t0).unwrap();
        let err = sched
            .register(counting_task(7, SEC, &fires), t0)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateTask(TaskHandle(7))));
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn cancel_is_idempotent_and_stops_firing() {
        let mut sched = Scheduler::new();
        let fires = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        sched.register(counting_task(1, SEC, &fires), t0).unwrap();
        sched.tick(t0 + SEC);
        assert_eq!(fires.get(), 1);

        sched.cancel(TaskHandle(1));
        sched.cancel(TaskHandle(1)); // no-op
        sched.cancel(TaskHandle(99)); // unknown, no-op

        sched.tick(t0 + SEC * 5);
        assert_eq!(fires.get(), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn heterogeneous_intervals_track_independently() {
        let mut sched = Scheduler::new();
        let fast = Rc::new(Cell::new(0));
        let slow = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        sched.register(counting_task(1, SEC, &fast), t0).unwrap();
        sched
            .register(counting_task(2, Duration::from_millis(1500), &slow), t0)
            .unwrap();

        // Drive at 500ms granularity for 6 simulated seconds.
        let mut now = t0;
        for _ in 0..12 {
            now += Duration::from_millis(500);
            sched.tick(now);
        }

        assert_eq!(fast.get(), 6);
        assert_eq!(slow.get(), 4);
    }

    #[test]
    fn coincident_deadlines_fire_in_registration_order() {
        let mut sched = Scheduler::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let t0 = Instant::now();

        for id in [3u64, 1, 2] {
            let order = Rc::clone(&order);
            let task = PeriodicTask::new(TaskHandle(id), SEC, move |_| {
                order.borrow_mut().push(id);
                Ok(TickOutcome::Continue)
            });
            sched.register(task, t0).unwrap();
        }

        sched.tick(t0 + SEC);
        assert_eq!(*order.borrow(), vec![3, 1, 2]);
    }

    #[test]
    fn at_most_one_fire_per_tick_even_when_driver_stalls() {
        let mut sched = Scheduler::new();
        let fires = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        sched.register(counting_task(1, SEC, &fires), t0).unwrap();

        // Driver comes back 10 seconds late: still a single fire.
        sched.tick(t0 + SEC * 10);
        assert_eq!(fires.get(), 1);
    }

    #[test]
    fn faulting_callback_is_cancelled_and_isolates_others() {
        let mut sched = Scheduler::new();
        let healthy = Rc::new(Cell::new(0));
        let t0 = Instant::now();

        let faulty = PeriodicTask::new(TaskHandle(1), SEC, |_| anyhow::bail!("sample failed"));
        sched.register(faulty, t0).unwrap();
        sched.register(counting_task(2, SEC, &healthy), t0).unwrap();

        let events = sched.tick(t0 + SEC);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TaskEvent::Faulted(TaskHandle(1), _)));
        assert!(!sched.contains(TaskHandle(1)));
        assert!(sched.contains(TaskHandle(2)));

        sched.tick(t0 + SEC * 2);
        assert_eq!(healthy.get(), 2);
    }

    #[test]
    fn finished_outcome_completes_the_task() {
        let mut sched = Scheduler::new();
        let t0 = Instant::now();

        let task = PeriodicTask::new(TaskHandle(1), SEC, |_| Ok(TickOutcome::Finished));
        sched.register(task, t0).unwrap();

        let events = sched.tick(t0 + SEC);
        assert!(matches!(events[0], TaskEvent::Completed(TaskHandle(1))));
        assert!(sched.is_empty());
    }
}
