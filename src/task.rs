//! Task and timer collaborator handles.
//!
//! The cooperative scheduler and the timer wheel live outside this crate;
//! these types are the handles the core and its built-in handlers share
//! with them. A [`Task`] is reference-counted and internally atomic so a
//! registered handler closure and the owning element can both hold it.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Highest ticket value a task may be assigned.
pub const MAX_TICKETS: u32 = 1 << 15;

/// Ticket value tasks start with.
pub const DEFAULT_TICKETS: u32 = 1 << 10;

/// Handle to a scheduler task owned by an element.
///
/// The scheduler calls the element's
/// [`run_task`](crate::element::Element::run_task) hook when the task
/// fires; tickets weight the task's share of the scheduler.
#[derive(Debug)]
pub struct Task {
    scheduled: AtomicBool,
    tickets: AtomicU32,
    home_thread: AtomicUsize,
}

impl Task {
    /// Create an unscheduled task with [`DEFAULT_TICKETS`] on thread 0.
    pub fn new() -> Self {
        Self {
            scheduled: AtomicBool::new(false),
            tickets: AtomicU32::new(DEFAULT_TICKETS),
            home_thread: AtomicUsize::new(0),
        }
    }

    /// Whether the task is currently scheduled.
    pub fn scheduled(&self) -> bool {
        self.scheduled.load(Ordering::Relaxed)
    }

    /// Mark the task as scheduled.
    pub fn schedule(&self) {
        self.scheduled.store(true, Ordering::Relaxed);
    }

    /// Mark the task as unscheduled.
    pub fn unschedule(&self) {
        self.scheduled.store(false, Ordering::Relaxed);
    }

    /// Current ticket count.
    pub fn tickets(&self) -> u32 {
        self.tickets.load(Ordering::Relaxed)
    }

    /// Set the ticket count. Callers are responsible for keeping the
    /// value within `[1, MAX_TICKETS]`; the `tickets` write handler
    /// clamps and warns.
    pub fn set_tickets(&self, tickets: u32) {
        self.tickets.store(tickets, Ordering::Relaxed);
    }

    /// The worker thread this task runs on.
    pub fn home_thread(&self) -> usize {
        self.home_thread.load(Ordering::Relaxed)
    }

    /// Move the task to another worker thread.
    pub fn set_home_thread(&self, thread: usize) {
        self.home_thread.store(thread, Ordering::Relaxed);
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a timer owned by an element.
///
/// The timer wheel calls the element's
/// [`run_timer`](crate::element::Element::run_timer) hook when the
/// deadline passes.
#[derive(Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// Create an unscheduled timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the timer has a pending deadline.
    pub fn scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    pub fn expiry(&self) -> Option<Instant> {
        self.deadline
    }

    /// Schedule the timer to fire at `deadline`.
    pub fn schedule_at(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Schedule the timer to fire after `delay`.
    pub fn schedule_after(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Cancel the pending deadline.
    pub fn unschedule(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_defaults() {
        let task = Task::new();
        assert!(!task.scheduled());
        assert_eq!(task.tickets(), DEFAULT_TICKETS);
        assert_eq!(task.home_thread(), 0);
    }

    #[test]
    fn test_task_schedule_round_trip() {
        let task = Task::new();
        task.schedule();
        assert!(task.scheduled());
        task.unschedule();
        assert!(!task.scheduled());
    }

    #[test]
    fn test_timer_scheduling() {
        let mut timer = Timer::new();
        assert!(!timer.scheduled());
        timer.schedule_after(Duration::from_millis(5));
        assert!(timer.scheduled());
        assert!(timer.expiry().is_some());
        timer.unschedule();
        assert!(!timer.scheduled());
    }
}
