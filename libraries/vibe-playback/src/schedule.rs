//! Cancellable recurring tasks driven by an injected clock
//!
//! Nothing here spawns timers. The engine calls [`Scheduler::due`] from its
//! `tick` with the clock's current time and acts on whatever fired. Each task
//! carries the subscription it was scheduled under so the engine can ignore a
//! firing that belongs to an item it no longer plays.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::subscription::SubscriptionId;

// One year; keeps date arithmetic far from chrono's range limits
const MAX_PERIOD_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    every_ms: i64,
    next_due: DateTime<Utc>,
    owner: SubscriptionId,
}

/// Set of recurring tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a task every `every`, first firing one period after `now`
    pub fn schedule_every(
        &mut self,
        now: DateTime<Utc>,
        every: Duration,
        owner: SubscriptionId,
    ) -> TaskId {
        let every_ms = i64::try_from(every.as_millis())
            .unwrap_or(MAX_PERIOD_MS)
            .clamp(1, MAX_PERIOD_MS);
        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.tasks.push(Task {
            id,
            every_ms,
            next_due: now + chrono::Duration::milliseconds(every_ms),
            owner,
        });
        id
    }

    /// Cancel a task; returns whether it was still scheduled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel every task
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Whether `id` is still scheduled
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Number of scheduled tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is scheduled
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect tasks due at `now` and reschedule them
    ///
    /// A task fires at most once per call; periods missed between calls
    /// collapse into that single firing.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<(TaskId, SubscriptionId)> {
        let mut fired = Vec::new();

        for task in &mut self.tasks {
            let overdue_ms = (now - task.next_due).num_milliseconds();
            if overdue_ms < 0 {
                continue;
            }

            let until_next = task.every_ms - overdue_ms % task.every_ms;
            task.next_due = now + chrono::Duration::milliseconds(until_next);
            fired.push((task.id, task.owner));
        }

        fired
    }
}
