//! Cancellable actions deferred in simulated time.

use std::time::Duration;

use smallvec::SmallVec;
use tracing::trace;

/// Actions the game defers to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Re-enable ghost collisions after a death.
    EndCollisionCooldown,
    /// Load the next maze after a level is cleared.
    AdvanceLevel,
}

/// Identifies a scheduled action so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    remaining: Duration,
    action: Deferred,
}

/// Deferred actions measured in simulated time.
///
/// Nothing fires on its own; [`Scheduler::advance`] hands back whatever came due and the caller
/// applies it. Cancelled tasks are simply dropped.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, action: Deferred) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            remaining: delay,
            action,
        });
        trace!(?id, ?delay, ?action, "Scheduled deferred action");
        id
    }

    /// Cancels a pending task, returning whether it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    /// Cancels everything, returning how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advances simulated time, returning the tasks that came due.
    ///
    /// Due tasks are ordered by how early they came due, then by scheduling order.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[(TaskId, Deferred); 2]> {
        let mut due: SmallVec<[(Duration, TaskId, Deferred); 2]> = SmallVec::new();

        self.tasks.retain_mut(|task| {
            if task.remaining <= dt {
                due.push((task.remaining, task.id, task.action));
                false
            } else {
                task.remaining -= dt;
                true
            }
        });

        due.sort_by_key(|&(remaining, id, _)| (remaining, id));
        due.into_iter().map(|(_, id, action)| (id, action)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_once_when_due() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(Duration::from_secs(1), Deferred::EndCollisionCooldown);

        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        assert!(scheduler.is_pending(id));

        let due = scheduler.advance(Duration::from_millis(1));
        assert_eq!(due.as_slice(), &[(id, Deferred::EndCollisionCooldown)]);
        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(Duration::from_secs(2), Deferred::AdvanceLevel);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(Duration::from_secs(3)).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(Duration::from_secs(2), Deferred::AdvanceLevel);
        let early = scheduler.schedule(Duration::from_secs(1), Deferred::EndCollisionCooldown);

        let due = scheduler.advance(Duration::from_secs(3));
        assert_eq!(
            due.as_slice(),
            &[(early, Deferred::EndCollisionCooldown), (late, Deferred::AdvanceLevel)]
        );
        assert_eq!(scheduler.cancel_all(), 0);
    }
}
