//! Cancellable deferred tasks measured on the host clock.

use crate::types::SoundCue;
use std::time::Duration;

/// Work deferred to a later tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Task {
    /// End the grace window and let the served ball move
    ReleaseBall,
    /// Play a follow-up note of a stinger
    StingerNote { cue: SoundCue, note: u8 },
}

/// Identifies one scheduled task
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    generation: u64,
    id: u64,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TaskHandle,
    due: Duration,
    task: Task,
}

/// Deferred task queue.
///
/// Every `cancel_all` starts a new generation; a task scheduled in an older
/// generation never fires.
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    generation: u64,
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire on the first poll at or after `due`
    pub fn schedule(&mut self, due: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle {
            generation: self.generation,
            id: self.next_id,
        };
        self.next_id += 1;
        self.pending.push(Scheduled { handle, due, task });
        handle
    }

    /// Discard every pending task
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Whether the task behind `handle` is still waiting to fire
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        handle.generation == self.generation && self.pending.iter().any(|s| s.handle == handle)
    }

    /// Tasks waiting to fire
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every task due at `now`, earliest first
    pub fn poll(&mut self, now: Duration) -> Vec<Task> {
        let generation = self.generation;
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });

        due.retain(|s| s.handle.generation == generation);
        due.sort_by_key(|s| (s.due, s.handle.id));
        due.into_iter().map(|s| s.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_task_fires_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(250), Task::ReleaseBall);

        assert!(scheduler.poll(ms(100)).is_empty());
        assert!(scheduler.poll(ms(249)).is_empty());
        assert_eq!(scheduler.poll(ms(250)), vec![Task::ReleaseBall]);

        // Fires only once
        assert!(scheduler.poll(ms(1000)).is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        let late = Task::StingerNote {
            cue: SoundCue::Win,
            note: 2,
        };
        let early = Task::StingerNote {
            cue: SoundCue::Win,
            note: 1,
        };
        scheduler.schedule(ms(300), late);
        scheduler.schedule(ms(150), early);

        assert_eq!(scheduler.poll(ms(500)), vec![early, late]);
    }

    #[test]
    fn test_cancel_all_discards_pending() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(ms(250), Task::ReleaseBall);
        assert!(scheduler.is_pending(handle));
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.cancel_all();

        assert!(!scheduler.is_pending(handle));
        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.poll(ms(10_000)).is_empty());
    }

    #[test]
    fn test_new_generation_tasks_still_fire() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(100), Task::ReleaseBall);
        scheduler.cancel_all();
        let handle = scheduler.schedule(ms(200), Task::ReleaseBall);

        assert!(scheduler.is_pending(handle));
        assert_eq!(scheduler.poll(ms(200)), vec![Task::ReleaseBall]);
    }
}
