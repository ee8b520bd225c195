//! An in-process host with a main-context task queue.
//!
//! [`QueuedHost`] plays the head unit's main looper: completions from any
//! thread post tasks into a queue, and the owner of the main context runs
//! them with [`run_pending`](QueuedHost::run_pending) or
//! [`wait_and_run`](QueuedHost::wait_and_run). Re-render requests and
//! screen actions are recorded for the session to consume.

use super::{Host, MainTask};
use crate::screen::{Action, ScreenId};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
pub struct QueuedHost {
    tasks: Mutex<VecDeque<MainTask>>,
    posted: Condvar,
    actions: Mutex<Vec<Action>>,
    invalidations: Mutex<Vec<ScreenId>>,
}

impl QueuedHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs queued tasks, including tasks they post, until the queue is
    /// empty. Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_task() {
            task();
            ran += 1;
        }
        ran
    }

    /// Waits up to `timeout` for a task to be posted, then runs everything
    /// queued. Returns the number of tasks run; `0` means the wait timed out.
    pub fn wait_and_run(&self, timeout: Duration) -> usize {
        {
            let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            let (tasks, _timeout) = self
                .posted
                .wait_timeout_while(tasks, timeout, |tasks| tasks.is_empty())
                .unwrap_or_else(PoisonError::into_inner);
            if tasks.is_empty() {
                return 0;
            }
        }
        self.run_pending()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drains the actions screens asked for, oldest first.
    pub fn take_actions(&self) -> Vec<Action> {
        std::mem::take(&mut *self.actions.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drains the re-render requests, oldest first.
    pub fn take_invalidations(&self) -> Vec<ScreenId> {
        std::mem::take(
            &mut *self
                .invalidations
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn pop_task(&self) -> Option<MainTask> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

impl Host for QueuedHost {
    fn run_on_main(&self, task: MainTask) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(task);
        self.posted.notify_all();
    }

    fn invalidate(&self, screen: ScreenId) {
        tracing::debug!(screen = %screen, "re-render requested");
        self.invalidations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(screen);
    }

    fn perform(&self, action: Action) {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(action);
    }
}

impl std::fmt::Debug for QueuedHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedHost")
            .field("pending_tasks", &self.pending_tasks())
            .finish_non_exhaustive()
    }
}
