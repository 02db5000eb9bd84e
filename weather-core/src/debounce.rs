//! Cancellable delayed callback.
//!
//! At most one task is outstanding per handle. Arming again, calling
//! [`DebounceHandle::cancel`], or dropping the handle aborts the pending task
//! before it can run its callback.

use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceHandle {
    pending: Option<JoinHandle<()>>,
}

impl DebounceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once `delay` has elapsed, replacing any pending task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }));
    }

    /// Abort the pending task, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DebounceHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
