//! Cancellable delayed task
//!
//! Holds at most one outstanding task. Rescheduling aborts the previous task
//! before spawning the new one, so only the most recently scheduled work can
//! ever run. Dropping the handle aborts whatever is still pending.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a single debounced task
#[derive(Debug, Default)]
pub struct DebouncedTask {
    handle: Option<JoinHandle<()>>,
}

impl DebouncedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any task scheduled earlier.
    ///
    /// Must be called from within a tokio runtime.
    pub fn reschedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the scheduled task. Returns whether one was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a scheduled task has not finished yet
    pub fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebouncedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> {
        let counter = counter.clone();
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_schedule_runs() {
        let last = Arc::new(AtomicUsize::new(0));
        let mut task = DebouncedTask::new();

        for value in 1..=5 {
            task.reschedule(Duration::from_millis(1000), counting_task(&last, value));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(last.load(Ordering::SeqCst), 0);
        assert!(task.is_pending());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(last.load(Ordering::SeqCst), 5);
        assert!(!task.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let last = Arc::new(AtomicUsize::new(0));
        let mut task = DebouncedTask::new();

        task.reschedule(Duration::from_millis(1000), counting_task(&last, 1));
        assert!(task.cancel());
        assert!(!task.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(last.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let last = Arc::new(AtomicUsize::new(0));
        {
            let mut task = DebouncedTask::new();
            task.reschedule(Duration::from_millis(10), counting_task(&last, 1));
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(last.load(Ordering::SeqCst), 0);
    }
}
