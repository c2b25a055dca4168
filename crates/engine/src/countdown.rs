//! Cancellable countdown
//!
//! At most one countdown task exists per [`Countdown`]. Restarting aborts the
//! previous task before spawning the next. Abort is best-effort: a task that
//! already fired may still deliver its tick, which is why each tick carries
//! the generation it was armed with and the engine ignores stale ones.

use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct Countdown {
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the running countdown; `on_expire` receives `generation`
    /// after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restart<F>(&mut self, generation: u64, delay: Duration, on_expire: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_expire(generation);
        }));
    }

    /// Abort the running countdown; returns whether one was armed
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new();
        countdown.restart(7, Duration::from_millis(12_000), move |g| {
            let _ = tx.send(g);
        });

        tokio::time::sleep(Duration::from_millis(11_999)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new();
        let first = tx.clone();
        countdown.restart(1, Duration::from_millis(100), move |g| {
            let _ = first.send(g);
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        countdown.restart(2, Duration::from_millis(100), move |g| {
            let _ = tx.send(g);
        });

        assert_eq!(rx.recv().await, Some(2));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_final() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut countdown = Countdown::new();
        countdown.restart(1, Duration::from_millis(10), move |g| {
            let _ = tx.send(g);
        });
        assert!(countdown.cancel());
        assert!(!countdown.cancel());
        // The sender was dropped with the aborted task
        assert_eq!(rx.recv().await, None);
    }
}
