use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Periodic task that emits ticks over a channel until cancelled
pub struct Ticker;

/// Cancels the periodic task; dropping the handle cancels it too
#[derive(Debug)]
pub struct TickerHandle {
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start ticking every `period`. The first tick arrives after one full period.
    pub fn start(period: Duration) -> (TickerHandle, mpsc::Receiver<()>) {
        // One pending tick is enough; a slow consumer just misses ticks.
        let (tx, rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match tx.try_send(()) {
                    Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                    Err(mpsc::error::TrySendError::Closed(())) => {
                        ::log::debug!("Tick receiver dropped, stopping ticker");
                        break;
                    }
                }
            }
        });

        ::log::debug!("Started ticker every {:?}", period);
        (TickerHandle { task: Some(task) }, rx)
    }
}

impl TickerHandle {
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            ::log::debug!("Ticker cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_arrive() {
        let (_handle, mut rx) = Ticker::start(Duration::from_millis(5));
        for _ in 0..3 {
            let tick = time::timeout(Duration::from_secs(2), rx.recv()).await;
            assert_eq!(tick, Ok(Some(())));
        }
    }

    #[tokio::test]
    async fn test_cancel_closes_channel() {
        let (mut handle, mut rx) = Ticker::start(Duration::from_millis(5));
        assert!(handle.is_running());
        handle.cancel();
        assert!(!handle.is_running());

        // Drain a tick that may already be queued, then the channel closes
        let mut closed = false;
        for _ in 0..2 {
            if time::timeout(Duration::from_secs(2), rx.recv()).await == Ok(None) {
                closed = true;
                break;
            }
        }
        assert!(closed);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let (handle, mut rx) = Ticker::start(Duration::from_millis(5));
        drop(handle);
        let mut closed = false;
        for _ in 0..2 {
            if time::timeout(Duration::from_secs(2), rx.recv()).await == Ok(None) {
                closed = true;
                break;
            }
        }
        assert!(closed);
    }
}
