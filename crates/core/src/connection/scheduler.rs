//! Deferred work for the connection manager.
//!
//! Reconnection is never done inline: the manager asks a [`Scheduler`] to
//! hand an action back after a delay. The tokio scheduler delivers it over
//! a channel polled by the runtime loop; [`ManualScheduler`] records it so
//! tests can advance time by hand.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    Reconnect,
}

pub trait Scheduler: Send + Sync {
    fn schedule_after(&self, delay: Duration, action: ScheduledAction);
}

/// Delivers scheduled actions on a channel after a tokio sleep.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: UnboundedSender<ScheduledAction>,
}

impl TokioScheduler {
    /// Create the scheduler and the receiver the runtime loop polls.
    pub fn new() -> (Self, UnboundedReceiver<ScheduledAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, action: ScheduledAction) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(action);
        });
    }
}

/// Records scheduled actions instead of running them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(Duration, ScheduledAction)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything scheduled so far, in order.
    pub fn pending(&self) -> Vec<(Duration, ScheduledAction)> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything scheduled so far.
    pub fn take(&self) -> Vec<(Duration, ScheduledAction)> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, action: ScheduledAction) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((delay, action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_delivers_after_delay() {
        let (scheduler, mut rx) = TokioScheduler::new();

        scheduler.schedule_after(Duration::from_secs(3), ScheduledAction::Reconnect);

        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.recv().await, Some(ScheduledAction::Reconnect));
    }

    #[test]
    fn test_manual_scheduler_records_in_order() {
        let scheduler = ManualScheduler::new();
        scheduler.schedule_after(Duration::from_secs(5), ScheduledAction::Reconnect);
        scheduler.schedule_after(Duration::from_secs(3), ScheduledAction::Reconnect);

        assert_eq!(scheduler.pending().len(), 2);
        let taken = scheduler.take();
        assert_eq!(taken[0].0, Duration::from_secs(5));
        assert!(scheduler.pending().is_empty());
    }
}
