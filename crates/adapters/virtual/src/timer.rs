//! Tokio-backed close timer — one deadline slot delivering its fire over a
//! channel to the serial event loop.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use valvehub_app::ports::CloseTimer;

use crate::HostEvent;

/// Single-shot timer slot scheduled on the tokio runtime.
///
/// Arming spawns a sleep task that sends [`HostEvent::CloseTimerElapsed`]
/// when the deadline elapses; rearming or disarming aborts the pending task,
/// so a cleared slot never delivers a stale fire.
pub struct TokioCloseTimer {
    events: UnboundedSender<HostEvent>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl TokioCloseTimer {
    /// Create a disarmed timer delivering fires to `events`.
    #[must_use]
    pub fn new(events: UnboundedSender<HostEvent>) -> Self {
        Self {
            events,
            pending: Mutex::new(None),
        }
    }

    /// Whether a deadline is currently pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    fn replace(&self, task: Option<JoinHandle<()>>) {
        if let Some(previous) = std::mem::replace(&mut *self.lock(), task) {
            previous.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CloseTimer for TokioCloseTimer {
    fn arm(&self, delay: Duration) {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(HostEvent::CloseTimerElapsed);
        });
        self.replace(Some(task));
    }

    fn disarm(&self) {
        self.replace(None);
    }
}

impl Drop for TokioCloseTimer {
    fn drop(&mut self) {
        self.replace(None);
    }
}
