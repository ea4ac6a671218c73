//! Virtual solenoid valve — responds to actuator commands, with failure
//! injection for exercising the retry path.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use valvehub_app::ports::Actuator;
use valvehub_domain::id::ObjectId;

use crate::HostEvent;

/// A simulated solenoid valve living under a fixed object id.
pub struct VirtualValve {
    id: ObjectId,
    open: Mutex<bool>,
    /// Number of upcoming commands to reject.
    failures: Mutex<u32>,
    events: Option<UnboundedSender<HostEvent>>,
}

impl VirtualValve {
    /// Create a closed valve with the given object id.
    #[must_use]
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            open: Mutex::new(false),
            failures: Mutex::new(0),
            events: None,
        }
    }

    /// Create a closed valve that pushes [`HostEvent::ActuatorStateChanged`]
    /// notifications after every accepted command.
    #[must_use]
    pub fn with_events(id: ObjectId, events: UnboundedSender<HostEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::new(id)
        }
    }

    /// The object id this valve answers to.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Current simulated hardware state.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.lock(&self.open)
    }

    /// Reject the next `count` commands, simulating a flaky device.
    pub fn inject_failures(&self, count: u32) {
        *self.lock(&self.failures) = count;
    }

    fn lock<'a, V>(&self, mutex: &'a Mutex<V>) -> MutexGuard<'a, V> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Actuator for VirtualValve {
    fn request_action(&self, target: ObjectId, open: bool) -> impl Future<Output = bool> + Send {
        let accepted = if target == self.id {
            let mut failures = self.lock(&self.failures);
            if *failures > 0 {
                *failures -= 1;
                debug!(valve = %self.id, "simulated command failure");
                false
            } else {
                drop(failures);
                let changed = {
                    let mut state = self.lock(&self.open);
                    let changed = *state != open;
                    *state = open;
                    changed
                };
                if let Some(events) = &self.events {
                    let _ = events.send(HostEvent::ActuatorStateChanged {
                        reported: open,
                        changed,
                    });
                }
                true
            }
        } else {
            warn!(%target, valve = %self.id, "command for unknown actuator");
            false
        };
        async move { accepted }
    }
}
