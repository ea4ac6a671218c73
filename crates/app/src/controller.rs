//! Valve controller — the single-actuator, timer-driven control use-case.
//!
//! One controller instance manages one solenoid valve. The host invokes the
//! entry points serially (command dispatch, timer fire, state-change
//! notifications), so the controller holds plain mutable state and needs no
//! locking. The armed close timer is the only asynchronous element.

use std::time::Duration;

use tracing::{debug, error};

use valvehub_domain::command::ValveCommand;
use valvehub_domain::config::{CYCLE_TIME_MAX, CYCLE_TIME_MIN, Capabilities, ValveConfig};
use valvehub_domain::error::ValveError;
use valvehub_domain::id::ObjectId;
use valvehub_domain::observe::{ObservedField, ObservedValue, TIMER_INFO_IDLE};
use valvehub_domain::time;

use crate::ports::{Actuator, CloseTimer, ObjectRegistry, StateSink};

/// How long the emergency flag stays raised after a successful emergency
/// close, so observers reliably see the transition.
const EMERGENCY_RESET_DELAY: Duration = Duration::from_millis(500);

/// Controls one solenoid valve: open with auto-close, explicit close,
/// emergency stop, and actuator feedback tracking.
pub struct ValveController<A, R, T, S> {
    actuator_ref: ObjectId,
    cycle_time: f64,
    maintenance_mode: bool,
    caps: Capabilities,
    is_open: bool,
    valve_state: bool,
    emergency_stop: bool,
    actuator: A,
    registry: R,
    timer: T,
    sink: S,
}

impl<A, R, T, S> ValveController<A, R, T, S>
where
    A: Actuator,
    R: ObjectRegistry,
    T: CloseTimer,
    S: StateSink,
{
    /// Create a controller from its instance configuration and publish the
    /// initial observable state.
    ///
    /// The configuration is expected to have passed
    /// [`ValveConfig::validate`]; an unset actuator is tolerated here and
    /// rejected per operate attempt instead.
    pub fn new(config: &ValveConfig, actuator: A, registry: R, timer: T, sink: S) -> Self {
        let controller = Self {
            actuator_ref: config.actuator,
            cycle_time: config.cycle_time_seconds,
            maintenance_mode: config.maintenance_mode,
            caps: config.capabilities,
            is_open: false,
            valve_state: false,
            emergency_stop: false,
            actuator,
            registry,
            timer,
            sink,
        };
        controller
            .sink
            .set(ObservedField::ValveOpen, ObservedValue::Bool(false));
        controller.sink.set(
            ObservedField::CycleTime,
            ObservedValue::Float(controller.cycle_time),
        );
        if controller.caps.timer_info {
            controller
                .sink
                .set(ObservedField::TimerInfo, TIMER_INFO_IDLE.into());
        }
        controller
    }

    /// Last commanded state: true while the valve is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Last state reported by the actuator. Informational only.
    #[must_use]
    pub fn valve_state(&self) -> bool {
        self.valve_state
    }

    /// Configured cycle time in seconds.
    #[must_use]
    pub fn cycle_time(&self) -> f64 {
        self.cycle_time
    }

    /// Whether an emergency close is in progress or unresolved.
    #[must_use]
    pub fn emergency_stop_active(&self) -> bool {
        self.emergency_stop
    }

    /// Route a typed command to the matching operation.
    ///
    /// # Errors
    ///
    /// Propagates the [`ValveError`] of the delegated operation.
    pub async fn handle_command(&mut self, command: ValveCommand) -> Result<(), ValveError> {
        match command {
            ValveCommand::Toggle { open } => self.toggle(open).await,
            ValveCommand::SetCycleTime { seconds } => {
                self.set_cycle_time(seconds);
                Ok(())
            }
            ValveCommand::Open => self.open().await,
            ValveCommand::Close => self.close().await,
            ValveCommand::EmergencyStop => self.emergency_stop().await,
        }
    }

    /// Open when `open` is true, close otherwise.
    ///
    /// # Errors
    ///
    /// Propagates the [`ValveError`] of the delegated operation.
    pub async fn toggle(&mut self, open: bool) -> Result<(), ValveError> {
        if open { self.open().await } else { self.close().await }
    }

    /// Store a new cycle time.
    ///
    /// The value is clamped to the operator profile range
    /// ([`CYCLE_TIME_MIN`]..=[`CYCLE_TIME_MAX`]); non-finite input is
    /// refused and keeps the previous value. A timer that is already armed
    /// keeps its original deadline.
    pub fn set_cycle_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            error!(seconds, "refusing non-finite cycle time");
            return;
        }
        let seconds = seconds.clamp(CYCLE_TIME_MIN, CYCLE_TIME_MAX);
        self.cycle_time = seconds;
        self.sink
            .set(ObservedField::CycleTime, ObservedValue::Float(seconds));
    }

    /// Open the valve and arm the auto-close timer for the cycle time.
    ///
    /// The command is retried exactly once; on a double failure the valve
    /// state is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`ValveError::MaintenanceModeActive`] when the lockout applies.
    /// - [`ValveError::ActuatorNotConfigured`] when the reference is unset
    ///   or stale. The timer stays armed in this case, as it does when the
    ///   command fails.
    /// - [`ValveError::CommandFailed`] when both attempts are rejected.
    pub async fn open(&mut self) -> Result<(), ValveError> {
        debug!("opening solenoid valve");
        if self.caps.maintenance_lockout && self.maintenance_mode {
            error!("open rejected, maintenance mode is active");
            return Err(ValveError::MaintenanceModeActive);
        }
        self.arm_close_timer();
        let id = self.ensure_actuator()?;
        if !self.command_actuator(id, true).await {
            error!(actuator = %id, "solenoid valve could not be opened");
            return Err(ValveError::CommandFailed { actuator: id });
        }
        debug!(actuator = %id, "solenoid valve opened");
        self.set_open(true);
        Ok(())
    }

    /// Close the valve.
    ///
    /// The close timer is disarmed unconditionally, before the actuator is
    /// even looked at; a close request always cancels a pending auto-close.
    ///
    /// # Errors
    ///
    /// - [`ValveError::ActuatorNotConfigured`] when the reference is unset
    ///   or stale.
    /// - [`ValveError::CommandFailed`] when both attempts are rejected; the
    ///   valve state is left unchanged.
    pub async fn close(&mut self) -> Result<(), ValveError> {
        debug!("closing solenoid valve");
        self.disarm_close_timer();
        let id = self.ensure_actuator()?;
        if !self.command_actuator(id, false).await {
            error!(actuator = %id, "solenoid valve could not be closed");
            return Err(ValveError::CommandFailed { actuator: id });
        }
        debug!(actuator = %id, "solenoid valve closed");
        self.set_open(false);
        Ok(())
    }

    /// Close immediately with the observable emergency flag raised.
    ///
    /// The flag goes up before the close attempt. After a successful close
    /// it is held for [`EMERGENCY_RESET_DELAY`] and then cleared; after a
    /// failed close it stays raised so observers see the unresolved
    /// emergency. Without the `emergency_stop` capability this is a plain
    /// [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Propagates the [`ValveError`] of the close attempt.
    pub async fn emergency_stop(&mut self) -> Result<(), ValveError> {
        if !self.caps.emergency_stop {
            return self.close().await;
        }
        self.set_emergency(true);
        match self.close().await {
            Ok(()) => {
                tokio::time::sleep(EMERGENCY_RESET_DELAY).await;
                self.set_emergency(false);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Host callback for the armed close timer's deadline.
    ///
    /// Same contract as an external [`close`](Self::close) request.
    ///
    /// # Errors
    ///
    /// Propagates the [`ValveError`] of the close attempt.
    pub async fn on_close_timer_fired(&mut self) -> Result<(), ValveError> {
        debug!("cycle time elapsed, auto-closing");
        self.close().await
    }

    /// Host notification that the actuator reported a state change.
    ///
    /// Updates the informational valve state only; the commanded state and
    /// the timer are untouched. `changed` is the host's change-detection
    /// flag; repeat notifications with the same value are ignored.
    pub fn on_actuator_state_changed(&mut self, reported: bool, changed: bool) {
        if !changed {
            return;
        }
        debug!(reported, "actuator state changed");
        self.valve_state = reported;
        self.sink.set(
            ObservedField::ValveState,
            ObservedValue::Int(i64::from(reported)),
        );
    }

    fn arm_close_timer(&self) {
        // Deliberately armed before the actuator check: a rejected or
        // failed open keeps its deadline.
        self.timer.arm(Duration::from_secs_f64(self.cycle_time));
        if self.caps.timer_info {
            let deadline = time::now() + chrono::Duration::seconds(self.cycle_time.round() as i64);
            self.sink.set(
                ObservedField::TimerInfo,
                ObservedValue::Text(time::format_deadline(deadline)),
            );
        }
    }

    fn disarm_close_timer(&self) {
        self.timer.disarm();
        if self.caps.timer_info {
            self.sink
                .set(ObservedField::TimerInfo, TIMER_INFO_IDLE.into());
        }
    }

    fn ensure_actuator(&self) -> Result<ObjectId, ValveError> {
        let id = self.actuator_ref;
        if !id.is_configured() || !self.registry.exists(id) {
            error!(actuator = %id, "no solenoid valve configured");
            return Err(ValveError::ActuatorNotConfigured);
        }
        Ok(id)
    }

    async fn command_actuator(&self, id: ObjectId, open: bool) -> bool {
        if self.actuator.request_action(id, open).await {
            return true;
        }
        // One immediate retry, no backoff.
        self.actuator.request_action(id, open).await
    }

    fn set_open(&mut self, open: bool) {
        self.is_open = open;
        self.sink
            .set(ObservedField::ValveOpen, ObservedValue::Bool(open));
    }

    fn set_emergency(&mut self, active: bool) {
        self.emergency_stop = active;
        self.sink
            .set(ObservedField::EmergencyStop, ObservedValue::Bool(active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashSet, VecDeque};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    const VALVE: ObjectId = ObjectId::new(47_110);

    // ------------------------------------------------------------------
    // Port mocks
    // ------------------------------------------------------------------

    /// Actuator that replays scripted outcomes and records every call.
    #[derive(Default)]
    struct ScriptedActuator {
        outcomes: Mutex<VecDeque<bool>>,
        calls: Mutex<Vec<(ObjectId, bool)>>,
    }

    impl ScriptedActuator {
        fn scripted(outcomes: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.iter().copied().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(ObjectId, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Actuator for ScriptedActuator {
        fn request_action(
            &self,
            target: ObjectId,
            open: bool,
        ) -> impl Future<Output = bool> + Send {
            self.calls.lock().unwrap().push((target, open));
            // Exhausted scripts default to success.
            let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
            async move { outcome }
        }
    }

    struct FakeRegistry {
        known: HashSet<ObjectId>,
    }

    impl FakeRegistry {
        fn with_valve() -> Arc<Self> {
            Arc::new(Self {
                known: HashSet::from([VALVE]),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                known: HashSet::new(),
            })
        }
    }

    impl ObjectRegistry for FakeRegistry {
        fn exists(&self, id: ObjectId) -> bool {
            self.known.contains(&id)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum TimerCall {
        Armed(Duration),
        Disarmed,
    }

    #[derive(Default)]
    struct RecordingTimer {
        history: Mutex<Vec<TimerCall>>,
    }

    impl RecordingTimer {
        fn history(&self) -> Vec<TimerCall> {
            self.history.lock().unwrap().clone()
        }

        /// The currently pending deadline, if any.
        fn armed(&self) -> Option<Duration> {
            match self.history.lock().unwrap().last() {
                Some(TimerCall::Armed(delay)) => Some(*delay),
                _ => None,
            }
        }
    }

    impl CloseTimer for RecordingTimer {
        fn arm(&self, delay: Duration) {
            self.history.lock().unwrap().push(TimerCall::Armed(delay));
        }

        fn disarm(&self) {
            self.history.lock().unwrap().push(TimerCall::Disarmed);
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<(ObservedField, ObservedValue)>>,
    }

    impl RecordingSink {
        fn last(&self, field: ObservedField) -> Option<ObservedValue> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(f, _)| *f == field)
                .map(|(_, v)| v.clone())
        }

        fn writes_for(&self, field: ObservedField) -> Vec<ObservedValue> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .filter(|(f, _)| *f == field)
                .map(|(_, v)| v.clone())
                .collect()
        }
    }

    impl StateSink for RecordingSink {
        fn set(&self, field: ObservedField, value: ObservedValue) {
            self.writes.lock().unwrap().push((field, value));
        }
    }

    // ------------------------------------------------------------------
    // Harness
    // ------------------------------------------------------------------

    type TestController =
        ValveController<Arc<ScriptedActuator>, Arc<FakeRegistry>, Arc<RecordingTimer>, Arc<RecordingSink>>;

    struct Harness {
        controller: TestController,
        actuator: Arc<ScriptedActuator>,
        timer: Arc<RecordingTimer>,
        sink: Arc<RecordingSink>,
    }

    fn harness(config: ValveConfig, outcomes: &[bool]) -> Harness {
        harness_with_registry(config, outcomes, FakeRegistry::with_valve())
    }

    fn harness_with_registry(
        config: ValveConfig,
        outcomes: &[bool],
        registry: Arc<FakeRegistry>,
    ) -> Harness {
        let actuator = ScriptedActuator::scripted(outcomes);
        let timer = Arc::new(RecordingTimer::default());
        let sink = Arc::new(RecordingSink::default());
        let controller = ValveController::new(
            &config,
            Arc::clone(&actuator),
            registry,
            Arc::clone(&timer),
            Arc::clone(&sink),
        );
        Harness {
            controller,
            actuator,
            timer,
            sink,
        }
    }

    fn config_with_valve() -> ValveConfig {
        ValveConfig {
            actuator: VALVE,
            cycle_time_seconds: 5.0,
            ..ValveConfig::default()
        }
    }

    // ------------------------------------------------------------------
    // Open
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_open_and_arm_timer_when_first_attempt_succeeds() {
        let mut h = harness(config_with_valve(), &[true]);

        h.controller.open().await.unwrap();

        assert!(h.controller.is_open());
        assert_eq!(h.timer.armed(), Some(Duration::from_secs(5)));
        assert_eq!(h.actuator.calls(), vec![(VALVE, true)]);
        assert_eq!(
            h.sink.last(ObservedField::ValveOpen),
            Some(ObservedValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn should_retry_once_then_succeed() {
        let mut h = harness(config_with_valve(), &[false, true]);

        h.controller.open().await.unwrap();

        assert!(h.controller.is_open());
        assert_eq!(h.actuator.calls().len(), 2);
    }

    #[tokio::test]
    async fn should_keep_state_when_both_attempts_fail() {
        let mut h = harness(config_with_valve(), &[false, false]);

        let result = h.controller.open().await;

        assert_eq!(result, Err(ValveError::CommandFailed { actuator: VALVE }));
        assert!(!h.controller.is_open());
        assert_eq!(h.actuator.calls().len(), 2);
        assert_eq!(
            h.sink.last(ObservedField::ValveOpen),
            Some(ObservedValue::Bool(false))
        );
    }

    #[tokio::test]
    async fn should_fail_open_when_actuator_unset() {
        let config = ValveConfig {
            actuator: ObjectId::UNSET,
            ..config_with_valve()
        };
        let mut h = harness(config, &[]);

        let result = h.controller.open().await;

        assert_eq!(result, Err(ValveError::ActuatorNotConfigured));
        assert!(!h.controller.is_open());
        assert!(h.actuator.calls().is_empty());
        // The deadline survives a failed validation.
        assert_eq!(h.timer.armed(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn should_fail_open_when_actuator_missing_from_registry() {
        let mut h = harness_with_registry(config_with_valve(), &[], FakeRegistry::empty());

        let result = h.controller.open().await;

        assert_eq!(result, Err(ValveError::ActuatorNotConfigured));
        assert!(h.actuator.calls().is_empty());
    }

    #[tokio::test]
    async fn should_publish_deadline_in_timer_info_on_open() {
        let mut h = harness(config_with_valve(), &[true]);

        h.controller.open().await.unwrap();

        match h.sink.last(ObservedField::TimerInfo) {
            Some(ObservedValue::Text(text)) => {
                assert_ne!(text, TIMER_INFO_IDLE);
                // dd.mm.yyyy, hh:mm:ss
                assert_eq!(text.len(), "27.08.2026, 18:30:05".len());
            }
            other => panic!("expected a deadline text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_not_publish_timer_info_without_capability() {
        let mut config = config_with_valve();
        config.capabilities.timer_info = false;
        let mut h = harness(config, &[true]);

        h.controller.open().await.unwrap();

        assert!(h.sink.writes_for(ObservedField::TimerInfo).is_empty());
    }

    // ------------------------------------------------------------------
    // Maintenance lockout
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_reject_open_in_maintenance_mode_without_touching_hardware() {
        let config = ValveConfig {
            maintenance_mode: true,
            ..config_with_valve()
        };
        let mut h = harness(config, &[]);

        let result = h.controller.open().await;

        assert_eq!(result, Err(ValveError::MaintenanceModeActive));
        assert!(h.actuator.calls().is_empty());
        assert!(h.timer.armed().is_none());
    }

    #[tokio::test]
    async fn should_open_despite_maintenance_mode_when_lockout_disabled() {
        let mut config = config_with_valve();
        config.maintenance_mode = true;
        config.capabilities.maintenance_lockout = false;
        let mut h = harness(config, &[true]);

        h.controller.open().await.unwrap();

        assert!(h.controller.is_open());
    }

    #[tokio::test]
    async fn should_still_close_in_maintenance_mode() {
        let config = ValveConfig {
            maintenance_mode: true,
            ..config_with_valve()
        };
        let mut h = harness(config, &[true]);

        h.controller.close().await.unwrap();

        assert!(!h.controller.is_open());
    }

    // ------------------------------------------------------------------
    // Close
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_disarm_timer_on_close_even_when_command_fails() {
        let mut h = harness(config_with_valve(), &[true, false, false]);

        h.controller.open().await.unwrap();
        let result = h.controller.close().await;

        assert_eq!(result, Err(ValveError::CommandFailed { actuator: VALVE }));
        assert!(h.controller.is_open());
        assert_eq!(h.timer.history().last(), Some(&TimerCall::Disarmed));
        assert_eq!(
            h.sink.last(ObservedField::TimerInfo),
            Some(ObservedValue::Text(TIMER_INFO_IDLE.to_string()))
        );
    }

    #[tokio::test]
    async fn should_disarm_timer_on_close_when_actuator_unset() {
        let config = ValveConfig {
            actuator: ObjectId::UNSET,
            ..config_with_valve()
        };
        let mut h = harness(config, &[]);

        let result = h.controller.close().await;

        assert_eq!(result, Err(ValveError::ActuatorNotConfigured));
        assert_eq!(h.timer.history().last(), Some(&TimerCall::Disarmed));
    }

    // ------------------------------------------------------------------
    // Toggle
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_round_trip_through_toggle() {
        let mut h = harness(config_with_valve(), &[]);
        assert!(!h.controller.is_open());

        h.controller.toggle(true).await.unwrap();
        assert!(h.controller.is_open());

        h.controller.toggle(false).await.unwrap();
        assert!(!h.controller.is_open());
        assert_eq!(
            h.actuator.calls(),
            vec![(VALVE, true), (VALVE, false)]
        );
    }

    // ------------------------------------------------------------------
    // Cycle time
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_keep_armed_deadline_when_cycle_time_changes() {
        let mut h = harness(config_with_valve(), &[true]);

        h.controller.open().await.unwrap();
        h.controller.set_cycle_time(30.0);

        assert_eq!(h.timer.armed(), Some(Duration::from_secs(5)));
        assert!((h.controller.cycle_time() - 30.0).abs() < f64::EPSILON);
        assert_eq!(
            h.sink.last(ObservedField::CycleTime),
            Some(ObservedValue::Float(30.0))
        );
    }

    #[tokio::test]
    async fn should_clamp_out_of_range_cycle_time_and_still_open() {
        let mut h = harness(config_with_valve(), &[true, true]);

        h.controller.set_cycle_time(-5.0);
        h.controller.open().await.unwrap();

        assert!((h.controller.cycle_time() - 1.0).abs() < f64::EPSILON);
        assert_eq!(h.timer.armed(), Some(Duration::from_secs(1)));

        h.controller.set_cycle_time(300.0);
        h.controller.open().await.unwrap();
        assert_eq!(h.timer.armed(), Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn should_keep_previous_cycle_time_for_non_finite_input() {
        let mut h = harness(config_with_valve(), &[]);

        h.controller.set_cycle_time(f64::NAN);
        assert!((h.controller.cycle_time() - 5.0).abs() < f64::EPSILON);

        h.controller.set_cycle_time(f64::INFINITY);
        assert!((h.controller.cycle_time() - 5.0).abs() < f64::EPSILON);
        // The refused values never reach the observable either.
        assert_eq!(h.sink.writes_for(ObservedField::CycleTime).len(), 1);
    }

    #[tokio::test]
    async fn should_use_new_cycle_time_on_next_open() {
        let mut h = harness(config_with_valve(), &[true, true, true]);

        h.controller.set_cycle_time(2.5);
        h.controller.open().await.unwrap();

        assert_eq!(h.timer.armed(), Some(Duration::from_secs_f64(2.5)));
    }

    // ------------------------------------------------------------------
    // Close timer fire
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_auto_close_when_timer_fires() {
        let mut h = harness(config_with_valve(), &[true, true]);

        h.controller.open().await.unwrap();
        h.controller.on_close_timer_fired().await.unwrap();

        assert!(!h.controller.is_open());
        assert_eq!(h.timer.history().last(), Some(&TimerCall::Disarmed));
    }

    // ------------------------------------------------------------------
    // Emergency stop
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn should_raise_then_clear_emergency_flag_around_successful_close() {
        let mut h = harness(config_with_valve(), &[true, true]);
        h.controller.open().await.unwrap();

        h.controller.emergency_stop().await.unwrap();

        assert!(!h.controller.emergency_stop_active());
        assert!(!h.controller.is_open());
        // Raised before the close completed, cleared after.
        assert_eq!(
            h.sink.writes_for(ObservedField::EmergencyStop),
            vec![ObservedValue::Bool(true), ObservedValue::Bool(false)]
        );
        let writes = h.sink.writes.lock().unwrap().clone();
        let raised = writes
            .iter()
            .position(|w| *w == (ObservedField::EmergencyStop, ObservedValue::Bool(true)))
            .unwrap();
        let closed = writes
            .iter()
            .rposition(|w| *w == (ObservedField::ValveOpen, ObservedValue::Bool(false)))
            .unwrap();
        let cleared = writes
            .iter()
            .position(|w| *w == (ObservedField::EmergencyStop, ObservedValue::Bool(false)))
            .unwrap();
        assert!(raised < closed && closed < cleared);
    }

    #[tokio::test(start_paused = true)]
    async fn should_leave_emergency_flag_raised_when_close_fails() {
        let mut h = harness(config_with_valve(), &[true, false, false]);
        h.controller.open().await.unwrap();

        let result = h.controller.emergency_stop().await;

        assert_eq!(result, Err(ValveError::CommandFailed { actuator: VALVE }));
        assert!(h.controller.emergency_stop_active());
        assert_eq!(
            h.sink.writes_for(ObservedField::EmergencyStop),
            vec![ObservedValue::Bool(true)]
        );
    }

    #[tokio::test]
    async fn should_fall_back_to_plain_close_without_emergency_capability() {
        let mut config = config_with_valve();
        config.capabilities.emergency_stop = false;
        let mut h = harness(config, &[true, true]);
        h.controller.open().await.unwrap();

        h.controller.emergency_stop().await.unwrap();

        assert!(!h.controller.is_open());
        assert!(h.sink.writes_for(ObservedField::EmergencyStop).is_empty());
    }

    // ------------------------------------------------------------------
    // Actuator feedback
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_track_reported_state_without_touching_commanded_state() {
        let mut h = harness(config_with_valve(), &[true]);
        h.controller.open().await.unwrap();

        h.controller.on_actuator_state_changed(false, true);

        assert!(!h.controller.valve_state());
        assert!(h.controller.is_open());
        assert_eq!(
            h.sink.last(ObservedField::ValveState),
            Some(ObservedValue::Int(0))
        );
    }

    #[tokio::test]
    async fn should_ignore_notification_without_change_flag() {
        let mut h = harness(config_with_valve(), &[]);

        h.controller.on_actuator_state_changed(true, false);

        assert!(!h.controller.valve_state());
        assert!(h.sink.writes_for(ObservedField::ValveState).is_empty());
    }

    // ------------------------------------------------------------------
    // Command routing
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_route_every_command_variant() {
        let mut h = harness(config_with_valve(), &[]);

        h.controller
            .handle_command(ValveCommand::Open)
            .await
            .unwrap();
        assert!(h.controller.is_open());

        h.controller
            .handle_command(ValveCommand::Close)
            .await
            .unwrap();
        assert!(!h.controller.is_open());

        h.controller
            .handle_command(ValveCommand::Toggle { open: true })
            .await
            .unwrap();
        assert!(h.controller.is_open());

        h.controller
            .handle_command(ValveCommand::SetCycleTime { seconds: 12.0 })
            .await
            .unwrap();
        assert!((h.controller.cycle_time() - 12.0).abs() < f64::EPSILON);

        tokio::time::pause();
        h.controller
            .handle_command(ValveCommand::EmergencyStop)
            .await
            .unwrap();
        assert!(!h.controller.is_open());
    }
}
