//! # valvehub-app
//!
//! Application layer — the valve control use-case and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports):
//!   - `Actuator` — command the physical solenoid valve
//!   - `ObjectRegistry` — resolve actuator references
//!   - `CloseTimer` — the one-shot auto-close timer slot
//!   - `StateSink` — publish observable state to the host
//! - Provide the **driving/inbound port** as a use-case struct:
//!   - `ValveController` — toggle, open, close, emergency stop, timer fire
//! - Orchestrate domain objects without knowing *how* the host schedules
//!   timers or talks to hardware
//!
//! ## Dependency rule
//! Depends on `valvehub-domain` only (plus `tokio::time` for the
//! emergency-stop hold). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod controller;
pub mod ports;
