//! # valvehub-domain
//!
//! Pure domain model for the valvehub solenoid-valve control module.
//!
//! ## Responsibilities
//! - Foundational types: actuator object references, timestamps, errors
//! - Define **Commands** (`toggle`, `open`, `close`, `emergency_stop`, …)
//! - Define **Observable fields** (valve open state, cycle time, timer info, …)
//! - Define the **Configuration** a managed valve instance is created from,
//!   including the capability flags that unify the two module variants
//! - Contain all invariant enforcement (cycle-time bounds, reference checks)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod config;
pub mod error;
pub mod id;
pub mod observe;
pub mod time;
