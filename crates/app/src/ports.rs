//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the host
//! runtime. They are defined here (in `app`) so that both the use-case
//! layer and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod actuator;
pub mod close_timer;
pub mod object_registry;
pub mod state_sink;

pub use actuator::Actuator;
pub use close_timer::CloseTimer;
pub use object_registry::ObjectRegistry;
pub use state_sink::StateSink;
