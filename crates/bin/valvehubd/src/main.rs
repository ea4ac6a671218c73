//! # valvehubd — valvehub daemon
//!
//! Composition root that wires the valve controller to the virtual host
//! adapters and runs the serial event loop.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Construct the simulated host: actuator, object registry, timer slot,
//!   observable state store
//! - Construct the [`ValveController`], injecting the adapters via port
//!   traits
//! - Run the serial event loop: operator commands from stdin, close-timer
//!   fires, actuator state-change notifications
//! - Handle graceful shutdown (SIGINT / end of input)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no valve logic belongs here.

mod config;
mod console;

use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{error, info};

use valvehub_adapter_virtual::{
    HostEvent, InMemoryRegistry, InMemoryStateStore, TokioCloseTimer, VirtualValve,
};
use valvehub_app::controller::ValveController;
use valvehub_domain::observe::ObservedField;

use crate::config::Config;
use crate::console::ConsoleInput;

type Controller = ValveController<
    Arc<VirtualValve>,
    Arc<InMemoryRegistry>,
    Arc<TokioCloseTimer>,
    Arc<InMemoryStateStore>,
>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    // Simulated host: the actuator object lives under the configured id and
    // is only registered when that id is set, so a blank configuration
    // exercises the not-configured path end to end.
    let valve = Arc::new(VirtualValve::with_events(
        config.valve.actuator,
        events_tx.clone(),
    ));
    let registry = Arc::new(InMemoryRegistry::default());
    if config.valve.actuator.is_configured() {
        registry.register(config.valve.actuator);
    }
    let timer = Arc::new(TokioCloseTimer::new(events_tx));
    let store = Arc::new(InMemoryStateStore::default());

    let mut controller = ValveController::new(
        &config.valve,
        valve,
        registry,
        Arc::clone(&timer),
        Arc::clone(&store),
    );

    // Drive the hardware to a known-closed state before accepting commands.
    if config.valve.actuator.is_configured() {
        if let Err(err) = controller.close().await {
            error!(%err, "initial close failed");
        }
    }

    info!(actuator = %config.valve.actuator, "valvehubd ready, type 'help' for commands");
    run(controller, &store, events_rx).await;
    Ok(())
}

/// Serial event loop: every controller entry point is invoked from here,
/// one at a time.
async fn run(
    mut controller: Controller,
    store: &InMemoryStateStore,
    mut events: mpsc::UnboundedReceiver<HostEvent>,
) {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_line(&mut controller, store, &line).await {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    error!(%err, "failed to read operator input");
                    break;
                }
            },
            event = events.recv() => match event {
                Some(event) => handle_host_event(&mut controller, event).await,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }
}

/// Returns false when the operator asked to quit.
async fn handle_line(controller: &mut Controller, store: &InMemoryStateStore, line: &str) -> bool {
    match console::parse(line) {
        Ok(ConsoleInput::Command(command)) => {
            if let Err(err) = controller.handle_command(command).await {
                // A refused request blocks that request only.
                println!("request failed: {err}");
            }
            true
        }
        Ok(ConsoleInput::Status) => {
            print_status(controller, store);
            true
        }
        Ok(ConsoleInput::Help) => {
            println!("{}", console::HELP);
            true
        }
        Ok(ConsoleInput::Quit) => false,
        Err(message) => {
            if !message.is_empty() {
                println!("{message}");
            }
            true
        }
    }
}

async fn handle_host_event(controller: &mut Controller, event: HostEvent) {
    match event {
        HostEvent::CloseTimerElapsed => {
            if let Err(err) = controller.on_close_timer_fired().await {
                error!(%err, "auto-close failed");
            }
        }
        HostEvent::ActuatorStateChanged { reported, changed } => {
            controller.on_actuator_state_changed(reported, changed);
        }
    }
}

fn print_status(controller: &Controller, store: &InMemoryStateStore) {
    println!(
        "valve: {}  cycle time: {} s",
        if controller.is_open() { "open" } else { "closed" },
        controller.cycle_time(),
    );
    for field in [
        ObservedField::ValveOpen,
        ObservedField::ValveState,
        ObservedField::CycleTime,
        ObservedField::EmergencyStop,
        ObservedField::TimerInfo,
    ] {
        if let Some(value) = store.get(field) {
            println!("  {field}: {value}");
        }
    }
}
