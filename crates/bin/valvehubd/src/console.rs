//! Operator console — line-oriented command parsing.
//!
//! Stands in for the host's action dispatch: each input line maps to one
//! typed [`ValveCommand`] or a console-local action.

use valvehub_domain::command::ValveCommand;

/// One parsed line of operator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleInput {
    /// Forward a command to the controller.
    Command(ValveCommand),
    /// Print the current observable state.
    Status,
    /// Print the command reference.
    Help,
    /// Leave the event loop.
    Quit,
}

/// Command reference printed for `help` and unknown input.
pub const HELP: &str = "\
commands:
  open              open the valve (auto-closes after the cycle time)
  close             close the valve and cancel the auto-close
  toggle on|off     open or close the valve
  cycle <seconds>   set the cycle time
  stop              emergency stop
  status            show the observable state
  help              show this reference
  quit              exit";

/// Parse a line of operator input.
///
/// # Errors
///
/// Returns a message suitable for printing back to the operator when the
/// line is not a known command.
pub fn parse(line: &str) -> Result<ConsoleInput, String> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Err(String::new());
    };
    let input = match (verb, tokens.next()) {
        ("open", None) => ConsoleInput::Command(ValveCommand::Open),
        ("close", None) => ConsoleInput::Command(ValveCommand::Close),
        ("stop", None) => ConsoleInput::Command(ValveCommand::EmergencyStop),
        ("toggle", Some("on")) => ConsoleInput::Command(ValveCommand::Toggle { open: true }),
        ("toggle", Some("off")) => ConsoleInput::Command(ValveCommand::Toggle { open: false }),
        ("cycle", Some(raw)) => {
            let seconds: f64 = raw
                .parse()
                .map_err(|_| format!("not a number: {raw:?}"))?;
            ConsoleInput::Command(ValveCommand::SetCycleTime { seconds })
        }
        ("status", None) => ConsoleInput::Status,
        ("help", None) => ConsoleInput::Help,
        ("quit" | "exit", None) => ConsoleInput::Quit,
        _ => return Err(format!("unknown command: {line:?} (try 'help')")),
    };
    if tokens.next().is_some() {
        return Err(format!("trailing input after command: {line:?}"));
    }
    Ok(input)
}
