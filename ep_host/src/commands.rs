use eagler_portal::browser::Key;
use std::fmt;

/// A command typed at the host prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// List catalog versions
    Versions,
    /// Select a version by id
    Select(String),
    /// Launch the selected version
    Launch,
    /// Press the in-view fullscreen toggle
    Toggle,
    /// Press a key inside the page
    Key(Key),
    /// Fullscreen changed outside the controller (F11 / platform control)
    External(bool),
    /// The embed finished loading
    Load,
    /// Print controller state
    Status,
    /// Flip the colour theme
    Theme,
    /// Toggle the navigation menu
    Menu,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Select command missing a version id.
    SelectMissingVersion,
    /// Key command missing a key name.
    KeyMissingName,
    /// External command needs `on` or `off`.
    InvalidExternalState(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectMissingVersion => {
                write!(f, "Select requires a version id (e.g., 'select 1.8.8')")
            }
            Self::KeyMissingName => write!(f, "Key requires a key name (e.g., 'key Escape')"),
            Self::InvalidExternalState(value) => write!(
                f,
                "Invalid fullscreen state '{}'. Use 'external on' or 'external off'",
                value
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
COMMANDS:
  versions             List available versions
  select ID            Select a version before launching
  launch               Launch the selected version
  toggle               Press the in-view fullscreen button
  esc                  Press Escape inside the page
  key NAME             Press any key inside the page
  external on|off      Simulate F11 / the browser's own fullscreen control
  load                 Finish loading the embedded game
  status               Show controller state
  theme                Toggle light/dark theme
  menu                 Toggle the navigation menu
  help                 Show this help
  quit                 Unmount the view and exit
";

/// Parse a command string into a HostCommand.
///
/// # Examples
///
/// ```
/// use ep_host::commands::{parse_command, HostCommand};
///
/// assert_eq!(parse_command("launch"), Ok(HostCommand::Launch));
/// assert_eq!(
///     parse_command("select 1.8.8"),
///     Ok(HostCommand::Select("1.8.8".to_string()))
/// );
/// ```
pub fn parse_command(input: &str) -> Result<HostCommand, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "versions" => return Ok(HostCommand::Versions),
        "launch" | "play" => return Ok(HostCommand::Launch),
        "toggle" | "fullscreen" => return Ok(HostCommand::Toggle),
        "esc" | "escape" => return Ok(HostCommand::Key(Key::Escape)),
        "load" => return Ok(HostCommand::Load),
        "status" => return Ok(HostCommand::Status),
        "theme" => return Ok(HostCommand::Theme),
        "menu" => return Ok(HostCommand::Menu),
        "help" | "?" => return Ok(HostCommand::Help),
        "quit" | "exit" => return Ok(HostCommand::Quit),
        _ => {}
    }

    // Parse multi-word commands
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"select") => parts
            .get(1)
            .map(|id| HostCommand::Select(id.to_string()))
            .ok_or(ParseError::SelectMissingVersion),
        Some(&"key") => parts
            .get(1)
            .map(|name| HostCommand::Key(Key::from_name(name)))
            .ok_or(ParseError::KeyMissingName),
        Some(&"external") => parse_external_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse an external fullscreen command: "external on|off"
fn parse_external_command(parts: &[&str]) -> Result<HostCommand, ParseError> {
    match parts.get(1) {
        Some(&"on") => Ok(HostCommand::External(true)),
        Some(&"off") => Ok(HostCommand::External(false)),
        Some(other) => Err(ParseError::InvalidExternalState(other.to_string())),
        None => Err(ParseError::InvalidExternalState(String::new())),
    }
}
