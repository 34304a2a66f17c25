//! Player commands and the line-based keymap used by the terminal frontend.

use std::fmt;

use twenty48_core::Direction;

/// A player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Slide the tiles.
    Move(Direction),
    /// Throw the current game away and start over.
    NewGame,
    /// Show or hide the debug controls.
    ToggleDebug,
    /// Debug: jump to a won board.
    ForceWin,
    /// Debug: jump to a lost board.
    ForceLoss,
    /// Save and leave.
    Quit,
}

impl Command {
    /// Returns true for the debug-only commands.
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::ForceWin | Self::ForceLoss)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {direction}"),
            Self::NewGame => f.write_str("new game"),
            Self::ToggleDebug => f.write_str("toggle debug"),
            Self::ForceWin => f.write_str("force win"),
            Self::ForceLoss => f.write_str("force loss"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Parses one line of input.
///
/// Directions accept `w/a/s/d`, `h/j/k/l` and arrow key names. Anything
/// unrecognised yields `None` and is meant to be ignored.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.to_ascii_lowercase().as_str() {
        "n" | "new" => Some(Command::NewGame),
        "debug" | "ctrl+shift+d" => Some(Command::ToggleDebug),
        "win" => Some(Command::ForceWin),
        "lose" | "loss" => Some(Command::ForceLoss),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => Direction::from_key(line).map(Command::Move),
    }
}
