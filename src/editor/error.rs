use std::fmt;

/// Why a menu command did not run. Never surfaced to the user; the editor
/// turns every variant into a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    InvalidTarget(String),
    UnknownCommand(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidTarget(reason) => write!(f, "invalid target: {}", reason),
            CommandError::UnknownCommand(path) => {
                write!(f, "no menu item registered at \"{}\"", path)
            }
        }
    }
}

impl std::error::Error for CommandError {}
