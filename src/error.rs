//! Error types.
//!
//! [`Error`] covers environment and resource failures (terminal setup, theme
//! files, the input stream). [`TreeError`] covers structural misuse of the
//! control tree; the public tree-mutation API treats it as fatal.

use std::io;
use std::path::PathBuf;

use crate::control::ControlId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Environment and resource errors surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal initialization failed: {0}")]
    TerminalInit(#[source] io::Error),
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to read theme file {path}: {source}")]
    ThemeRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid theme file {path}: {source}")]
    ThemeParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("unrecoverable input error: {0}")]
    Input(String),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// Structural violations of the control tree invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("control {child:?} is already a child of {parent:?}")]
    DuplicateChild { parent: ControlId, child: ControlId },
    #[error("control {child:?} is already attached to {current:?}")]
    AlreadyAttached { child: ControlId, current: ControlId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: ControlId, child: ControlId },
    #[error("window root {0:?} cannot become a child control")]
    WindowRoot(ControlId),
    #[error("control {0:?} does not exist")]
    Missing(ControlId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn theme_read_names_path() {
        let err = Error::ThemeRead {
            path: PathBuf::from("/tmp/x.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/tmp/x.toml"));
    }
}
