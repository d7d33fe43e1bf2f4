/// Errors that end the session.
///
/// Gameplay operations are total and never fail; only terminal I/O,
/// logging setup and session assembly can.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot create log directory {}: {source}", .path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session assembled without a {0} state holder")]
    MissingState(&'static str),
}

pub type Result<T> = std::result::Result<T, GameError>;
