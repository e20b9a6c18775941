use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeleopError {
    #[error("key listener already consumed, replace it before starting again")]
    ListenerConsumed,

    #[error("teleoperation session already active")]
    AlreadyActive,

    #[error("parse error: {msg}")]
    ParseError { msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TeleopError>;
