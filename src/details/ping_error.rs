use std::{error::Error, fmt, io};

/// Everything that can go wrong while pinging.
///
/// Only `Resolution` and `Usage` are fatal; every other variant ends a single probe.
#[derive(Debug)]
pub enum PingError {
    Resolution { host: String },
    Usage(String),
    Dial(io::Error),
    Encode(String),
    Parse(String),
    Timeout,
    Io(io::Error),
}

impl PingError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PingError::Resolution { .. } | PingError::Usage(_))
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            PingError::Resolution { host } => write!(f, "ping: unknown host {host}"),
            PingError::Usage(message) => write!(f, "{message}"),
            PingError::Dial(error) => write!(f, "failed to dial destination: {error}"),
            PingError::Encode(message) => write!(f, "failed to encode echo request: {message}"),
            PingError::Parse(message) => write!(f, "failed to parse echo reply: {message}"),
            PingError::Timeout => write!(f, "request timed out"),
            PingError::Io(error) => write!(f, "i/o error: {error}"),
        }
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PingError::Dial(error) | PingError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for PingError {
    fn from(error: io::Error) -> PingError {
        PingError::Io(error)
    }
}
