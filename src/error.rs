/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error in storage engine.
    Storage(fjall::Error),

    /// The upstream sensor API could not be reached, timed out or
    /// answered with a non-success status.
    Upstream(reqwest::Error),

    /// Invalid or missing environment configuration.
    Config(envconfig::Error),

    /// A day selector that is not one of the seven weekday names.
    InvalidWeekday(String),

    /// A history entry already exists for the resolved timestamp.
    DuplicateTimestamp(String),
}

impl From<fjall::Error> for Error {
    fn from(value: fjall::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Upstream(value)
    }
}

impl From<envconfig::Error> for Error {
    fn from(value: envconfig::Error) -> Self {
        Self::Config(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => {
                write!(f, "{e}",)
            }
            Self::Io(e) => {
                write!(f, "{e}",)
            }
            Self::Upstream(e) => {
                write!(f, "{e}",)
            }
            Self::Config(e) => {
                write!(f, "{e}",)
            }
            Self::InvalidWeekday(name) => {
                write!(f, "InvalidWeekday({name})",)
            }
            Self::DuplicateTimestamp(key) => {
                write!(f, "DuplicateTimestamp({key})",)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;
