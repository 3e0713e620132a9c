use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid syntax for location {position}")]
    InvalidLocationSyntax { position: usize },
    #[error("invalid TSPLIB input: {0}")]
    InvalidTsplibHeader(String),
    #[error("at least two locations required")]
    EmptyProblem,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn tsplib_header(message: impl Into<String>) -> Self {
        Self::InvalidTsplibHeader(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
