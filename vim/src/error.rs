use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid register name {0:?}")]
    InvalidRegister(char),
    #[error("invalid mark name {0:?}")]
    InvalidMark(char),
}

pub type Result<T> = std::result::Result<T, Error>;
