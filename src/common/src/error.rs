use std::{io, result};

pub type SnmpCfgResult<T, E = SnmpCfgError> = result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SnmpCfgError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    JsonErr(#[from] serde_json::Error),
    #[error("filter: {0}")]
    Regex(#[from] regex::Error),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Common(String),
}

impl SnmpCfgError {
    /// Status code of a non-2xx answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            SnmpCfgError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
