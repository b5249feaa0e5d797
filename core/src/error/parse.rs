use thiserror::Error;

/// Failures decomposing a filename into BIDS entities, suffix and extension.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty file name")]
    EmptyName,

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("invalid entity '{token}' in '{name}'")]
    InvalidEntity { name: String, token: String },

    #[error("duplicate entity '{key}' in '{name}'")]
    DuplicateEntity { name: String, key: String },

    #[error("missing or invalid suffix in '{0}'")]
    MissingSuffix(String),
}
