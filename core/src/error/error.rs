use thiserror::Error;

use super::{ErrorCode, LayoutError, ParseError, TaskError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("task failed: {0}")]
    Task(#[from] TaskError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        Self::Task(TaskError::Parse(err))
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        Self::Task(TaskError::Layout(err))
    }
}

impl CliError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Task(e) => e.error_code(),
            Self::Command(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Anyhow(_) => ErrorCode::GeneralError,
        }
    }

    /// Process exit code for the `bids-tasks` binary.
    ///
    /// 2: bad arguments or unparseable filename, 11: config, 20: dataset/io,
    /// 50: internal/uncategorized.
    pub fn exit_code(&self) -> i32 {
        match self.error_code() {
            ErrorCode::Success => 0,
            ErrorCode::ConfigError => 11,
            ErrorCode::ParseError
            | ErrorCode::InvalidArgument
            | ErrorCode::ValidationError
            | ErrorCode::MissingInput => 2,
            ErrorCode::DatasetNotFound | ErrorCode::IoError | ErrorCode::DescriptionError => 20,
            ErrorCode::OutputMismatch | ErrorCode::GeneralError => 50,
        }
    }
}
