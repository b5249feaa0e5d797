use thiserror::Error;

use super::{LayoutError, ParseError};

/// Error codes shared by the task runner and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    GeneralError = 1,
    ParseError = 2,
    ValidationError = 3,
    InvalidArgument = 4,
    ConfigError = 5,
    MissingInput = 10,
    OutputMismatch = 11,
    DatasetNotFound = 60,
    IoError = 61,
    DescriptionError = 62,
}

/// Errors raised while building or running a task node.
///
/// Collaborator failures (`Parse`, `Layout`) are wrapped transparently so the
/// caller sees the parser or layout message unchanged.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("invalid field name '{0}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidFieldName(String),

    #[error("duplicate field '{field}' in {spec}")]
    DuplicateField { spec: String, field: String },

    #[error("field '{0}' is reserved for a standard output")]
    ReservedField(String),

    #[error("empty entity key for output '{0}'")]
    EmptyEntityKey(String),

    #[error("missing input '{field}' for task {task}")]
    MissingInput { task: String, field: String },

    #[error("input '{field}' expects {expected}, got {actual}")]
    InputType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("output of {task} does not match its schema: {reason}")]
    OutputMismatch { task: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl TaskError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidFieldName(_) => ErrorCode::ValidationError,
            Self::DuplicateField { .. } => ErrorCode::ValidationError,
            Self::ReservedField(_) => ErrorCode::ValidationError,
            Self::EmptyEntityKey(_) => ErrorCode::ValidationError,
            Self::MissingInput { .. } => ErrorCode::MissingInput,
            Self::InputType { .. } => ErrorCode::ValidationError,
            Self::OutputMismatch { .. } => ErrorCode::OutputMismatch,
            Self::Parse(_) => ErrorCode::ParseError,
            Self::Layout(e) => match e {
                LayoutError::RootNotFound(_) | LayoutError::NotADirectory(_) => {
                    ErrorCode::DatasetNotFound
                }
                LayoutError::MissingDescription(_) | LayoutError::Description { .. } => {
                    ErrorCode::DescriptionError
                }
                LayoutError::Walk(_) | LayoutError::Io { .. } => ErrorCode::IoError,
            },
        }
    }
}
