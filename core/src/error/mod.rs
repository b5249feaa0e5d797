#[allow(clippy::module_inception)]
pub mod error;
pub mod layout;
pub mod parse;
pub mod task;

pub use error::CliError;
pub use layout::LayoutError;
pub use parse::ParseError;
pub use task::{ErrorCode, TaskError};
