//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `bids_tasks_core::api` instead of reaching into internal modules.

pub use crate::bids::{
    parse_bids_name, BidsFile, BidsLayout, DatasetDescription, DatasetLayout, EntityFilter,
    EntityParser, LayoutOptions, NameParser, ParsedName, Query, QueryFilter, ReturnType,
};
pub use crate::config::{
    load_default, load_from_path, AppConfig, DataReaderConfig, FileInfoConfig, LayoutConfig,
    LoggingConfig, OutputEntities, OutputEntity, OutputQueries, OutputQuery,
};
pub use crate::error::{CliError, ErrorCode, LayoutError, ParseError, TaskError};
pub use crate::task::{
    BidsDataReader, BidsFileInfo, FieldSpec, FieldType, FileInfo, QueryResults, Record, SpecInfo,
    Task, Value, STANDARD_OUTPUTS,
};
