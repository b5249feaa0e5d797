use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    FileInfo,
    Read,
}

#[derive(Parser, Debug)]
#[command(name = "bids-tasks", version, about = "BIDS filename and dataset tasks")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file; defaults to ~/.bids-tasks/config.toml, then ./bids-tasks.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,
}

/// Extra outputs for file-info, as NAME=ENTITY (e.g. tracer=trc).
/// Replaces `[[file_info.output_entities]]` from the config when given.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct EntityArgs {
    #[arg(long = "entity", value_name = "NAME=ENTITY", action = clap::ArgAction::Append)]
    pub entities: Vec<String>,
}

/// Named queries for read, as NAME=SUFFIX[:EXT[,EXT...]] (e.g. T1w=T1w:nii,nii.gz).
/// Replaces `[[data_reader.output_query]]` from the config when given.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct QueryArgs {
    #[arg(long = "query", value_name = "NAME=SUFFIX:EXTS", action = clap::ArgAction::Append)]
    pub queries: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FileInfoArgs {
    /// BIDS files to decompose, processed in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub entity_args: EntityArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReadArgs {
    pub dataset: PathBuf,

    #[command(flatten)]
    pub query_args: QueryArgs,

    /// Report absolute paths instead of dataset-relative ones.
    #[arg(long)]
    pub absolute: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SpecArgs {
    #[arg(value_enum)]
    pub task: TaskKind,

    #[command(flatten)]
    pub entity_args: EntityArgs,

    #[command(flatten)]
    pub query_args: QueryArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decompose BIDS filenames into ids, entities, suffix and extension.
    FileInfo(FileInfoArgs),
    /// Query a BIDS dataset for files grouped by named query.
    Read(ReadArgs),
    /// Print a task's input/output schemas.
    Spec(SpecArgs),
}
