//! Command handlers: merge CLI overrides into the config, build the task,
//! and write its results.
use std::io::Write;

use bids_tasks_core::api::{
    AppConfig, BidsDataReader, BidsFileInfo, CliError, FileInfo, LayoutOptions, ReturnType,
    SpecInfo, Task, TaskError,
};
use serde::Serialize;

use crate::commands::cli::{
    EntityArgs, FileInfoArgs, OutputFormat, QueryArgs, ReadArgs, SpecArgs, TaskKind,
};
use crate::utils::{parse_entity_args, parse_query_args};

/// Names from the config file are reported as config errors, names from
/// flags as task errors.
fn config_error(section: &str) -> impl Fn(TaskError) -> CliError + '_ {
    move |e| CliError::Config(format!("[{section}]: {e}"))
}

pub fn build_file_info(cfg: &AppConfig, args: &EntityArgs) -> Result<BidsFileInfo, CliError> {
    if args.entities.is_empty() {
        return BidsFileInfo::new(cfg.file_info.output_entities.clone())
            .map_err(config_error("file_info"));
    }
    Ok(BidsFileInfo::new(parse_entity_args(&args.entities)?)?)
}

pub fn build_data_reader(
    cfg: &AppConfig,
    args: &QueryArgs,
    absolute: bool,
) -> Result<BidsDataReader, CliError> {
    let reader = if args.queries.is_empty() {
        BidsDataReader::new(cfg.data_reader.output_query.clone())
            .map_err(config_error("data_reader"))?
    } else {
        BidsDataReader::new(parse_query_args(&args.queries)?)?
    };
    let return_type = if absolute {
        ReturnType::AbsoluteFiles
    } else {
        cfg.data_reader.return_type
    };
    Ok(reader
        .with_layout_options(LayoutOptions::from(&cfg.layout))
        .with_return_type(return_type))
}

#[tracing::instrument(name = "cli.file_info", skip_all, fields(files = args.files.len()))]
pub fn run_file_info(
    cfg: &AppConfig,
    args: &FileInfoArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<i32, CliError> {
    let task = build_file_info(cfg, &args.entity_args)?;
    for file in &args.files {
        let info = task.call(file)?;
        tracing::debug!(file = %file.display(), suffix = %info.suffix, "decomposed");
        match format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&info.into_record()).map_err(anyhow::Error::from)?;
                writeln!(out, "{line}")?;
            }
            OutputFormat::Text => write_file_info_text(out, &file.to_string_lossy(), &info)?,
        }
    }
    Ok(0)
}

fn write_file_info_text(out: &mut impl Write, file: &str, info: &FileInfo) -> std::io::Result<()> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let mut cols = vec![
        file.to_string(),
        opt(&info.participant_id),
        opt(&info.session_id),
        info.suffix.clone(),
        info.extension.clone(),
    ];
    cols.extend(info.extra.iter().map(|(name, v)| format!("{name}={}", opt(v))));
    writeln!(out, "{}", cols.join("\t"))
}

#[tracing::instrument(name = "cli.read", skip_all, fields(dataset = %args.dataset.display()))]
pub fn run_read(
    cfg: &AppConfig,
    args: &ReadArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<i32, CliError> {
    let reader = build_data_reader(cfg, &args.query_args, args.absolute)?;
    let results = reader.call(&args.dataset)?;
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results).map_err(anyhow::Error::from)?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            for (name, files) in results.iter() {
                if files.is_empty() {
                    writeln!(out, "{name}\t")?;
                }
                for file in files {
                    writeln!(out, "{name}\t{file}")?;
                }
            }
        }
    }
    Ok(0)
}

#[derive(Serialize)]
struct TaskSpecs<'a> {
    name: &'a str,
    input_spec: &'a SpecInfo,
    output_spec: &'a SpecInfo,
}

/// Task schemas are only written as JSON.
pub fn run_spec(
    cfg: &AppConfig,
    args: &SpecArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<i32, CliError> {
    if format != OutputFormat::Json {
        return Err(CliError::Command(
            "spec output is JSON only; drop --format text".to_string(),
        ));
    }
    let task: Box<dyn Task> = match args.task {
        TaskKind::FileInfo => Box::new(build_file_info(cfg, &args.entity_args)?),
        TaskKind::Read => Box::new(build_data_reader(cfg, &args.query_args, false)?),
    };
    let specs = TaskSpecs {
        name: task.name(),
        input_spec: task.input_spec(),
        output_spec: task.output_spec(),
    };
    let json = serde_json::to_string_pretty(&specs).map_err(anyhow::Error::from)?;
    writeln!(out, "{json}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file_info_args(files: &[&str], entities: &[&str]) -> FileInfoArgs {
        FileInfoArgs {
            files: files.iter().map(PathBuf::from).collect(),
            entity_args: EntityArgs {
                entities: entities.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn file_info_json_lines() {
        let mut out: Vec<u8> = Vec::new();
        let args = file_info_args(
            &["sub-P01_trc-18FFDG_pet.nii.gz", "sub-P02_ses-M00_T1w.nii"],
            &["tracer=trc"],
        );
        run_file_info(&AppConfig::default(), &args, OutputFormat::Json, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tracer"], "18FFDG");
        assert_eq!(lines[1]["session_id"], "ses-M00");
        assert!(lines[1]["tracer"].is_null());
    }

    #[test]
    fn file_info_text_row() {
        let mut out: Vec<u8> = Vec::new();
        let args = file_info_args(&["sub-01_T1w.nii.gz"], &["run=run"]);
        run_file_info(&AppConfig::default(), &args, OutputFormat::Text, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "sub-01_T1w.nii.gz\tsub-01\t-\tT1w\t.nii.gz\trun=-\n"
        );
    }

    #[test]
    fn config_entities_used_without_flags() {
        let mut cfg = AppConfig::default();
        cfg.file_info.output_entities =
            bids_tasks_core::api::OutputEntities::new().with("tracer", "trc");
        let task = build_file_info(&cfg, &EntityArgs::default()).unwrap();
        assert_eq!(task.output_spec().fields.len(), 6);
    }

    #[test]
    fn bad_file_fails_with_parse_exit_code() {
        let mut out: Vec<u8> = Vec::new();
        let args = file_info_args(&["not_a-bids_file.txt"], &[]);
        let err =
            run_file_info(&AppConfig::default(), &args, OutputFormat::Json, &mut out).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn spec_lists_configured_queries() {
        let mut out: Vec<u8> = Vec::new();
        let args = SpecArgs {
            task: TaskKind::Read,
            entity_args: EntityArgs::default(),
            query_args: QueryArgs {
                queries: vec!["pet=pet:nii.gz".to_string()],
            },
        };
        run_spec(&AppConfig::default(), &args, OutputFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["name"], "BIDSDataReader");
        assert_eq!(json["input_spec"]["fields"][0]["name"], "dataset_path");
        assert_eq!(json["output_spec"]["fields"][0]["name"], "pet");
        assert_eq!(json["output_spec"]["fields"][0]["type"], "file_list");
    }

    #[test]
    fn spec_rejects_text_format() {
        let args = SpecArgs {
            task: TaskKind::FileInfo,
            entity_args: EntityArgs::default(),
            query_args: QueryArgs::default(),
        };
        let err = run_spec(
            &AppConfig::default(),
            &args,
            OutputFormat::Text,
            &mut Vec::<u8>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Command(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_config_names_exit_with_config_code() {
        let mut cfg = AppConfig::default();
        cfg.file_info.output_entities =
            bids_tasks_core::api::OutputEntities::new().with("my-tracer", "trc");
        let err = build_file_info(&cfg, &EntityArgs::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 11);

        let mut cfg = AppConfig::default();
        cfg.data_reader.output_query = bids_tasks_core::api::OutputQueries::empty()
            .with("T1w map", bids_tasks_core::api::QueryFilter::new("T1map", ["nii"]));
        let err = build_data_reader(&cfg, &QueryArgs::default(), false).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn bad_flag_names_exit_with_argument_code() {
        let args = EntityArgs {
            entities: vec!["suffix=acq".to_string()],
        };
        let err = build_file_info(&AppConfig::default(), &args).unwrap_err();
        assert!(matches!(err, CliError::Task(TaskError::ReservedField(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn read_text_keeps_empty_queries() {
        let dir = tempfile::tempdir().unwrap();
        let anat = dir.path().join("sub-01/anat");
        std::fs::create_dir_all(&anat).unwrap();
        std::fs::write(anat.join("sub-01_T1w.nii.gz"), b"").unwrap();
        let args = ReadArgs {
            dataset: dir.path().to_path_buf(),
            query_args: QueryArgs::default(),
            absolute: false,
        };
        let mut out: Vec<u8> = Vec::new();
        run_read(&AppConfig::default(), &args, OutputFormat::Text, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "T1w\tsub-01/anat/sub-01_T1w.nii.gz\nbold\t\n"
        );
    }

    #[test]
    fn read_missing_dataset_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = ReadArgs {
            dataset: dir.path().join("missing"),
            query_args: QueryArgs::default(),
            absolute: false,
        };
        let err = run_read(&AppConfig::default(), &args, OutputFormat::Json, &mut Vec::<u8>::new())
            .unwrap_err();
        assert_eq!(err.exit_code(), 20);
    }
}
