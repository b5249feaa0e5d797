use std::path::PathBuf;

use bids_tasks_cli::commands::cli::{Args, Commands, OutputFormat, TaskKind};
use clap::Parser;

#[test]
fn parses_file_info_with_entities() {
    let args = Args::try_parse_from([
        "bids-tasks",
        "file-info",
        "sub-01_trc-FDG_pet.nii.gz",
        "sub-02_T1w.nii",
        "--entity",
        "tracer=trc",
        "--format",
        "text",
    ])
    .unwrap();

    assert_eq!(args.format, OutputFormat::Text);
    let Commands::FileInfo(file_args) = args.command else {
        panic!("expected file-info");
    };
    assert_eq!(file_args.files.len(), 2);
    assert_eq!(file_args.entity_args.entities, ["tracer=trc"]);
}

#[test]
fn parses_read_with_queries() {
    let args = Args::try_parse_from([
        "bids-tasks",
        "--config",
        "custom.toml",
        "read",
        "/data/ds",
        "--query",
        "T1w=T1w:nii,nii.gz",
        "--query",
        "pet=pet",
        "--absolute",
    ])
    .unwrap();

    assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(args.format, OutputFormat::Json);
    let Commands::Read(read_args) = args.command else {
        panic!("expected read");
    };
    assert_eq!(read_args.dataset, PathBuf::from("/data/ds"));
    assert_eq!(read_args.query_args.queries.len(), 2);
    assert!(read_args.absolute);
}

#[test]
fn parses_spec() {
    let args = Args::try_parse_from(["bids-tasks", "spec", "file-info"]).unwrap();
    let Commands::Spec(spec_args) = args.command else {
        panic!("expected spec");
    };
    assert_eq!(spec_args.task, TaskKind::FileInfo);
}

#[test]
fn file_info_requires_a_file() {
    assert!(Args::try_parse_from(["bids-tasks", "file-info"]).is_err());
}
