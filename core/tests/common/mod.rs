#![allow(dead_code)]

use std::path::Path;

use tempfile::TempDir;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("bids_tasks_core=debug")
        .with_test_writer()
        .try_init();
}

pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("create fixture dirs");
    std::fs::write(path, b"").expect("write fixture file");
}

/// Two subjects, one with sessions, plus files no default query should match.
pub fn sample_dataset() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dataset");
    let root = dir.path();
    std::fs::write(
        root.join("dataset_description.json"),
        r#"{"Name": "sample", "BIDSVersion": "1.9.0"}"#,
    )
    .expect("write description");
    for rel in [
        "participants.tsv",
        "sub-01/anat/sub-01_T1w.nii.gz",
        "sub-01/anat/sub-01_T1w.json",
        "sub-01/func/sub-01_task-rest_bold.nii.gz",
        "sub-01/func/sub-01_task-rest_events.tsv",
        "sub-02/ses-M00/anat/sub-02_ses-M00_T1w.nii",
        "sub-02/ses-M00/func/sub-02_ses-M00_task-rest_run-1_bold.nii.gz",
        "sub-02/ses-M00/func/sub-02_ses-M00_task-rest_run-2_bold.nii.gz",
        "sub-02/ses-M12/anat/sub-02_ses-M12_T1w.nii.gz",
        "sub-02/ses-M12/pet/sub-02_ses-M12_trc-18FFDG_pet.nii.gz",
        "derivatives/fmriprep/sub-01/anat/sub-01_desc-preproc_T1w.nii.gz",
    ] {
        touch(root, rel);
    }
    dir
}
