//! Dataset indexing: walk a BIDS root once, keep every file whose name
//! decomposes, and answer entity/suffix/extension lookups from the index.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use super::entities::{SESSION, SUBJECT};
use super::name::parse_bids_name;
use super::query::{Query, ReturnType};
use crate::config::LayoutConfig;
use crate::error::LayoutError;

pub const DESCRIPTION_FILE: &str = "dataset_description.json";

/// One indexed dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsFile {
    /// Absolute path (under the canonicalized root).
    pub path: PathBuf,
    /// Path relative to the dataset root, `/`-separated.
    pub relative_path: String,
    pub entities: BTreeMap<String, String>,
    pub suffix: String,
    pub extension: String,
}

impl BidsFile {
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

/// Contents of `dataset_description.json` that the layout reports on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescription {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "BIDSVersion", default)]
    pub bids_version: Option<String>,
    #[serde(rename = "DatasetType", default)]
    pub dataset_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Top-level directories left out of the index.
    pub ignore_dirs: Vec<String>,
    /// Fail when `dataset_description.json` is missing.
    pub require_description: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for LayoutOptions {
    fn from(cfg: &LayoutConfig) -> Self {
        Self {
            ignore_dirs: cfg.ignore_dirs.clone(),
            require_description: cfg.require_description,
        }
    }
}

/// File lookup over an opened dataset, as consumed by the data reader task.
pub trait DatasetLayout {
    /// Matching files, ordered by relative path.
    fn get(&self, query: &Query) -> Vec<&BidsFile>;

    fn get_files(&self, query: &Query, return_type: ReturnType) -> Vec<String> {
        self.get(query)
            .into_iter()
            .map(|file| match return_type {
                ReturnType::Files => file.relative_path.clone(),
                ReturnType::AbsoluteFiles => file.path.to_string_lossy().into_owned(),
            })
            .collect()
    }
}

/// In-memory index of a BIDS dataset.
#[derive(Debug, Clone)]
pub struct BidsLayout {
    root: PathBuf,
    description: Option<DatasetDescription>,
    files: Vec<BidsFile>,
}

impl BidsLayout {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, LayoutError> {
        Self::with_options(root, &LayoutOptions::default())
    }

    pub fn with_options(
        root: impl AsRef<Path>,
        options: &LayoutOptions,
    ) -> Result<Self, LayoutError> {
        let root = root.as_ref();
        let meta = std::fs::metadata(root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LayoutError::RootNotFound(root.to_path_buf())
            } else {
                LayoutError::Io {
                    path: root.to_path_buf(),
                    source: e,
                }
            }
        })?;
        if !meta.is_dir() {
            return Err(LayoutError::NotADirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|e| LayoutError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;

        let description = read_description(&root)?;
        if description.is_none() && options.require_description {
            return Err(LayoutError::MissingDescription(root));
        }

        // Links are indexed by name, never followed.
        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e, &options.ignore_dirs));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(LayoutError::Walk(e)),
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let file_type = entry.file_type();
            if !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }
            let parsed = match parse_bids_name(entry.path()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), "skipping file: {e}");
                    continue;
                }
            };
            files.push(BidsFile {
                path: entry.path().to_path_buf(),
                relative_path: relative_path(&root, entry.path()),
                entities: parsed.entities,
                suffix: parsed.suffix,
                extension: parsed.extension,
            });
        }
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        tracing::info!(
            root = %root.display(),
            files = files.len(),
            "indexed BIDS dataset"
        );

        Ok(Self {
            root,
            description,
            files,
        })
    }

    /// Canonicalized dataset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn description(&self) -> Option<&DatasetDescription> {
        self.description.as_ref()
    }

    pub fn files(&self) -> &[BidsFile] {
        &self.files
    }

    pub fn subjects(&self) -> BTreeSet<&str> {
        self.labels(SUBJECT)
    }

    pub fn sessions(&self) -> BTreeSet<&str> {
        self.labels(SESSION)
    }

    fn labels(&self, key: &str) -> BTreeSet<&str> {
        self.files.iter().filter_map(|f| f.entity(key)).collect()
    }
}

impl DatasetLayout for BidsLayout {
    fn get(&self, query: &Query) -> Vec<&BidsFile> {
        self.files.iter().filter(|f| query.matches(f)).collect()
    }
}

fn read_description(root: &Path) -> Result<Option<DatasetDescription>, LayoutError> {
    let path = root.join(DESCRIPTION_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| LayoutError::Io {
        path: path.clone(),
        source: e,
    })?;
    let description =
        serde_json::from_str(&text).map_err(|e| LayoutError::Description { path, source: e })?;
    Ok(Some(description))
}

fn is_skipped(entry: &DirEntry, ignore_dirs: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.depth() == 1 && ignore_dirs.iter().any(|d| d.as_str() == name)
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BidsLayout::new(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LayoutError::RootNotFound(_)));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sub-01_T1w.nii");
        let err = BidsLayout::new(dir.path().join("sub-01_T1w.nii")).unwrap_err();
        assert!(matches!(err, LayoutError::NotADirectory(_)));
    }

    #[test]
    fn skips_hidden_ignored_and_unparseable() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sub-01/anat/sub-01_T1w.nii.gz");
        touch(dir.path(), ".git/sub-01_T1w.nii.gz");
        touch(dir.path(), "derivatives/x/sub-01/anat/sub-01_T1w.nii.gz");
        touch(dir.path(), "sub-01/anat/.sub-01_T1w.nii.gz");
        touch(dir.path(), "README");
        touch(dir.path(), "CHANGES_v1.txt");

        let layout = BidsLayout::new(dir.path()).unwrap();
        let rels: Vec<&str> = layout
            .files()
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(rels, vec!["README", "sub-01/anat/sub-01_T1w.nii.gz"]);
    }

    #[test]
    fn reads_description_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DESCRIPTION_FILE),
            r#"{"Name": "demo", "BIDSVersion": "1.9.0", "Authors": ["a"]}"#,
        )
        .unwrap();
        touch(dir.path(), "sub-02/ses-b/anat/sub-02_ses-b_T1w.nii");
        touch(dir.path(), "sub-01/ses-a/anat/sub-01_ses-a_T1w.nii");

        let layout = BidsLayout::new(dir.path()).unwrap();
        let desc = layout.description().unwrap();
        assert_eq!(desc.name.as_deref(), Some("demo"));
        assert_eq!(desc.bids_version.as_deref(), Some("1.9.0"));
        assert!(desc.extra.contains_key("Authors"));
        assert_eq!(layout.subjects().into_iter().collect::<Vec<_>>(), ["01", "02"]);
        assert_eq!(layout.sessions().into_iter().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn malformed_description_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DESCRIPTION_FILE), "{not json").unwrap();
        let err = BidsLayout::new(dir.path()).unwrap_err();
        assert!(matches!(err, LayoutError::Description { .. }));
    }

    #[test]
    fn strict_mode_requires_description() {
        let dir = tempfile::tempdir().unwrap();
        let options = LayoutOptions {
            require_description: true,
            ..LayoutOptions::default()
        };
        let err = BidsLayout::with_options(dir.path(), &options).unwrap_err();
        assert!(matches!(err, LayoutError::MissingDescription(_)));
    }

    #[test]
    fn absolute_return_type() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sub-01/anat/sub-01_T1w.nii");
        let layout = BidsLayout::new(dir.path()).unwrap();
        let query = Query::new().suffix("T1w");

        let files = layout.get_files(&query, ReturnType::AbsoluteFiles);
        assert_eq!(files.len(), 1);
        assert!(Path::new(&files[0]).is_absolute());
        assert!(Path::new(&files[0]).starts_with(layout.root()));
        assert!(files[0].ends_with("sub-01_T1w.nii"));
    }
}
