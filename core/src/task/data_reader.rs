//! Dataset reader task: index a BIDS root and run the configured named
//! queries across all subjects and sessions.

use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::spec::{validate_field_names, FieldSpec, FieldType, SpecInfo};
use super::value::{Record, Value};
use super::Task;
use crate::bids::{BidsLayout, DatasetLayout, LayoutOptions, ReturnType};
use crate::config::OutputQueries;
use crate::error::{LayoutError, TaskError};

pub const TASK_NAME: &str = "BIDSDataReader";
pub const INPUT_FIELD: &str = "dataset_path";

/// Query name -> matching file paths, in declared query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults(Vec<(String, Vec<String>)>);

impl QueryResults {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, files)| files.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(n, f)| (n.as_str(), f.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_record(self) -> Record {
        self.0
            .into_iter()
            .map(|(name, files)| (name, Value::Files(files)))
            .collect()
    }
}

impl Serialize for QueryResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, files) in &self.0 {
            map.serialize_entry(name, files)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct BidsDataReader {
    output_query: OutputQueries,
    layout_options: LayoutOptions,
    return_type: ReturnType,
    input_spec: SpecInfo,
    output_spec: SpecInfo,
}

impl Default for BidsDataReader {
    fn default() -> Self {
        Self::build(OutputQueries::default())
    }
}

impl BidsDataReader {
    pub fn new(output_query: OutputQueries) -> Result<Self, TaskError> {
        validate_field_names(
            "BIDSDataReaderOutput",
            output_query.iter().map(|q| q.name.as_str()),
            &[],
        )?;
        Ok(Self::build(output_query))
    }

    fn build(output_query: OutputQueries) -> Self {
        let input_spec = SpecInfo::new(
            "BIDSDataReaderInput",
            vec![FieldSpec::new(INPUT_FIELD, FieldType::Path)],
        );
        let output_spec = SpecInfo::new(
            "BIDSDataReaderOutput",
            output_query
                .iter()
                .map(|q| FieldSpec::new(q.name.clone(), FieldType::FileList))
                .collect(),
        );
        Self {
            output_query,
            layout_options: LayoutOptions::default(),
            return_type: ReturnType::default(),
            input_spec,
            output_spec,
        }
    }

    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn output_query(&self) -> &OutputQueries {
        &self.output_query
    }

    /// Index `dataset_path` and run every configured query against it.
    pub fn call(&self, dataset_path: impl AsRef<Path>) -> Result<QueryResults, LayoutError> {
        let layout = BidsLayout::with_options(dataset_path, &self.layout_options)?;
        Ok(self.call_with_layout(&layout))
    }

    /// Run every configured query against an opened layout.
    pub fn call_with_layout(&self, layout: &dyn DatasetLayout) -> QueryResults {
        let results = self
            .output_query
            .iter()
            .map(|q| {
                let files = layout.get_files(&q.filter.to_query(), self.return_type);
                tracing::debug!(query = %q.name, matches = files.len(), "ran dataset query");
                (q.name.clone(), files)
            })
            .collect();
        QueryResults(results)
    }
}

impl Task for BidsDataReader {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn input_spec(&self) -> &SpecInfo {
        &self.input_spec
    }

    fn output_spec(&self) -> &SpecInfo {
        &self.output_spec
    }

    fn execute(&self, inputs: &Record) -> Result<Record, TaskError> {
        let path = inputs
            .get(INPUT_FIELD)
            .and_then(Value::as_path)
            .ok_or_else(|| TaskError::MissingInput {
                task: TASK_NAME.to_string(),
                field: INPUT_FIELD.to_string(),
            })?;
        Ok(self.call(path)?.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bids::{BidsFile, Query, QueryFilter};
    use std::path::PathBuf;

    struct StaticLayout(Vec<BidsFile>);

    impl DatasetLayout for StaticLayout {
        fn get(&self, query: &Query) -> Vec<&BidsFile> {
            self.0.iter().filter(|f| query.matches(f)).collect()
        }
    }

    fn bids_file(rel: &str) -> BidsFile {
        let parsed = crate::bids::parse_bids_name(rel).unwrap();
        BidsFile {
            path: PathBuf::from("/static").join(rel),
            relative_path: rel.to_string(),
            entities: parsed.entities,
            suffix: parsed.suffix,
            extension: parsed.extension,
        }
    }

    #[test]
    fn runs_queries_in_declared_order() {
        let layout = StaticLayout(vec![
            bids_file("sub-01/anat/sub-01_T1w.nii.gz"),
            bids_file("sub-01/pet/sub-01_trc-FDG_pet.nii.gz"),
        ]);
        let reader = BidsDataReader::new(
            OutputQueries::empty()
                .with("pet", QueryFilter::new("pet", ["nii.gz"]))
                .with("T1w", QueryFilter::new("T1w", ["nii.gz"]))
                .with("dwi", QueryFilter::new("dwi", ["nii.gz"])),
        )
        .unwrap();

        let results = reader.call_with_layout(&layout);
        assert_eq!(results.names().collect::<Vec<_>>(), ["pet", "T1w", "dwi"]);
        assert_eq!(
            results.get("pet").unwrap(),
            ["sub-01/pet/sub-01_trc-FDG_pet.nii.gz"]
        );
        assert_eq!(results.get("dwi").unwrap().len(), 0);

        let json = serde_json::to_string(&results).unwrap();
        assert!(json.starts_with(r#"{"pet":"#));
    }

    #[test]
    fn rejects_invalid_query_names() {
        let err = BidsDataReader::new(
            OutputQueries::empty().with("T1w map", QueryFilter::new("T1map", ["nii"])),
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::InvalidFieldName(_)));
    }

    #[test]
    fn output_spec_follows_queries() {
        let reader = BidsDataReader::default();
        let names: Vec<&str> = reader.output_spec().field_names().collect();
        assert_eq!(names, ["T1w", "bold"]);
        assert!(reader
            .output_spec()
            .fields
            .iter()
            .all(|f| f.ty == FieldType::FileList));
    }
}
