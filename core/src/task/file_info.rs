//! Filename decomposer task: one BIDS path in, participant/session ids,
//! entities, suffix, extension and configured extra entities out.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::spec::{validate_field_names, FieldSpec, FieldType, SpecInfo};
use super::value::{Record, Value};
use super::Task;
use crate::bids::entities::{self, SESSION, SUBJECT};
use crate::bids::{EntityParser, NameParser};
use crate::config::{OutputEntities, OutputEntity};
use crate::error::{ParseError, TaskError};

pub const TASK_NAME: &str = "BIDSFileInfo";
pub const INPUT_FIELD: &str = "bids_file";

/// Fields every file-info result carries, before the configured extras.
pub const STANDARD_OUTPUTS: [&str; 5] = [
    "participant_id",
    "session_id",
    "entities",
    "suffix",
    "extension",
];

/// Decomposed BIDS filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub participant_id: Option<String>,
    pub session_id: Option<String>,
    #[serde(serialize_with = "entities::serialize_ordered")]
    pub entities: BTreeMap<String, String>,
    pub suffix: String,
    pub extension: String,
    /// Configured extra outputs, labelled by output name, in declared order.
    pub extra: Vec<(String, Option<String>)>,
}

impl FileInfo {
    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn into_record(self) -> Record {
        let mut record = Record::new()
            .with("participant_id", self.participant_id)
            .with("session_id", self.session_id)
            .with("entities", Value::Entities(self.entities))
            .with("suffix", self.suffix)
            .with("extension", self.extension);
        for (name, value) in self.extra {
            record.insert(name, value);
        }
        record
    }
}

#[derive(Clone)]
pub struct BidsFileInfo {
    output_entities: OutputEntities,
    parser: Arc<dyn NameParser>,
    input_spec: SpecInfo,
    output_spec: SpecInfo,
}

impl std::fmt::Debug for BidsFileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidsFileInfo")
            .field("output_entities", &self.output_entities)
            .field("output_spec", &self.output_spec)
            .finish_non_exhaustive()
    }
}

impl Default for BidsFileInfo {
    fn default() -> Self {
        Self::build(OutputEntities::default())
    }
}

impl BidsFileInfo {
    /// Validate the extra outputs and fix the output schema.
    ///
    /// Long entity names (`tracer`) are resolved to filename keys (`trc`).
    pub fn new(output_entities: OutputEntities) -> Result<Self, TaskError> {
        validate_field_names(
            "BIDSFileInfoOutput",
            output_entities.iter().map(|e| e.name.as_str()),
            &STANDARD_OUTPUTS,
        )?;
        if let Some(e) = output_entities.iter().find(|e| e.entity.trim().is_empty()) {
            return Err(TaskError::EmptyEntityKey(e.name.clone()));
        }
        let resolved = output_entities
            .iter()
            .map(|OutputEntity { name, entity }| {
                (name.clone(), entities::resolve_key(entity).to_string())
            })
            .collect();
        Ok(Self::build(resolved))
    }

    fn build(output_entities: OutputEntities) -> Self {
        let input_spec = SpecInfo::new(
            "BIDSFileInfoInput",
            vec![FieldSpec::new(INPUT_FIELD, FieldType::Path)],
        );

        let mut fields = vec![
            FieldSpec::new("participant_id", FieldType::Str),
            FieldSpec::new("session_id", FieldType::Str),
            FieldSpec::new("entities", FieldType::Entities),
            FieldSpec::new("suffix", FieldType::Str),
            FieldSpec::new("extension", FieldType::Str),
        ];
        fields.extend(
            output_entities
                .iter()
                .map(|e| FieldSpec::new(e.name.clone(), FieldType::Str)),
        );
        let output_spec = SpecInfo::new("BIDSFileInfoOutput", fields);

        Self {
            output_entities,
            parser: Arc::new(EntityParser),
            input_spec,
            output_spec,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn NameParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn output_entities(&self) -> &OutputEntities {
        &self.output_entities
    }

    /// Decompose `bids_file`. Fails only when the parser does.
    pub fn call(&self, bids_file: impl AsRef<Path>) -> Result<FileInfo, ParseError> {
        let path = bids_file.as_ref();
        let name = path
            .to_str()
            .ok_or_else(|| ParseError::NonUtf8Path(path.to_string_lossy().into_owned()))?;
        let parsed = self.parser.parse(name)?;

        let label = |key: &str| {
            parsed
                .entities
                .get(key)
                .filter(|label| !label.is_empty())
                .map(|label| format!("{key}-{label}"))
        };
        let participant_id = label(SUBJECT);
        let session_id = label(SESSION);

        let extra = self
            .output_entities
            .iter()
            .map(|e| (e.name.clone(), parsed.entities.get(&e.entity).cloned()))
            .collect();

        Ok(FileInfo {
            participant_id,
            session_id,
            entities: parsed.entities,
            suffix: parsed.suffix,
            extension: parsed.extension,
            extra,
        })
    }
}

impl Task for BidsFileInfo {
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
        let info = self.call(path)?;
        Ok(info.into_record())
    }
}
