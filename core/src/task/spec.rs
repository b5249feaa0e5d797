use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::value::{Record, Value};
use crate::error::TaskError;

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Semantic type of a task field, as seen by the orchestration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Path,
    /// Text that may be absent.
    Str,
    /// Entity key -> label mapping.
    Entities,
    FileList,
}

impl FieldType {
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Path, Value::Path(_) | Value::Str(_))
                | (Self::Str, Value::Str(_) | Value::Null)
                | (Self::Entities, Value::Entities(_))
                | (Self::FileList, Value::Files(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Str => "string",
            Self::Entities => "entities",
            Self::FileList => "file list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Named, ordered field list describing a task's inputs or outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecInfo {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl SpecInfo {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Check that every declared input is present with an accepted type.
    pub fn check_inputs(&self, task: &str, inputs: &Record) -> Result<(), TaskError> {
        for field in &self.fields {
            let Some(value) = inputs.get(&field.name) else {
                return Err(TaskError::MissingInput {
                    task: task.to_string(),
                    field: field.name.clone(),
                });
            };
            if !field.ty.accepts(value) {
                return Err(TaskError::InputType {
                    field: field.name.clone(),
                    expected: field.ty.as_str(),
                    actual: value.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Check that `outputs` carries exactly the declared fields, in order.
    pub fn check_outputs(&self, task: &str, outputs: &Record) -> Result<(), TaskError> {
        let mismatch = |reason: String| TaskError::OutputMismatch {
            task: task.to_string(),
            reason,
        };

        let declared: Vec<&str> = self.field_names().collect();
        let produced: Vec<&str> = outputs.names().collect();
        if declared != produced {
            return Err(mismatch(format!(
                "expected fields {declared:?}, produced {produced:?}"
            )));
        }
        for (field, (_, value)) in self.fields.iter().zip(outputs.iter()) {
            if !field.ty.accepts(value) {
                return Err(mismatch(format!(
                    "field '{}' expects {}, got {}",
                    field.name,
                    field.ty.as_str(),
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}

pub fn is_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// Validate caller-chosen field names: identifiers, unique, not reserved.
pub fn validate_field_names<'a>(
    spec: &str,
    names: impl IntoIterator<Item = &'a str>,
    reserved: &[&str],
) -> Result<(), TaskError> {
    let mut seen = HashSet::new();
    for name in names {
        if !is_identifier(name) {
            return Err(TaskError::InvalidFieldName(name.to_string()));
        }
        if reserved.contains(&name) {
            return Err(TaskError::ReservedField(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(TaskError::DuplicateField {
                spec: spec.to_string(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}
