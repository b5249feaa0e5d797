use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entities::{SESSION, SUBJECT};
use super::layout::BidsFile;

/// Constraint on a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityFilter {
    /// `*`: any value, including files that lack the entity.
    #[default]
    Any,
    Value(String),
    OneOf(Vec<String>),
    /// The entity must not appear in the filename.
    Absent,
}

impl EntityFilter {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Value(expected) => value == Some(expected.as_str()),
            Self::OneOf(options) => value.is_some_and(|v| options.iter().any(|o| o == v)),
            Self::Absent => value.is_none(),
        }
    }
}

impl From<&str> for EntityFilter {
    fn from(value: &str) -> Self {
        if value == "*" {
            Self::Any
        } else {
            Self::Value(value.to_string())
        }
    }
}

/// What a layout lookup hands back for each matching file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Dataset-relative paths with `/` separators.
    #[default]
    Files,
    AbsoluteFiles,
}

/// File lookup criteria against an indexed dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub subject: EntityFilter,
    pub session: EntityFilter,
    pub suffix: Option<String>,
    /// Accepted extensions, with or without the leading dot. Empty accepts all.
    pub extensions: Vec<String>,
    /// Filters on entities other than subject and session.
    pub entities: BTreeMap<String, EntityFilter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, filter: impl Into<EntityFilter>) -> Self {
        self.subject = filter.into();
        self
    }

    pub fn session(mut self, filter: impl Into<EntityFilter>) -> Self {
        self.session = filter.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn entity(mut self, key: impl Into<String>, filter: impl Into<EntityFilter>) -> Self {
        self.entities.insert(key.into(), filter.into());
        self
    }

    pub fn matches(&self, file: &BidsFile) -> bool {
        if !self.subject.matches(file.entity(SUBJECT)) {
            return false;
        }
        if !self.session.matches(file.entity(SESSION)) {
            return false;
        }
        if let Some(suffix) = &self.suffix {
            if &file.suffix != suffix {
                return false;
            }
        }
        if !self.extensions.is_empty() {
            let ext = normalize_extension(&file.extension);
            if !self
                .extensions
                .iter()
                .any(|e| normalize_extension(e) == ext)
            {
                return false;
            }
        }
        self.entities
            .iter()
            .all(|(key, filter)| filter.matches(file.entity(key)))
    }
}

fn normalize_extension(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

/// Named-query criteria as configured for the dataset reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub suffix: String,
    #[serde(default)]
    pub extension: Vec<String>,
}

impl QueryFilter {
    pub fn new<I, S>(suffix: impl Into<String>, extension: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffix: suffix.into(),
            extension: extension.into_iter().map(Into::into).collect(),
        }
    }

    /// Lookup across all subjects and all sessions.
    pub fn to_query(&self) -> Query {
        Query::new()
            .subject("*")
            .session("*")
            .suffix(self.suffix.clone())
            .extensions(self.extension.iter().cloned())
    }
}
