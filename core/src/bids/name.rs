//! BIDS filename decomposition: `sub-01_ses-02_T1w.nii.gz` into entities,
//! suffix and extension.

use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

lazy_static! {
    static ref ENTITY_RE: Regex = Regex::new(r"^(?P<key>[A-Za-z0-9]+)-(?P<value>[^-]+)$").unwrap();
    static ref SUFFIX_RE: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

/// Components of a BIDS filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Entity key -> label, e.g. `sub` -> `P01`.
    #[serde(serialize_with = "super::entities::serialize_ordered")]
    pub entities: BTreeMap<String, String>,
    pub suffix: String,
    /// Extension with its leading dot (`.nii.gz`); empty when there is none.
    pub extension: String,
}

impl ParsedName {
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

/// Filename parser consumed by the file-info task.
pub trait NameParser: Send + Sync {
    fn parse(&self, name: &str) -> Result<ParsedName, ParseError>;
}

/// Default parser following the BIDS `key-value_..._suffix.ext` convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityParser;

impl NameParser for EntityParser {
    fn parse(&self, name: &str) -> Result<ParsedName, ParseError> {
        parse_bids_name(name)
    }
}

/// Parse the final component of `path` as a BIDS filename.
///
/// Directory components are ignored. The extension starts at the first `.`
/// of the file name, so compound extensions stay whole.
pub fn parse_bids_name(path: impl AsRef<Path>) -> Result<ParsedName, ParseError> {
    let path = path.as_ref();
    let Some(file_name) = path.file_name() else {
        return Err(ParseError::EmptyName);
    };
    let Some(file_name) = file_name.to_str() else {
        return Err(ParseError::NonUtf8Path(path.to_string_lossy().into_owned()));
    };
    if file_name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let (stem, extension) = match file_name.find('.') {
        Some(pos) => (&file_name[..pos], &file_name[pos..]),
        None => (file_name, ""),
    };

    let mut parts: Vec<&str> = stem.split('_').collect();
    let suffix = parts.pop().unwrap_or_default();
    if !SUFFIX_RE.is_match(suffix) {
        return Err(ParseError::MissingSuffix(file_name.to_string()));
    }

    let mut entities = BTreeMap::new();
    for token in parts {
        let Some(caps) = ENTITY_RE.captures(token) else {
            return Err(ParseError::InvalidEntity {
                name: file_name.to_string(),
                token: token.to_string(),
            });
        };
        let key = caps["key"].to_string();
        if entities.contains_key(&key) {
            return Err(ParseError::DuplicateEntity {
                name: file_name.to_string(),
                key,
            });
        }
        entities.insert(key, caps["value"].to_string());
    }

    Ok(ParsedName {
        entities,
        suffix: suffix.to_string(),
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_subject_session_suffix_extension() {
        let parsed = parse_bids_name("sub-P01_ses-M00_T1w.nii.gz").unwrap();
        assert_eq!(parsed.entity("sub"), Some("P01"));
        assert_eq!(parsed.entity("ses"), Some("M00"));
        assert_eq!(parsed.suffix, "T1w");
        assert_eq!(parsed.extension, ".nii.gz");
    }

    #[test]
    fn ignores_directory_prefix() {
        let parsed = parse_bids_name("/data/ds/sub-01/anat/sub-01_T1w.nii").unwrap();
        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.entity("sub"), Some("01"));
        assert_eq!(parsed.extension, ".nii");
    }

    #[test]
    fn keeps_unknown_entities() {
        let parsed = parse_bids_name("sub-01_foo-bar_trc-18FFDG_pet.json").unwrap();
        assert_eq!(parsed.entity("foo"), Some("bar"));
        assert_eq!(parsed.entity("trc"), Some("18FFDG"));
        assert_eq!(parsed.suffix, "pet");
    }

    #[test]
    fn suffix_only_file() {
        let parsed = parse_bids_name("participants.tsv").unwrap();
        assert!(parsed.entities.is_empty());
        assert_eq!(parsed.suffix, "participants");
        assert_eq!(parsed.extension, ".tsv");
    }

    #[test]
    fn no_extension() {
        let parsed = parse_bids_name("sub-01_T1w").unwrap();
        assert_eq!(parsed.extension, "");
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(parse_bids_name(""), Err(ParseError::EmptyName));
        assert!(matches!(
            parse_bids_name("sub-01_ses-02.nii"),
            Err(ParseError::MissingSuffix(_))
        ));
        assert!(matches!(
            parse_bids_name("sub_T1w.nii"),
            Err(ParseError::InvalidEntity { .. })
        ));
        assert!(matches!(
            parse_bids_name("sub-_T1w.nii"),
            Err(ParseError::InvalidEntity { .. })
        ));
        assert!(matches!(
            parse_bids_name(".bidsignore"),
            Err(ParseError::MissingSuffix(_))
        ));
    }

    #[test]
    fn rejects_duplicate_entity() {
        let err = parse_bids_name("sub-01_sub-02_T1w.nii").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateEntity {
                name: "sub-01_sub-02_T1w.nii".to_string(),
                key: "sub".to_string(),
            }
        );
    }
}
