//! Known BIDS entities, in the order the standard places them in a filename.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::Serializer;

/// A BIDS entity: its long name and the key used in filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub name: &'static str,
    pub key: &'static str,
}

const fn entity(name: &'static str, key: &'static str) -> Entity {
    Entity { name, key }
}

pub const SUBJECT: &str = "sub";
pub const SESSION: &str = "ses";

pub static ENTITIES: &[Entity] = &[
    entity("subject", "sub"),
    entity("session", "ses"),
    entity("sample", "sample"),
    entity("task", "task"),
    entity("tracksys", "tracksys"),
    entity("acquisition", "acq"),
    entity("nucleus", "nuc"),
    entity("volume", "voi"),
    entity("ceagent", "ce"),
    entity("tracer", "trc"),
    entity("stain", "stain"),
    entity("reconstruction", "rec"),
    entity("direction", "dir"),
    entity("run", "run"),
    entity("modality", "mod"),
    entity("echo", "echo"),
    entity("flip", "flip"),
    entity("inversion", "inv"),
    entity("mtransfer", "mt"),
    entity("part", "part"),
    entity("processing", "proc"),
    entity("hemisphere", "hemi"),
    entity("space", "space"),
    entity("split", "split"),
    entity("recording", "recording"),
    entity("chunk", "chunk"),
    entity("segmentation", "seg"),
    entity("resolution", "res"),
    entity("density", "den"),
    entity("label", "label"),
    entity("description", "desc"),
];

/// Look up an entity by filename key or long name.
pub fn lookup(name_or_key: &str) -> Option<&'static Entity> {
    ENTITIES
        .iter()
        .find(|e| e.key == name_or_key || e.name == name_or_key)
}

/// Resolve a long entity name (`tracer`) to its filename key (`trc`).
///
/// Unknown names are returned unchanged so custom entities keep working.
pub fn resolve_key(name_or_key: &str) -> &str {
    match lookup(name_or_key) {
        Some(e) => e.key,
        None => name_or_key,
    }
}

/// Position of `key` in the canonical entity order; unknown keys sort last.
pub fn order_of(key: &str) -> usize {
    ENTITIES
        .iter()
        .position(|e| e.key == key)
        .unwrap_or(ENTITIES.len())
}

/// Serialize an entity map in canonical order; unknown keys follow,
/// alphabetically.
pub fn serialize_ordered<S: Serializer>(
    entities: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut ordered: Vec<(&String, &String)> = entities.iter().collect();
    ordered.sort_by_key(|(key, _)| order_of(key));
    let mut map = serializer.serialize_map(Some(ordered.len()))?;
    for (key, label) in ordered {
        map.serialize_entry(key, label)?;
    }
    map.end()
}
