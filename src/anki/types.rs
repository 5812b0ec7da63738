use std::collections::{
    HashMap,
    HashSet,
};

use serde::Deserialize;

/// Anki joins a note's field values with the ASCII unit separator.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// One row of the `notes` table, fields resolved to names through the note
/// type. Only the tags are ever written back; everything else is carried so a
/// note keeps its identity and full field set through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub guid: String,
    pub model_id: i64,
    /// Last-modified time, epoch seconds.
    pub modified: i64,
    /// Update sequence number; -1 marks a local change pending sync.
    pub usn: i64,
    pub tags: Vec<String>,
    pub fields: HashMap<String, String>,
}

impl Note {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|value| value.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Appends the tag unless the note already carries it.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Removes every occurrence of the tag.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }
}

/// A note type: its name and field order as declared in `col.models`.
#[derive(Debug, Clone)]
pub struct NoteModel {
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
}

/// The slice of the `col.models` JSON this tool reads. The column maps note
/// type ids (as strings) to objects carrying far more than this; serde drops
/// the rest.
#[derive(Debug, Deserialize)]
pub(crate) struct RawModel {
    pub name: String,
    pub flds: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawField {
    pub name: String,
    pub ord: u32,
}

impl RawModel {
    pub fn into_note_model(mut self, id: i64) -> NoteModel {
        self.flds.sort_by_key(|field| field.ord);
        NoteModel {
            id,
            name: self.name,
            fields: self.flds.into_iter().map(|field| field.name).collect(),
        }
    }
}

/// Splits the stored tag string. Anki keeps tags space-separated, canonically
/// wrapped in single spaces; parsing tolerates any surrounding whitespace.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(|tag| tag.to_string()).collect()
}

/// Serializes tags back to Anki's storage form: ` a b ` when non-empty, the
/// empty string otherwise.
pub fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {} ", tags.join(" "))
    }
}

/// Order-insensitive tag comparison. Dirty detection treats tag state as a
/// set; a staged note whose tags merely moved keeps the stored row untouched.
pub fn same_tag_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split(FIELD_SEPARATOR).map(|value| value.to_string()).collect()
}
