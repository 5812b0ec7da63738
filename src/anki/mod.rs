use std::path::PathBuf;

use crate::core::DuotagError;

pub mod collection;
pub mod types;

pub use collection::Collection;
pub use types::{
    Note,
    NoteModel,
};

const COLLECTION_FILE: &str = "collection.anki2";

/// Locates the collection of the single local Anki profile, e.g.
/// `~/.local/share/Anki2/User 1/collection.anki2`. With zero or several
/// profiles there is no safe default and the caller must pass a path.
pub fn find_collection() -> Result<PathBuf, DuotagError> {
    let base = dirs::data_dir()
        .ok_or_else(|| DuotagError::Custom("no platform data directory".into()))?
        .join("Anki2");

    let entries = std::fs::read_dir(&base)
        .map_err(|_| DuotagError::CollectionNotFound(base.display().to_string()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().join(COLLECTION_FILE))
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(DuotagError::CollectionNotFound(base.display().to_string())),
        1 => Ok(candidates.remove(0)),
        _ => {
            let listing = candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(DuotagError::AmbiguousCollection(listing))
        }
    }
}
