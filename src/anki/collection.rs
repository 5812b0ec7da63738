use std::{
    collections::{
        HashMap,
        HashSet,
    },
    path::Path,
    time::Instant,
};

use chrono::Utc;
use rusqlite::{
    params,
    Connection,
    OpenFlags,
};

use super::types::{
    join_tags,
    parse_tags,
    same_tag_set,
    split_fields,
    Note,
    NoteModel,
    RawModel,
};
use crate::core::{
    pipeline::NoteStore,
    DuotagError,
};

/// An opened `collection.anki2` with every note held in memory. The handle
/// owns the SQLite connection exclusively for the process lifetime; writes go
/// back through [`NoteStore::write`] and touch changed rows only.
pub struct Collection {
    conn: Connection,
    notes: Vec<Note>,
    // Tag state as loaded from disk, for dirty detection.
    baseline: HashMap<i64, Vec<String>>,
}

impl Collection {
    pub fn open(path: &Path) -> Result<Self, DuotagError> {
        let start = Instant::now();

        // Read-write without CREATE: a mistyped path must fail here, not
        // leave an empty database behind.
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|e| {
                DuotagError::Custom(format!("could not open collection {}: {e}", path.display()))
            })?;

        let models = load_models(&conn).map_err(|e| match e {
            // Anki holds the database while it runs; the locked error is the
            // one operators actually hit.
            DuotagError::Sqlite(inner) => DuotagError::Custom(format!(
                "could not read collection {} (close Anki first?): {inner}",
                path.display()
            )),
            other => other,
        })?;
        let notes = load_notes(&conn, &models)?;
        let baseline = notes.iter().map(|note| (note.id, note.tags.clone())).collect();
        let collection = Self { conn, notes, baseline };

        println!(
            "Loaded {} notes from {} ({:.1}s)",
            collection.note_count(),
            path.display(),
            start.elapsed().as_secs_f32()
        );

        Ok(collection)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    fn dirty_rows(&self) -> Vec<(i64, String)> {
        self.notes
            .iter()
            .filter(|note| match self.baseline.get(&note.id) {
                Some(loaded) => !same_tag_set(loaded, &note.tags),
                None => true,
            })
            .map(|note| (note.id, join_tags(&note.tags)))
            .collect()
    }
}

impl NoteStore for Collection {
    fn notes_with_tag(&self, tag: &str) -> Vec<Note> {
        self.notes.iter().filter(|note| note.has_tag(tag)).cloned().collect()
    }

    fn apply_updates(&mut self, updates: &[Note]) -> usize {
        let by_id: HashMap<i64, &Note> = updates.iter().map(|note| (note.id, note)).collect();

        for note in &mut self.notes {
            if let Some(update) = by_id.get(&note.id) {
                note.tags = update.tags.clone();
            }
        }

        self.dirty_rows().len()
    }

    fn write(&mut self) -> Result<(), DuotagError> {
        let dirty = self.dirty_rows();
        if dirty.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;
        for (id, tags) in &dirty {
            // usn -1 flags the row for the next sync; fields, sfld and csum
            // stay untouched on a tag-only edit.
            tx.execute(
                "UPDATE notes SET tags = ?1, mod = ?2, usn = -1 WHERE id = ?3",
                params![tags, now.timestamp(), id],
            )?;
        }
        // col.mod is in milliseconds, unlike notes.mod.
        tx.execute("UPDATE col SET mod = ?1", params![now.timestamp_millis()])?;
        tx.commit()?;

        let written: HashSet<i64> = dirty.iter().map(|(id, _)| *id).collect();
        for note in &mut self.notes {
            if written.contains(&note.id) {
                note.modified = now.timestamp();
                note.usn = -1;
                self.baseline.insert(note.id, note.tags.clone());
            }
        }

        Ok(())
    }
}

fn load_models(conn: &Connection) -> Result<HashMap<i64, NoteModel>, DuotagError> {
    let raw: String = conn.query_row("SELECT models FROM col", [], |row| row.get(0))?;
    let parsed: HashMap<String, RawModel> = serde_json::from_str(&raw)?;

    let mut models = HashMap::new();
    for (key, raw_model) in parsed {
        let id: i64 = key.parse().map_err(|_| {
            DuotagError::Custom(format!("note type id '{key}' in col.models is not numeric"))
        })?;
        models.insert(id, raw_model.into_note_model(id));
    }

    Ok(models)
}

fn load_notes(
    conn: &Connection,
    models: &HashMap<i64, NoteModel>,
) -> Result<Vec<Note>, DuotagError> {
    let mut stmt =
        conn.prepare("SELECT id, guid, mid, mod, usn, tags, flds FROM notes ORDER BY id")?;
    let mut rows = stmt.query([])?;

    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        let model_id: i64 = row.get(2)?;
        let raw_tags: String = row.get(5)?;
        let raw_fields: String = row.get(6)?;

        // A note whose type is missing from col.models keeps an empty field
        // map: it can still be selected by tag but can never match.
        let fields = match models.get(&model_id) {
            Some(model) => model
                .fields
                .iter()
                .cloned()
                .zip(split_fields(&raw_fields))
                .collect(),
            None => HashMap::new(),
        };

        notes.push(Note {
            id: row.get(0)?,
            guid: row.get(1)?,
            model_id,
            modified: row.get(3)?,
            usn: row.get(4)?,
            tags: parse_tags(&raw_tags),
            fields,
        });
    }

    Ok(notes)
}
