use std::{
    collections::HashSet,
    io::{
        self,
        BufRead,
        Write,
    },
    time::Instant,
};

use super::{
    models::{
        SyncConfig,
        SyncReport,
    },
    DuotagError,
};
use crate::anki::Note;

/// A remote profile that can report which words the learner already knows.
pub trait WordSource {
    fn known_words(&self, language: &str) -> Result<HashSet<String>, DuotagError>;
}

/// The slice of the note collection the pipeline needs: select by tag, take
/// back modified notes, persist. Loading happened when the store was opened.
pub trait NoteStore {
    /// Clones of the notes carrying the tag, in table order.
    fn notes_with_tag(&self, tag: &str) -> Vec<Note>;

    /// Replaces notes by id in the in-memory table and returns how many now
    /// differ from the state loaded from disk.
    fn apply_updates(&mut self, notes: &[Note]) -> usize;

    /// Persists pending note changes to the backing storage.
    fn write(&mut self) -> Result<(), DuotagError>;
}

/// Compares each selected note's vocabulary field against the known-word set
/// with exact string equality. No normalization, no case folding: "犬" matches
/// only the literal entry "犬". Matches come back as re-tagged clones; the
/// store itself stays untouched.
pub fn match_known_notes(
    selected: &[Note],
    known_words: &HashSet<String>,
    config: &SyncConfig,
) -> Vec<Note> {
    let mut matched = Vec::new();

    for note in selected {
        if let Some(value) = note.field(&config.vocab_field) {
            if known_words.contains(value) {
                let mut update = note.clone();
                // Remove-then-add keeps re-tagging idempotent for notes that
                // already carry the tag.
                update.remove_tag(&config.known_tag);
                update.add_tag(&config.known_tag);
                matched.push(update);
            }
        }
    }

    matched
}

/// Runs the read-only half of the sync: fetch the known-word set, select the
/// tagged notes, match, and stage the re-tagged notes in the store. Nothing is
/// persisted until [`commit_changes`].
pub fn stage_changes<W: WordSource, S: NoteStore>(
    profile: &W,
    store: &mut S,
    config: &SyncConfig,
) -> Result<SyncReport, DuotagError> {
    let fetch_start = Instant::now();
    let known_words = profile.known_words(&config.language)?;
    println!(
        "Fetched {} known words for '{}' ({:.1}s)",
        known_words.len(),
        config.language,
        fetch_start.elapsed().as_secs_f32()
    );

    let selected = store.notes_with_tag(&config.source_tag);
    println!("Selected {} notes tagged '{}'", selected.len(), config.source_tag);

    let matched = match_known_notes(&selected, &known_words, config);
    let changed = store.apply_updates(&matched);

    Ok(SyncReport {
        known_words: known_words.len(),
        selected: selected.len(),
        matched: matched.len(),
        changed,
    })
}

/// Shows the pending changes, blocks on the confirmation prompt, and persists
/// on a `y`. Returns whether anything was written. Declining is not an error;
/// the store is simply left alone.
pub fn commit_changes<S: NoteStore>(
    store: &mut S,
    report: &SyncReport,
    config: &SyncConfig,
    input: &mut impl BufRead,
) -> Result<bool, DuotagError> {
    println!();
    println!("Summary of changes:");
    println!("  notes matched against known words: {}", report.matched);
    println!("  notes whose tags will change: {}", report.changed);

    if confirm("Continue? [y/N]: ", input)? {
        store.write()?;
        println!("Updated {} notes with tag '{}'", report.changed, config.known_tag);
        Ok(true)
    } else {
        println!("Notes not updated, exiting...");
        Ok(false)
    }
}

/// One-line yes/no gate. Only a lone `y`, in either case, counts as yes;
/// anything else (including `yes`, an empty line, or EOF) declines.
pub fn confirm(prompt: &str, input: &mut impl BufRead) -> Result<bool, DuotagError> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("y"))
}
