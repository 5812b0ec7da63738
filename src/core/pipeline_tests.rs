#[cfg(test)]
mod tests {
    use std::{
        collections::{
            HashMap,
            HashSet,
        },
        io::Cursor,
    };

    use crate::{
        anki::{
            types::same_tag_set,
            Note,
        },
        core::{
            models::{
                SyncConfig,
                SyncReport,
            },
            pipeline::{
                commit_changes,
                confirm,
                match_known_notes,
                stage_changes,
                NoteStore,
                WordSource,
            },
            DuotagError,
        },
    };

    fn note(id: i64, vocab: &str, tags: &[&str]) -> Note {
        Note {
            id,
            guid: format!("guid-{id}"),
            model_id: 1,
            modified: 0,
            usn: 0,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            fields: HashMap::from([("Vocab".to_string(), vocab.to_string())]),
        }
    }

    fn words(entries: &[&str]) -> HashSet<String> {
        entries.iter().map(|word| word.to_string()).collect()
    }

    struct FixedWords(HashSet<String>);

    impl WordSource for FixedWords {
        fn known_words(&self, _language: &str) -> Result<HashSet<String>, DuotagError> {
            Ok(self.0.clone())
        }
    }

    /// In-memory stand-in with the same observable contract as the SQLite
    /// collection: a baseline snapshot for dirty detection and a write counter.
    struct MemoryStore {
        notes: Vec<Note>,
        baseline: HashMap<i64, Vec<String>>,
        writes: usize,
    }

    impl MemoryStore {
        fn new(notes: Vec<Note>) -> Self {
            let baseline = notes.iter().map(|n| (n.id, n.tags.clone())).collect();
            Self { notes, baseline, writes: 0 }
        }

        fn tags_of(&self, id: i64) -> &[String] {
            &self.notes.iter().find(|n| n.id == id).unwrap().tags
        }
    }

    impl NoteStore for MemoryStore {
        fn notes_with_tag(&self, tag: &str) -> Vec<Note> {
            self.notes.iter().filter(|n| n.has_tag(tag)).cloned().collect()
        }

        fn apply_updates(&mut self, updates: &[Note]) -> usize {
            for update in updates {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == update.id) {
                    note.tags = update.tags.clone();
                }
            }
            self.notes
                .iter()
                .filter(|n| match self.baseline.get(&n.id) {
                    Some(loaded) => !same_tag_set(loaded, &n.tags),
                    None => true,
                })
                .count()
        }

        fn write(&mut self) -> Result<(), DuotagError> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_match_partitions_selected_notes() {
        let config = SyncConfig::default();
        let selected =
            vec![note(1, "猫", &["vocab"]), note(2, "鳥", &["vocab"]), note(3, "犬", &["vocab"])];

        let matched = match_known_notes(&selected, &words(&["猫", "犬"]), &config);

        let ids: Vec<i64> = matched.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        for update in &matched {
            assert_eq!(update.tags, vec!["vocab", "duolingo"]);
        }
    }

    #[test]
    fn test_matching_is_exact_and_case_sensitive() {
        let config = SyncConfig::default();
        let selected = vec![
            note(1, "イヌ", &["vocab"]),
            note(2, "Inu", &["vocab"]),
            note(3, "inu", &["vocab"]),
            note(4, "犬", &["vocab"]),
            note(5, "犬 ", &["vocab"]),
        ];

        let matched = match_known_notes(&selected, &words(&["犬", "inu"]), &config);

        // Only the literal field values match; no case folding, no kana
        // conversion, no whitespace trimming.
        let ids: Vec<i64> = matched.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_retagging_matched_note_is_idempotent() {
        let config = SyncConfig::default();
        let selected = vec![note(1, "犬", &["vocab", "duolingo"])];

        let matched = match_known_notes(&selected, &words(&["犬"]), &config);

        assert_eq!(matched.len(), 1);
        // Remove-then-add nets out: same tags, no duplicate.
        assert_eq!(matched[0].tags, vec!["vocab", "duolingo"]);

        let again = match_known_notes(&matched, &words(&["犬"]), &config);
        assert_eq!(again[0].tags, vec!["vocab", "duolingo"]);
    }

    #[test]
    fn test_empty_known_word_set_matches_nothing() {
        let config = SyncConfig::default();
        let selected = vec![note(1, "猫", &["vocab"]), note(2, "犬", &["vocab"])];

        assert!(match_known_notes(&selected, &HashSet::new(), &config).is_empty());
    }

    #[test]
    fn test_note_without_vocab_field_never_matches() {
        let config = SyncConfig::default();
        let mut odd = note(1, "犬", &["vocab"]);
        odd.fields = HashMap::from([("Front".to_string(), "犬".to_string())]);

        assert!(match_known_notes(&[odd], &words(&["犬"]), &config).is_empty());
    }

    #[test]
    fn test_stage_changes_reports_counts() {
        let config = SyncConfig::default();
        let store_notes = vec![
            note(1, "猫", &["vocab"]),
            note(2, "鳥", &["vocab"]),
            note(3, "犬", &["vocab", "duolingo"]),
            note(4, "馬", &["grammar"]),
        ];
        let mut store = MemoryStore::new(store_notes);
        let profile = FixedWords(words(&["猫", "犬", "馬"]));

        let report = stage_changes(&profile, &mut store, &config).unwrap();

        // Note 4 carries the wrong tag and is never considered, note 3 is
        // matched but already tagged, so only note 1 actually changes.
        assert_eq!(
            report,
            SyncReport { known_words: 3, selected: 3, matched: 2, changed: 1 }
        );
        assert_eq!(store.tags_of(1), ["vocab", "duolingo"]);
        assert_eq!(store.tags_of(2), ["vocab"]);
        assert_eq!(store.tags_of(3), ["vocab", "duolingo"]);
        assert_eq!(store.tags_of(4), ["grammar"]);
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_stage_changes_ignores_tag_order() {
        let config = SyncConfig::default();
        let mut store = MemoryStore::new(vec![note(1, "犬", &["duolingo", "vocab"])]);
        let profile = FixedWords(words(&["犬"]));

        let report = stage_changes(&profile, &mut store, &config).unwrap();

        // The match moves the tag to the end of the staged clone, but the
        // tag set is the stored one, so nothing counts as changed.
        assert_eq!(report.matched, 1);
        assert_eq!(report.changed, 0);
        assert_eq!(store.tags_of(1), ["vocab", "duolingo"]);
    }

    #[test]
    fn test_commit_writes_only_on_y() {
        let config = SyncConfig::default();
        let report = SyncReport { known_words: 1, selected: 1, matched: 1, changed: 1 };

        for (answer, expect_write) in [
            ("y\n", true),
            ("Y\n", true),
            ("y\r\n", true),
            ("yes\n", false),
            ("n\n", false),
            ("\n", false),
            ("", false),
            (" y\n", false),
        ] {
            let mut store = MemoryStore::new(vec![note(1, "猫", &["vocab"])]);
            let mut input = Cursor::new(answer.as_bytes());

            let written = commit_changes(&mut store, &report, &config, &mut input).unwrap();

            assert_eq!(written, expect_write, "answer {:?}", answer);
            assert_eq!(store.writes, usize::from(expect_write), "answer {:?}", answer);
        }
    }

    #[test]
    fn test_confirm_reads_one_line() {
        let mut input = Cursor::new(b"y\nn\n".as_slice());
        assert!(confirm("? ", &mut input).unwrap());
        // The second line is still unread; a fresh prompt consumes it.
        assert!(!confirm("? ", &mut input).unwrap());
    }
}
