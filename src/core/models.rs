/// Selection and tagging policy for one sync run. The defaults carry the
/// whole policy; nothing reads a config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Duolingo language code the known words are fetched for.
    pub language: String,
    /// Notes carrying this tag are the ones compared at all.
    pub source_tag: String,
    /// Tag stamped onto notes whose vocabulary field is a known word.
    pub known_tag: String,
    /// Note field holding the word under study.
    pub vocab_field: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            language: "ja".to_string(),
            source_tag: "vocab".to_string(),
            known_tag: "duolingo".to_string(),
            vocab_field: "Vocab".to_string(),
        }
    }
}

/// Counters surfaced to the operator before the confirmation prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Size of the known-word set fetched from the profile.
    pub known_words: usize,
    /// Notes carrying the source tag.
    pub selected: usize,
    /// Selected notes whose vocabulary field equals a known word.
    pub matched: usize,
    /// Matched notes whose tag set actually differs from the stored one.
    pub changed: usize,
}
