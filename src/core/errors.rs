use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuotagError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Collection database error: {0}")]
    Sqlite(Box<rusqlite::Error>),

    #[error("Duolingo rejected the session token (HTTP {0})")]
    Authentication(u16),

    #[error("no data for language '{language}' in this profile (available: {available})")]
    LanguageNotFound { language: String, available: String },

    #[error("could not read session token from {path}: {source}")]
    TokenFile { path: String, source: std::io::Error },

    #[error("no Anki collection found under {0}, pass one with --collection")]
    CollectionNotFound(String),

    #[error("several Anki profiles found ({0}), pick one with --collection")]
    AmbiguousCollection(String),

    #[error("DuotagError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for DuotagError {
    fn from(error: std::io::Error) -> Self {
        DuotagError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for DuotagError {
    fn from(error: reqwest::Error) -> Self {
        DuotagError::Reqwest(Box::new(error))
    }
}

impl From<rusqlite::Error> for DuotagError {
    fn from(error: rusqlite::Error) -> Self {
        DuotagError::Sqlite(Box::new(error))
    }
}
