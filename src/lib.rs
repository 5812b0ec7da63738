//! Tags Anki vocabulary notes that Duolingo already considers learned.
//!
//! The flow is a single pass: fetch the known-word list from the Duolingo
//! profile API, select notes by tag from a local `collection.anki2`, match
//! the vocabulary field against the known words and stage the `duolingo`
//! tag, then write the changed rows back after a console confirmation.

pub mod anki;
pub mod core;
pub mod duolingo;
