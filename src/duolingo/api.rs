use std::collections::{
    HashMap,
    HashSet,
};

use serde::Deserialize;

use crate::core::DuotagError;

pub const USER_ENDPOINT: &str = "https://duolingo.com/users";

/// The slice of the users-endpoint payload this tool consumes; serde ignores
/// the (large) remainder of the profile document.
#[derive(Debug, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub language_data: HashMap<String, LanguageData>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageData {
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub learned: bool,
    #[serde(default)]
    pub words: Vec<String>,
}

impl UserProfile {
    /// Every word taught by a skill the profile marks as learned, deduplicated.
    /// A language the profile has no course for is an error; a course with no
    /// learned skills yields an empty set.
    pub fn known_words(&self, language: &str) -> Result<HashSet<String>, DuotagError> {
        let data = self.language_data.get(language).ok_or_else(|| {
            let mut available: Vec<&str> =
                self.language_data.keys().map(|code| code.as_str()).collect();
            available.sort_unstable();
            DuotagError::LanguageNotFound {
                language: language.to_string(),
                available: available.join(", "),
            }
        })?;

        Ok(data
            .skills
            .iter()
            .filter(|skill| skill.learned)
            .flat_map(|skill| skill.words.iter().cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "username": "kana_fan",
        "language_data": {
            "ja": {
                "language_string": "Japanese",
                "skills": [
                    {"learned": true, "words": ["犬", "猫"], "title": "Animals 1"},
                    {"learned": false, "words": ["馬"], "title": "Animals 2"},
                    {"learned": true, "words": ["猫", "魚"], "title": "Food 1"}
                ]
            },
            "fr": {
                "skills": []
            }
        }
    }"#;

    #[test]
    fn test_known_words_take_learned_skills_only() {
        let profile: UserProfile = serde_json::from_str(PROFILE_JSON).unwrap();
        let words = profile.known_words("ja").unwrap();

        // 猫 appears in two learned skills and collapses to one entry; the
        // unlearned skill contributes nothing.
        assert_eq!(words.len(), 3);
        assert!(words.contains("犬"));
        assert!(words.contains("猫"));
        assert!(words.contains("魚"));
        assert!(!words.contains("馬"));
    }

    #[test]
    fn test_language_without_learned_skills_is_empty() {
        let profile: UserProfile = serde_json::from_str(PROFILE_JSON).unwrap();
        assert!(profile.known_words("fr").unwrap().is_empty());
    }

    #[test]
    fn test_missing_language_lists_available_courses() {
        let profile: UserProfile = serde_json::from_str(PROFILE_JSON).unwrap();
        match profile.known_words("de") {
            Err(DuotagError::LanguageNotFound { language, available }) => {
                assert_eq!(language, "de");
                assert_eq!(available, "fr, ja");
            }
            other => panic!("Expected LanguageNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_without_language_data_parses() {
        let profile: UserProfile = serde_json::from_str(r#"{"username": "x"}"#).unwrap();
        assert!(profile.language_data.is_empty());
    }
}
