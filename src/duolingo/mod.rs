//! Client for the unofficial Duolingo profile API.
//!
//! Authentication rides on the `jwt_token` cookie of a logged-in browser
//! session. In the browser console:
//!
//! ```text
//! document.cookie.match(new RegExp('(^| )jwt_token=([^;]+)'))[0].slice(11);
//! ```
//!
//! Save the printed value to `jwt.txt` next to the binary.

use std::{
    collections::HashSet,
    fs,
    path::Path,
    time::Duration,
};

use reqwest::{
    blocking::Client,
    header::USER_AGENT,
    StatusCode,
};

use crate::core::{
    pipeline::WordSource,
    DuotagError,
};

pub mod api;

// Duolingo answers script-less clients with a captcha wall, so the request has
// to look like the browser the token was lifted from.
const AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// An authenticated view of one Duolingo account.
pub struct DuolingoProfile {
    username: String,
    token: String,
    client: Client,
}

impl DuolingoProfile {
    /// The token is taken as-is; an expired or malformed one only shows up as
    /// an authentication failure from the service.
    pub fn new(username: &str, token: &str) -> Result<Self, DuotagError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DuotagError::Custom(format!("HTTP client build failed: {e}")))?;

        Ok(Self { username: username.to_string(), token: token.to_string(), client })
    }

    fn fetch_profile(&self) -> Result<api::UserProfile, DuotagError> {
        let url = format!("{}/{}", api::USER_ENDPOINT, self.username);
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, AGENT)
            .bearer_auth(&self.token)
            .send()?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(DuotagError::Authentication(response.status().as_u16()))
            }
            status if !status.is_success() => {
                Err(DuotagError::Custom(format!("Duolingo returned HTTP {status} for {url}")))
            }
            _ => Ok(response.json()?),
        }
    }
}

impl WordSource for DuolingoProfile {
    fn known_words(&self, language: &str) -> Result<HashSet<String>, DuotagError> {
        self.fetch_profile()?.known_words(language)
    }
}

/// Reads the session token file, trimmed of surrounding whitespace. No local
/// validation happens beyond that.
pub fn load_token(path: &Path) -> Result<String, DuotagError> {
    let raw = fs::read_to_string(path).map_err(|source| DuotagError::TokenFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(raw.trim().to_string())
}
