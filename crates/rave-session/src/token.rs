//! Session token generation

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 9;

/// Builds `session-<unix-millis>-<suffix>` with a lowercase alphanumeric suffix.
pub fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    format!("session-{}-{}", Utc::now().timestamp_millis(), suffix)
}
