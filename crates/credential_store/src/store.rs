use std::fs;
use std::path::Path;

use log::warn;

use crate::error::CredentialStoreError;
use crate::paths::default_credentials_path;
use crate::schema::{CredentialsFile, User, DEFAULT_PROFILE};

/// Parses a credentials JSON document and extracts the named profile.
///
/// Schema violations (missing `default`, a profile that is not a user record,
/// malformed JSON) are logged and collapsed to `None`.
#[must_use]
pub fn user_from_json(json: &str, profile: &str) -> Option<User> {
    match serde_json::from_str::<CredentialsFile>(json) {
        Ok(credentials) => credentials.profile(profile).cloned(),
        Err(error) => {
            warn!("failed to parse credentials JSON: {error}");
            None
        }
    }
}

/// Reads the `default` profile from the credentials file at `path`.
///
/// A missing file is the ordinary logged-out state and produces `None`
/// without logging; read and parse failures are logged.
#[must_use]
pub fn get_user_credentials_from(path: &Path) -> Option<User> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(raw) => user_from_json(&raw, DEFAULT_PROFILE),
        Err(error) => {
            warn!("failed to read credentials at {}: {error}", path.display());
            None
        }
    }
}

/// Reads the `default` profile from the standard credentials location.
#[must_use]
pub fn get_user_credentials() -> Option<User> {
    let path = default_credentials_path()?;
    get_user_credentials_from(&path)
}

/// Writes the full profile map to `path`, creating parent directories.
///
/// The file is always overwritten wholesale.
pub fn save_credentials_to(
    path: &Path,
    credentials: &CredentialsFile,
) -> Result<(), CredentialStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| CredentialStoreError::io("creating config directory", parent, source))?;
    }

    let json = serde_json::to_string_pretty(credentials)
        .map_err(|source| CredentialStoreError::serialize(path, source))?;

    fs::write(path, json)
        .map_err(|source| CredentialStoreError::io("writing credentials file", path, source))
}

/// Writes the full profile map to the standard credentials location.
pub fn save_credentials(credentials: &CredentialsFile) -> Result<(), CredentialStoreError> {
    let path = default_credentials_path().ok_or(CredentialStoreError::MissingHome)?;
    save_credentials_to(&path, credentials)
}
