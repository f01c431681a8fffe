//! Per-profile credential persistence for the manicode client.
//!
//! Credentials live in a single JSON file at
//! `~/.config/manicode[-<env>]/credentials.json`, where `<env>` is the value
//! of `NEXT_PUBLIC_CB_ENVIRONMENT` when set to anything other than `prod`.
//! The file maps profile names to user records and always contains a
//! `default` profile.
//!
//! Read access never fails past this boundary: a missing file, malformed
//! JSON, or a schema violation all surface as `None` (with a logged warning
//! where there is something to warn about). Only the write path returns
//! typed errors.

mod error;
mod paths;
mod schema;
mod store;

pub use error::CredentialStoreError;
pub use paths::{
    config_dir, credentials_path, default_credentials_path, CREDENTIALS_FILE_NAME,
    ENVIRONMENT_ENV_VAR,
};
pub use schema::{CredentialsFile, User, DEFAULT_PROFILE};
pub use store::{
    get_user_credentials, get_user_credentials_from, save_credentials, save_credentials_to,
    user_from_json,
};
