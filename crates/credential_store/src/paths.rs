use std::path::{Path, PathBuf};

/// Environment variable that selects the non-production config directory
/// suffix and gates analytics elsewhere in the product.
pub const ENVIRONMENT_ENV_VAR: &str = "NEXT_PUBLIC_CB_ENVIRONMENT";

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

const CONFIG_DIR_BASE: &str = "manicode";

/// Returns the config directory for the given home directory and environment.
///
/// A blank or `prod` environment maps to `~/.config/manicode`; any other
/// value appends `-<env>` to the directory name.
#[must_use]
pub fn config_dir(home: &Path, environment: Option<&str>) -> PathBuf {
    let suffix = environment
        .map(str::trim)
        .filter(|env| !env.is_empty() && *env != "prod")
        .map(|env| format!("-{env}"))
        .unwrap_or_default();

    home.join(".config").join(format!("{CONFIG_DIR_BASE}{suffix}"))
}

#[must_use]
pub fn credentials_path(home: &Path, environment: Option<&str>) -> PathBuf {
    config_dir(home, environment).join(CREDENTIALS_FILE_NAME)
}

/// Resolves the credentials path from `HOME` and the environment variable.
///
/// Returns `None` when no home directory is available.
#[must_use]
pub fn default_credentials_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok().filter(|home| !home.is_empty())?;
    let environment = std::env::var(ENVIRONMENT_ENV_VAR).ok();
    Some(credentials_path(Path::new(&home), environment.as_deref()))
}
