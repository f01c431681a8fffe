use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Profile name implicitly used by credential lookups.
pub const DEFAULT_PROFILE: &str = "default";

/// A user's session identity as persisted in the credentials file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub auth_token: String,
}

/// The on-disk profile map. The `default` profile is required; any number of
/// additional named profiles may follow, each conforming to the user schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub default: User,
    #[serde(flatten)]
    pub profiles: BTreeMap<String, User>,
}

impl CredentialsFile {
    #[must_use]
    pub fn new(default: User) -> Self {
        Self {
            default,
            profiles: BTreeMap::new(),
        }
    }

    /// Looks up a profile by name; `"default"` resolves to the required slot.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&User> {
        if name == DEFAULT_PROFILE {
            Some(&self.default)
        } else {
            self.profiles.get(name)
        }
    }

    pub fn insert_profile(&mut self, name: impl Into<String>, user: User) {
        let name = name.into();
        if name == DEFAULT_PROFILE {
            self.default = user;
        } else {
            self.profiles.insert(name, user);
        }
    }
}
