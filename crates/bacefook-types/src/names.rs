//! Sequential user names.
//!
//! Users are never identified by UUID: every registered user gets the name
//! `user` followed by its 1-based registration index, zero-padded to five
//! digits (`user00001`, `user00002`, ...). Indices past `99999` simply grow
//! wider (`user100000`). Names are compared as plain strings, which is the
//! canonical ordering used for unordered friendship pairs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Prefix shared by every generated user name.
const NAME_PREFIX: &str = "user";

/// Minimum width of the numeric part of a user name.
const INDEX_WIDTH: usize = 5;

/// The name of a registered user, e.g. `user00042`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserName(String);

impl UserName {
    /// Build the name for the user at the given 0-based registration index.
    pub fn from_index(index: usize) -> Self {
        let ordinal = index.saturating_add(1);
        Self(format!("{NAME_PREFIX}{ordinal:0INDEX_WIDTH$}"))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for UserName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}
