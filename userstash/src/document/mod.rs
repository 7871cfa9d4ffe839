// Document model - one JSON object holding the whole user collection

use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};

/// One user record. An open-ended JSON object; the only field the system
/// interprets is `id`, an integer assigned on create.
pub type UserRecord = serde_json::Map<String, serde_json::Value>;

/// The persisted document: all user records, in insertion order.
/// Extra top-level fields in the stored file (the seed endpoint returns
/// `total`/`skip`/`limit` alongside `users`) are ignored on load and
/// dropped on the first save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<UserRecord>,
}

impl Document {
    /// Integer id of a record, if it carries one.
    pub fn record_id(record: &UserRecord) -> Option<i64> {
        record.get("id").and_then(|v| v.as_i64())
    }

    /// Next id to assign: the maximum over all integer ids, plus one.
    /// An empty collection (or one with no integer ids) starts at 1.
    /// Records without an integer id are skipped, so out-of-order or
    /// gappy collections still yield a fresh id.
    pub fn next_id(&self) -> i64 {
        self.users
            .iter()
            .filter_map(Self::record_id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// Parse an id path/CLI parameter into the collection's id type.
/// Comparison downstream is by integer value; there is no duck-typed
/// coercion against stored records.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| StashError::InvalidId(raw.to_string()))
}
