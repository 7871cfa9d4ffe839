use crate::document::{Document, UserRecord};
use crate::error::{Result, StashError};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-backed store for the user document.
///
/// Every operation is one full read-modify-write cycle: load the whole
/// document, scan or mutate it in memory, and (for writes) overwrite the
/// file in one piece. Disk is the single source of truth; nothing is
/// cached between calls, so each call pays O(document size). All file
/// access goes through `load`/`save`, keeping the backend swappable
/// without touching callers.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Create a store handle for the given document path.
    /// The file is not touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UserStore { path: path.into() }
    }

    /// Path of the backing document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse the whole document from disk.
    pub fn load(&self) -> Result<Document> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Serialize the whole document and overwrite the file.
    pub fn save(&self, document: &Document) -> Result<()> {
        self.write_raw(&serde_json::to_string(document)?)
    }

    /// Write raw bytes as the new document file, creating parent
    /// directories as needed. The bytes land in a temp file in the target
    /// directory and are renamed into place, so a crash mid-write cannot
    /// leave a torn document. Also used by the seed loader, which
    /// persists the fetched body verbatim.
    pub fn write_raw(&self, raw: &str) -> Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| StashError::Io(e.error))?;
        Ok(())
    }

    // ── CRUD operations ─────────────────────────────────────────────

    /// All records, in stored order.
    pub fn list(&self) -> Result<Vec<UserRecord>> {
        Ok(self.load()?.users)
    }

    /// First record whose integer `id` equals the given id.
    pub fn get(&self, id: i64) -> Result<UserRecord> {
        self.load()?
            .users
            .into_iter()
            .find(|record| Document::record_id(record) == Some(id))
            .ok_or(StashError::NotFound { id })
    }

    /// Append a new record, assigning it the next free id. Any `id` the
    /// caller supplied is overwritten. Returns the assigned id only, not
    /// the full record.
    pub fn create(&self, body: Value) -> Result<i64> {
        let mut record = object_body(body)?;
        let mut document = self.load()?;

        let id = document.next_id();
        record.insert("id".to_string(), Value::from(id));
        document.users.push(record);

        self.save(&document)?;
        Ok(id)
    }

    /// Replace every record carrying the given id wholesale with `body`,
    /// forcing the `id` field back to the matched value afterwards.
    /// Returns the full updated collection; errors without writing when
    /// nothing matched.
    pub fn replace(&self, id: i64, body: Value) -> Result<Vec<UserRecord>> {
        let replacement = object_body(body)?;
        let mut document = self.load()?;

        let mut matched = false;
        for record in document.users.iter_mut() {
            if Document::record_id(record) == Some(id) {
                *record = replacement.clone();
                record.insert("id".to_string(), Value::from(id));
                matched = true;
            }
        }
        if !matched {
            return Err(StashError::NotFound { id });
        }

        self.save(&document)?;
        Ok(document.users)
    }

    /// Remove every record carrying the given id. Duplicated ids are all
    /// removed in one pass. Returns the remaining collection; errors
    /// without writing when nothing matched.
    pub fn remove(&self, id: i64) -> Result<Vec<UserRecord>> {
        let mut document = self.load()?;

        let before = document.users.len();
        document
            .users
            .retain(|record| Document::record_id(record) != Some(id));
        if document.users.len() == before {
            return Err(StashError::NotFound { id });
        }

        self.save(&document)?;
        Ok(document.users)
    }
}

/// Require a non-empty JSON object body for create/replace.
fn object_body(body: Value) -> Result<UserRecord> {
    match body {
        Value::Object(map) if !map.is_empty() => Ok(map),
        Value::Object(_) => Err(StashError::InvalidBody("empty body".to_string())),
        _ => Err(StashError::InvalidBody(
            "expected a JSON object".to_string(),
        )),
    }
}
