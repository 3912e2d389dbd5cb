use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SCHEDULED_FASTS: &str = "scheduled_fasts";
pub const COMMUNITY_FASTS: &str = "community_fasts";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => data.get(field) == Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set(Value),
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub collection: String,
    pub id: String,
    pub op: WriteOp,
}

/// Writes applied together by [`DocumentStore::commit`], all or nothing.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: &str, id: &str, data: Value) -> &mut Self {
        self.writes.push(Write {
            collection: collection.to_string(),
            id: id.to_string(),
            op: WriteOp::Set(data),
        });
        self
    }

    pub fn delete(&mut self, collection: &str, id: &str) -> &mut Self {
        self.writes.push(Write {
            collection: collection.to_string(),
            id: id.to_string(),
            op: WriteOp::Delete,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

pub trait DocumentStore {
    fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Database {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
}

/// A JSON document database kept in a single file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn from_path(path: PathBuf) -> Self {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                let _ = fs::create_dir_all(parent);
            }
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Database, StoreError> {
        if !self.path.exists() {
            return Ok(Database::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let db = serde_json::from_str(&data)?;
        Ok(db)
    }

    fn save(&self, db: &Database) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(db)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let db = self.load()?;
        let docs = match db.collections.get(collection) {
            Some(docs) => docs
                .iter()
                .filter(|(_, data)| filter.matches(data))
                .map(|(id, data)| Document {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(docs)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        for write in batch.writes() {
            validate_write(write)?;
        }

        let mut db = self.load()?;
        for write in batch.into_writes() {
            match write.op {
                WriteOp::Set(data) => {
                    db.collections
                        .entry(write.collection)
                        .or_default()
                        .insert(write.id, data);
                }
                WriteOp::Delete => {
                    if let Some(docs) = db.collections.get_mut(&write.collection) {
                        docs.remove(&write.id);
                        if docs.is_empty() {
                            db.collections.remove(&write.collection);
                        }
                    }
                }
            }
        }
        self.save(&db)
    }
}

fn validate_collection(collection: &str) -> Result<(), StoreError> {
    if collection.is_empty() || collection.split('/').any(str::is_empty) {
        return Err(StoreError::invalid_path(format!(
            "bad collection name {:?}",
            collection
        )));
    }
    Ok(())
}

fn validate_write(write: &Write) -> Result<(), StoreError> {
    validate_collection(&write.collection)?;
    if write.id.is_empty() || write.id.contains('/') {
        return Err(StoreError::invalid_path(format!(
            "bad document id {:?} in {}",
            write.id, write.collection
        )));
    }
    if let WriteOp::Set(data) = &write.op {
        if !data.is_object() {
            return Err(StoreError::InvalidDocument {
                collection: write.collection.clone(),
                id: write.id.clone(),
                reason: "document body must be a JSON object".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_store_commit_query() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileStore::from_path(dir.path().join("db.json"));

        let mut batch = WriteBatch::new();
        batch
            .set(SCHEDULED_FASTS, "a", json!({"isActive": true}))
            .set(SCHEDULED_FASTS, "b", json!({"isActive": false}));
        store.commit(batch)?;

        let active = store.query(SCHEDULED_FASTS, &Filter::eq("isActive", true))?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");

        let all = store.query(SCHEDULED_FASTS, &Filter::All)?;
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[test]
    fn test_store_query_nonexistent() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileStore::from_path(dir.path().join("nonexistent.json"));

        let docs = store.query(COMMUNITY_FASTS, &Filter::All)?;
        assert!(docs.is_empty());

        Ok(())
    }

    #[test]
    fn test_store_empty_commit_is_noop() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("db.json");
        let store = FileStore::from_path(path.clone());

        store.commit(WriteBatch::new())?;
        assert!(!path.exists());

        Ok(())
    }

    #[test]
    fn test_store_delete_and_nested_collection() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileStore::from_path(dir.path().join("db.json"));

        let mut batch = WriteBatch::new();
        batch.set("users/u1/friends", "f1", json!({"name": "x"}));
        store.commit(batch)?;
        assert_eq!(store.query("users/u1/friends", &Filter::All)?.len(), 1);

        let mut batch = WriteBatch::new();
        batch
            .delete("users/u1/friends", "f1")
            .delete("users/u1/friends", "missing");
        store.commit(batch)?;
        assert!(store.query("users/u1/friends", &Filter::All)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_store_rejects_whole_batch_on_bad_write() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileStore::from_path(dir.path().join("db.json"));

        let mut batch = WriteBatch::new();
        batch
            .set(SCHEDULED_FASTS, "ok", json!({"isActive": true}))
            .set("users//friends", "", json!({}));
        let err = store.commit(batch).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        assert!(store.query(SCHEDULED_FASTS, &Filter::All)?.is_empty());

        let mut batch = WriteBatch::new();
        batch.set(SCHEDULED_FASTS, "x", json!(42));
        let err = store.commit(batch).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { .. }));

        Ok(())
    }
}
