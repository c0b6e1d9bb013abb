//! In-memory data source, optionally backed by a JSON file.
//!
//! The CLI reads a JSON array of records from disk and writes it back after
//! every successful mutation. Tests use the same type without a file and
//! queue failures to exercise the screen's error paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use comptoir_listing::Listable;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SourceError;
use crate::source::{DataSource, Scope, SourceFuture};

#[derive(Debug, Default)]
struct Failures {
    fetch: Option<SourceError>,
    delete: Option<SourceError>,
    update: Option<SourceError>,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Fetch,
    Delete,
    Update,
}

/// A [`DataSource`] holding its records in memory.
#[derive(Debug)]
pub struct MemorySource<R> {
    records: RwLock<Vec<R>>,
    scope_field: Option<String>,
    file: Option<PathBuf>,
    failures: Mutex<Failures>,
    fetches: AtomicUsize,
    deletes: AtomicUsize,
    updates: AtomicUsize,
}

impl<R> MemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        MemorySource {
            records: RwLock::new(records),
            scope_field: None,
            file: None,
            failures: Mutex::new(Failures::default()),
            fetches: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Loads a JSON array of records from `path` and writes changes back to
    /// it.
    pub fn open(path: &Path) -> crate::Result<Self>
    where
        R: DeserializeOwned,
    {
        let text = std::fs::read_to_string(path)?;
        let records: Vec<R> = serde_json::from_str(&text)?;
        log::debug!("loaded {} records from {}", records.len(), path.display());
        let mut source = Self::new(records);
        source.file = Some(path.to_path_buf());
        Ok(source)
    }

    /// Restricts scoped fetches to records whose `field` equals the scope.
    pub fn scoped_by(mut self, field: impl Into<String>) -> Self {
        self.scope_field = Some(field.into());
        self
    }

    /// Makes the next fetch fail with `err`.
    pub fn fail_next_fetch(&self, err: SourceError) {
        self.failures().fetch = Some(err);
    }

    /// Makes the next delete fail with `err`.
    pub fn fail_next_delete(&self, err: SourceError) {
        self.failures().delete = Some(err);
    }

    /// Makes the next update fail with `err`.
    pub fn fail_next_update(&self, err: SourceError) {
        self.failures().update = Some(err);
    }

    /// Number of fetches issued so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of deletes issued so far, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of updates issued so far, successful or not.
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// A copy of the stored records.
    pub fn snapshot(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn failures(&self) -> std::sync::MutexGuard<'_, Failures> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_failure(&self, op: Op) -> Option<SourceError> {
        let mut failures = self.failures();
        match op {
            Op::Fetch => failures.fetch.take(),
            Op::Delete => failures.delete.take(),
            Op::Update => failures.update.take(),
        }
    }

    fn persist(&self, records: &[R]) -> Result<(), SourceError>
    where
        R: Serialize,
    {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(records).map_err(server)?;
        std::fs::write(path, text).map_err(server)?;
        log::debug!("wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

fn server(err: impl fmt::Display) -> SourceError {
    SourceError::Server(err.to_string())
}

/// Shallow merge of a JSON object patch into a serialized record.
fn merge_patch(target: &mut serde_json::Value, patch: &serde_json::Value) -> Result<(), SourceError> {
    let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) else {
        return Err(SourceError::Server("update patch must be a JSON object".into()));
    };
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
    Ok(())
}

impl<R> DataSource<R> for MemorySource<R>
where
    R: Listable + Clone + Serialize + DeserializeOwned + Send + Sync,
    R::Id: fmt::Display + Send + Sync,
{
    fn fetch<'a>(&'a self, scope: Option<&'a Scope>) -> SourceFuture<'a, Vec<R>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.take_failure(Op::Fetch) {
                return Err(err);
            }

            let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
            let fetched = match (scope, self.scope_field.as_deref()) {
                (Some(scope), Some(field)) => records
                    .iter()
                    .filter(|record| record.field(field).as_str() == Some(scope.as_str()))
                    .cloned()
                    .collect(),
                _ => records.clone(),
            };
            Ok(fetched)
        })
    }

    fn delete<'a>(&'a self, id: &'a R::Id) -> SourceFuture<'a, ()> {
        Box::pin(async move {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.take_failure(Op::Delete) {
                return Err(err);
            }

            let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let position = records
                .iter()
                .position(|record| record.id() == id)
                .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
            let mut remaining = records.clone();
            remaining.remove(position);
            self.persist(&remaining)?;
            *records = remaining;
            Ok(())
        })
    }

    fn update<'a>(&'a self, id: &'a R::Id, patch: &'a serde_json::Value) -> SourceFuture<'a, R> {
        Box::pin(async move {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.take_failure(Op::Update) {
                return Err(err);
            }

            let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let position = records
                .iter()
                .position(|record| record.id() == id)
                .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

            let mut value = serde_json::to_value(&records[position]).map_err(server)?;
            merge_patch(&mut value, patch)?;
            let updated: R = serde_json::from_value(value).map_err(server)?;
            if updated.id() != id {
                return Err(SourceError::Server(
                    "update must not change the record identifier".into(),
                ));
            }

            let mut next = records.clone();
            next[position] = updated.clone();
            self.persist(&next)?;
            *records = next;
            Ok(updated)
        })
    }
}
