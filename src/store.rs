//! Submission storage

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::Submission;
use crate::validate::NormalizedData;

/// Exclusive owner of the submission collection.
///
/// Injected behind a trait so the HTTP layer never depends on where the
/// records live; `MemoryStore` is the only backing for now and tests can
/// substitute their own.
pub trait SubmissionStore: Send + Sync {
    /// Append a freshly created record. The caller guarantees a fresh id.
    fn insert(&self, submission: Submission);

    fn get(&self, id: Uuid) -> Option<Submission>;

    /// Replace a record's data wholesale and stamp `updated_at`.
    /// `id` and `created_at` are never touched.
    fn update(&self, id: Uuid, data: NormalizedData) -> Option<Submission>;

    /// Remove a record, reporting whether one was actually removed.
    fn delete(&self, id: Uuid) -> bool;

    /// Snapshot of the whole collection in insertion order.
    fn all(&self) -> Vec<Submission>;
}

/// In-memory store, process lifetime only. All data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, submission: Submission) {
        self.records.write().push(submission);
    }

    fn get(&self, id: Uuid) -> Option<Submission> {
        self.records.read().iter().find(|s| s.id == id).cloned()
    }

    fn update(&self, id: Uuid, data: NormalizedData) -> Option<Submission> {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|s| s.id == id)?;
        record.data = data;
        record.updated_at = Some(Utc::now());
        Some(record.clone())
    }

    fn delete(&self, id: Uuid) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|s| s.id != id);
        records.len() != before
    }

    fn all(&self) -> Vec<Submission> {
        self.records.read().clone()
    }
}
