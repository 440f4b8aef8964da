//! Ephemeral, in-process session store. Nothing here survives a restart.
//!
//! Each submission owns its own session id, so concurrent reviews never see each
//! other's in-flight state. Locks are never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::document::DocumentSummary;
use crate::models::review::{ReviewMode, ReviewSession};
use crate::review::interpret::StageNotice;
use crate::review::orchestrator::{ProgressReporter, ReviewStage};

/// A finished review as held for the caller.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub session: ReviewSession,
    pub notices: Vec<StageNotice>,
    pub document: DocumentSummary,
    pub mode: ReviewMode,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct ProgressEntry {
    stage: ReviewStage,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    reviews: HashMap<Uuid, StoredReview>,
    progress: HashMap<Uuid, ProgressEntry>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            ttl,
        }
    }

    // Every write is a single insert or retain, so a poisoned lock still holds consistent maps.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn is_live(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - at < self.ttl
    }

    /// Stores a review, replacing any previous review under the same id wholesale.
    pub fn put(&self, id: Uuid, review: StoredReview) {
        let now = Utc::now();
        let mut inner = self.write();
        inner.reviews.retain(|_, r| now - r.created_at < self.ttl);
        inner.progress.retain(|_, p| now - p.updated_at < self.ttl);
        inner.reviews.insert(id, review);
    }

    pub fn get(&self, id: Uuid) -> Option<StoredReview> {
        let now = Utc::now();
        self.read()
            .reviews
            .get(&id)
            .filter(|r| self.is_live(r.created_at, now))
            .cloned()
    }

    pub fn set_progress(&self, id: Uuid, stage: ReviewStage) {
        self.write().progress.insert(
            id,
            ProgressEntry {
                stage,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn progress(&self, id: Uuid) -> Option<ReviewStage> {
        let now = Utc::now();
        self.read()
            .progress
            .get(&id)
            .filter(|p| self.is_live(p.updated_at, now))
            .map(|p| p.stage)
    }

    pub fn len(&self) -> usize {
        self.read().reviews.len()
    }

    /// A reporter that records progress for `id` in this store.
    pub fn reporter(&self, id: Uuid) -> StoreProgress {
        StoreProgress {
            store: self.clone(),
            id,
        }
    }
}

/// Writes each checkpoint to the store so the caller can poll it.
pub struct StoreProgress {
    store: SessionStore,
    id: Uuid,
}

impl ProgressReporter for StoreProgress {
    fn report(&self, stage: ReviewStage) {
        tracing::info!(
            "Review {} progress: {}% ({:?})",
            self.id,
            stage.percent(),
            stage
        );
        self.store.set_progress(self.id, stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::{MetricsResult, TimelineResult};

    fn review(feedback: &str, created_at: DateTime<Utc>) -> StoredReview {
        StoredReview {
            session: ReviewSession::new(
                MetricsResult::default(),
                TimelineResult::default(),
                feedback.to_string(),
            ),
            notices: vec![],
            document: DocumentSummary::new(None, 10),
            mode: ReviewMode::Student,
            created_at,
        }
    }

    #[test]
    fn test_put_then_get() {
        let store = SessionStore::new(Duration::minutes(60));
        let id = Uuid::new_v4();
        store.put(id, review("first", Utc::now()));
        assert_eq!(store.get(id).unwrap().session.feedback, "first");
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_resubmission_replaces_wholesale() {
        let store = SessionStore::new(Duration::minutes(60));
        let id = Uuid::new_v4();
        store.put(id, review("first", Utc::now()));
        store.put(id, review("second", Utc::now()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().session.feedback, "second");
    }

    #[test]
    fn test_expired_reviews_hidden_and_evicted() {
        let store = SessionStore::new(Duration::minutes(60));
        let old = Uuid::new_v4();
        store.put(old, review("old", Utc::now() - Duration::minutes(61)));
        assert!(store.get(old).is_none());

        store.put(Uuid::new_v4(), review("new", Utc::now()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::minutes(60));
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.put(a, review("alice", Utc::now()));
        store.put(b, review("bob", Utc::now()));
        store.set_progress(a, ReviewStage::MetricsScored);

        assert_eq!(store.get(a).unwrap().session.feedback, "alice");
        assert_eq!(store.get(b).unwrap().session.feedback, "bob");
        assert_eq!(store.progress(a), Some(ReviewStage::MetricsScored));
        assert_eq!(store.progress(b), None);
    }

    #[test]
    fn test_reporter_records_progress() {
        let store = SessionStore::new(Duration::minutes(60));
        let id = Uuid::new_v4();
        let reporter = store.reporter(id);
        reporter.report(ReviewStage::Started);
        reporter.report(ReviewStage::TimelineExtracted);
        assert_eq!(store.progress(id), Some(ReviewStage::TimelineExtracted));
    }
}
