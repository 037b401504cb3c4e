use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::{
    error::{BackendError, BuilderError},
    models::inquiry::{InquiryPayload, InquiryRecord},
    services::{search_service::SearchDebouncer, trip_builder::TripBuilder},
};

/// One custom package page: a builder plus its search box debouncer.
#[derive(Debug)]
pub struct BuilderSession {
    pub id: Uuid,
    builder: Mutex<TripBuilder>,
    last_touched: Mutex<DateTime<Utc>>,
    pub search: SearchDebouncer,
}

impl BuilderSession {
    fn new(search_delay: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            builder: Mutex::new(TripBuilder::new()),
            last_touched: Mutex::new(Utc::now()),
            search: SearchDebouncer::new(search_delay),
        }
    }

    /// Never hold this guard across an `.await`.
    pub fn builder(&self) -> MutexGuard<'_, TripBuilder> {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner) = Utc::now();
        self.builder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates and moves the builder to `Submitting`. The returned guard
    /// must be settled with `complete` or `fail`; dropping it unsettled (the
    /// request was cancelled mid-flight) reopens the builder.
    pub fn begin_submission(
        self: &Arc<Self>,
    ) -> Result<(InquiryPayload, SubmissionGuard), BuilderError> {
        let payload = self.builder().begin_submission()?;
        Ok((
            payload,
            SubmissionGuard {
                session: Some(self.clone()),
            },
        ))
    }
}

#[derive(Debug)]
pub struct SubmissionGuard {
    session: Option<Arc<BuilderSession>>,
}

impl SubmissionGuard {
    pub fn complete(mut self, inquiry: &InquiryRecord) {
        if let Some(session) = self.session.take() {
            session.builder().complete_submission(inquiry);
        }
    }

    pub fn fail(mut self, err: &BackendError) {
        if let Some(session) = self.session.take() {
            session.builder().fail_submission(err);
        }
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.builder().abandon_submission();
        }
    }
}

#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<BuilderSession>>>,
    search_delay: Duration,
    idle_ttl: chrono::Duration,
}

impl SessionRegistry {
    pub fn new(search_delay: Duration, idle_ttl: chrono::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            search_delay,
            idle_ttl,
        }
    }

    pub fn create(&self) -> Arc<BuilderSession> {
        self.prune_idle(Utc::now());

        let session = Arc::new(BuilderSession::new(self.search_delay));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<BuilderSession>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Drops every session left untouched for longer than the idle TTL.
    /// Handlers still holding an `Arc` keep working on their copy.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_touched() <= self.idle_ttl);

        let pruned = before - sessions.len();
        if pruned > 0 {
            info!("Pruned {} idle builder sessions", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
