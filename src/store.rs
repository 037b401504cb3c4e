//! Per-domain state containers.
//!
//! Every domain gets its own store with an explicit action enum and a pure
//! `reduce`. Stores live for the whole process and only change through
//! `dispatch`; there is no global store.

use std::{
    future::Future,
    sync::{PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use log::error;
use serde::Serialize;

use crate::{
    error::BackendError,
    models::{
        catalog::{CatalogEntry, Driver, TourGuide, Vehicle},
        inquiry::InquiryRecord,
        place::Place,
    },
};

pub trait Reducer: Default {
    type Action;

    fn reduce(&mut self, action: Self::Action);
}

#[derive(Debug, Default)]
pub struct Store<S> {
    state: RwLock<S>,
}

impl<S: Reducer + Clone> Store<S> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(S::default()),
        }
    }

    pub fn dispatch(&self, action: S::Action) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.reduce(action);
    }

    pub fn snapshot(&self) -> S {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl<T> Default for CatalogState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            loaded_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CatalogAction<T> {
    Loading,
    Loaded(Vec<T>),
    Failed(String),
    Reset,
}

impl<T> Reducer for CatalogState<T> {
    type Action = CatalogAction<T>;

    fn reduce(&mut self, action: CatalogAction<T>) {
        match action {
            CatalogAction::Loading => {
                self.loading = true;
                self.error = None;
            }
            CatalogAction::Loaded(items) => {
                self.items = items;
                self.loading = false;
                self.error = None;
                self.loaded_at = Some(Utc::now());
            }
            // keep whatever was loaded before
            CatalogAction::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CatalogAction::Reset => *self = Self::default(),
        }
    }
}

impl<T: CatalogEntry + Clone> CatalogState<T> {
    pub fn find(&self, id: &str) -> Option<T> {
        self.items.iter().find(|item| item.id() == id).cloned()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryState {
    pub inquiries: Vec<InquiryRecord>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum InquiryAction {
    Created(InquiryRecord),
    Failed(String),
    Reset,
}

impl Reducer for InquiryState {
    type Action = InquiryAction;

    fn reduce(&mut self, action: InquiryAction) {
        match action {
            InquiryAction::Created(record) => {
                self.inquiries.push(record);
                self.error = None;
            }
            InquiryAction::Failed(message) => self.error = Some(message),
            InquiryAction::Reset => *self = Self::default(),
        }
    }
}

/// Runs a catalog fetch, recording the loading flag and outcome in `store`.
pub async fn track_load<T, F>(
    store: &Store<CatalogState<T>>,
    fetch: F,
) -> Result<Vec<T>, BackendError>
where
    T: Clone,
    F: Future<Output = Result<Vec<T>, BackendError>>,
{
    store.dispatch(CatalogAction::Loading);
    match fetch.await {
        Ok(items) => {
            store.dispatch(CatalogAction::Loaded(items.clone()));
            Ok(items)
        }
        Err(err) => {
            error!("Catalog load failed: {}", err);
            store.dispatch(CatalogAction::Failed(err.to_string()));
            Err(err)
        }
    }
}

/// Returns the cached catalog, fetching it through `track_load` only when it
/// has never loaded successfully.
pub async fn load_if_empty<T, F, Fut>(
    store: &Store<CatalogState<T>>,
    fetch: F,
) -> Result<Vec<T>, BackendError>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, BackendError>>,
{
    if let Some(items) = store.read(|s| s.loaded_at.map(|_| s.items.clone())) {
        return Ok(items);
    }
    track_load(store, fetch()).await
}

#[derive(Debug, Default)]
pub struct Stores {
    pub places: Store<CatalogState<Place>>,
    pub vehicles: Store<CatalogState<Vehicle>>,
    pub tour_guides: Store<CatalogState<TourGuide>>,
    pub drivers: Store<CatalogState<Driver>>,
    pub custom_inquiries: Store<InquiryState>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
