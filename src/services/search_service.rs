use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use serde::Serialize;

use crate::{
    error::BackendError,
    models::place::{Place, PlaceQuery},
    services::backend_client::CatalogSource,
};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SearchResult {
    Results(Vec<Place>),
    /// A newer query arrived inside the debounce window.
    Superseded,
}

/// Debounces place searches for one builder session. Only the last query
/// typed within the window reaches the backend. Requests already sent are
/// not cancelled.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn search<C: CatalogSource>(
        &self,
        catalog: &C,
        text: &str,
    ) -> Result<SearchResult, BackendError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            return Ok(SearchResult::Superseded);
        }

        // an empty box restores the featured list
        let query = match text.trim() {
            "" => PlaceQuery::Featured,
            trimmed => PlaceQuery::Search(trimmed.to_string()),
        };
        let places = catalog.get_places(&query).await?;
        Ok(SearchResult::Results(places))
    }
}
