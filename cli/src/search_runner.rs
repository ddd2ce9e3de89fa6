use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use larder_core::models::{RecipeSummary, SearchQuery};

use crate::spoonacular::SpoonacularClient;

type SearchResult = larder_core::Result<Vec<RecipeSummary>>;

#[derive(Debug)]
pub enum SearchOutcome {
    Completed(Vec<RecipeSummary>),
    /// Aborted by [`SearchRunner::cancel`] or superseded by a newer search.
    Cancelled,
}

/// Result handle for one submitted search.
pub struct PendingSearch {
    rx: oneshot::Receiver<SearchResult>,
}

impl PendingSearch {
    pub async fn wait(self) -> larder_core::Result<SearchOutcome> {
        match self.rx.await {
            Ok(Ok(results)) => Ok(SearchOutcome::Completed(results)),
            Ok(Err(e)) => Err(e),
            // Sender dropped: the task was aborted before it could answer.
            Err(_) => Ok(SearchOutcome::Cancelled),
        }
    }
}

/// Runs recipe searches in the background, at most one at a time.
///
/// Submitting while a search is in flight aborts the older one.
pub struct SearchRunner {
    client: Arc<SpoonacularClient>,
    in_flight: Option<JoinHandle<()>>,
}

impl SearchRunner {
    pub fn new(client: Arc<SpoonacularClient>) -> Self {
        Self {
            client,
            in_flight: None,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn submit(&mut self, query: SearchQuery) -> PendingSearch {
        if self.cancel() {
            warn!(ingredients = %query.ingredients, "superseding in-flight search");
        }

        let (tx, rx) = oneshot::channel();
        let client = Arc::clone(&self.client);
        debug!(ingredients = %query.ingredients, "search submitted");
        self.in_flight = Some(tokio::spawn(async move {
            let result = client.search_async(&query).await;
            let _ = tx.send(result);
        }));
        PendingSearch { rx }
    }

    /// Abort the in-flight search. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for SearchRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
