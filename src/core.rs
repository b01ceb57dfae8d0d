// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use crate::{entities::PageRequest, utils::StarryError};

pub mod api;
mod cycle;
pub mod details;
pub mod listing;
pub mod pagination;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{DEFAULT_LISTING_URL, PokemonSource, StarryApi};
pub use details::DetailSnapshot;
pub use listing::{PageRows, PageStatus};
pub use pagination::Pagination;

/// Pagination plus the two pipelines hanging off it.
///
/// Dropping the core stops both pipelines and abandons whatever they were fetching.
#[derive(Debug)]
pub struct StarryCore {
    pagination: Pagination,
    rows: watch::Receiver<PageRows>,
    details: watch::Receiver<DetailSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl StarryCore {
    /// Starts paging `source` at `initial`; must be called inside a tokio runtime
    pub fn start(source: Arc<dyn PokemonSource>, initial: PageRequest) -> Self {
        let pagination = Pagination::new(initial);
        let (rows, listing_task) = listing::spawn(Arc::clone(&source), pagination.subscribe());
        let (details, details_task) = details::spawn(source, rows.clone());

        tracing::info!(
            offset = initial.offset(),
            limit = initial.limit(),
            "pipelines started"
        );

        StarryCore {
            pagination,
            rows,
            details,
            tasks: vec![listing_task, details_task],
        }
    }

    pub fn current_request(&self) -> PageRequest {
        self.pagination.current()
    }

    pub fn next_page(&self) -> PageRequest {
        self.pagination.next_page()
    }

    pub fn prev_page(&self) -> PageRequest {
        self.pagination.prev_page()
    }

    pub fn set_limit(&self, limit: u32) -> Result<PageRequest, StarryError> {
        self.pagination.set_limit(limit)
    }

    /// Re-issues the current page, e.g. after it failed to load
    pub fn retry(&self) -> PageRequest {
        self.pagination.republish()
    }

    /// Current row list, replayed to every new subscriber
    pub fn rows(&self) -> watch::Receiver<PageRows> {
        self.rows.clone()
    }

    /// Current detail map, replayed to every new subscriber
    pub fn details(&self) -> watch::Receiver<DetailSnapshot> {
        self.details.clone()
    }
}

impl Drop for StarryCore {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
