// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::watch;

use crate::{entities::PageRequest, utils::StarryError};

/// Owns the current [`PageRequest`] and republishes it on every user action.
///
/// Every mutator publishes, even when the value did not change, so that
/// going back from the first page or retrying re-issues the fetch.
#[derive(Debug)]
pub struct Pagination {
    tx: watch::Sender<PageRequest>,
}

impl Pagination {
    pub fn new(initial: PageRequest) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> PageRequest {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageRequest> {
        self.tx.subscribe()
    }

    pub fn next_page(&self) -> PageRequest {
        self.publish(self.current().next())
    }

    pub fn prev_page(&self) -> PageRequest {
        self.publish(self.current().prev())
    }

    /// Changes the page size without touching the offset
    pub fn set_limit(&self, limit: u32) -> Result<PageRequest, StarryError> {
        let request = self.current().with_limit(limit)?;
        Ok(self.publish(request))
    }

    pub fn republish(&self) -> PageRequest {
        self.publish(self.current())
    }

    fn publish(&self, request: PageRequest) -> PageRequest {
        tracing::debug!(offset = request.offset(), limit = request.limit(), "page requested");
        self.tx.send_replace(request);
        request
    }
}
