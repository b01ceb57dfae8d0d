// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use super::{
    api::PokemonSource,
    cycle::{CycleToken, CycleTracker},
};
use crate::{
    entities::{PageRequest, PokemonRef},
    utils::StarryError,
};

/// Where the current page is at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Rows are placeholders, the page fetch is outstanding
    Loading,
    Loaded,
    /// The page fetch failed, rows are empty until the request is retried
    Failed(StarryError),
}

/// The row list published by the listing pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRows {
    pub generation: u64,
    pub request: PageRequest,
    pub status: PageStatus,
    pub rows: Arc<[PokemonRef]>,
}

impl PageRows {
    pub fn loading(generation: u64, request: PageRequest) -> Self {
        Self {
            generation,
            request,
            status: PageStatus::Loading,
            rows: PokemonRef::placeholders(request.limit()).into(),
        }
    }

    pub fn loaded(generation: u64, request: PageRequest, rows: Vec<PokemonRef>) -> Self {
        Self {
            generation,
            request,
            status: PageStatus::Loaded,
            rows: rows.into(),
        }
    }

    pub fn failed(generation: u64, request: PageRequest, error: StarryError) -> Self {
        Self {
            generation,
            request,
            status: PageStatus::Failed(error),
            rows: Arc::new([]),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == PageStatus::Loading
    }
}

/// Starts the listing pipeline: one page fetch per published [`PageRequest`],
/// only the latest of which may publish.
pub fn spawn(
    source: Arc<dyn PokemonSource>,
    requests: watch::Receiver<PageRequest>,
) -> (watch::Receiver<PageRows>, JoinHandle<()>) {
    let initial = PageRows::loading(0, *requests.borrow());
    let (tx, rx) = watch::channel(initial);
    let handle = tokio::spawn(drive(source, requests, Arc::new(tx)));
    (rx, handle)
}

async fn drive(
    source: Arc<dyn PokemonSource>,
    mut requests: watch::Receiver<PageRequest>,
    rows: Arc<watch::Sender<PageRows>>,
) {
    let mut cycles = CycleTracker::default();

    loop {
        let request = *requests.borrow_and_update();
        let token = cycles.begin();

        // placeholders go out before the fetch is even issued
        rows.send_replace(PageRows::loading(token.generation(), request));
        tokio::spawn(load_page(
            Arc::clone(&source),
            request,
            token,
            requests.clone(),
            Arc::clone(&rows),
        ));

        if requests.changed().await.is_err() {
            tracing::debug!("pagination closed, stopping listing pipeline");
            break;
        }
    }
}

/// `requests` has seen `request`; once it sees anything newer the page is
/// stale, even if `drive` has not started the next cycle yet.
async fn load_page(
    source: Arc<dyn PokemonSource>,
    request: PageRequest,
    token: CycleToken,
    requests: watch::Receiver<PageRequest>,
    rows: Arc<watch::Sender<PageRows>>,
) {
    let page = match token.run(source.fetch_page(request)).await {
        Ok(refs) => {
            tracing::info!(
                offset = request.offset(),
                limit = request.limit(),
                count = refs.len(),
                "page loaded"
            );
            PageRows::loaded(token.generation(), request, refs)
        }
        Err(StarryError::Cancelled) => {
            tracing::debug!(offset = request.offset(), "page fetch superseded");
            return;
        }
        Err(e) => {
            tracing::warn!(offset = request.offset(), error = %e, "page fetch failed");
            PageRows::failed(token.generation(), request, e)
        }
    };

    let published = rows.send_if_modified(|current| {
        if current.generation != token.generation()
            || !matches!(requests.has_changed(), Ok(false))
        {
            return false;
        }
        *current = page;
        true
    });

    if !published {
        tracing::debug!(offset = request.offset(), "discarding stale page");
    }
}
