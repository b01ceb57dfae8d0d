// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use super::{
    api::PokemonSource,
    cycle::{CycleToken, CycleTracker},
    listing::PageRows,
};
use crate::{
    entities::{DetailMap, PokemonDetail, PokemonRef},
    utils::StarryError,
};

/// The detail map published by the detail-join pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailSnapshot {
    pub generation: u64,
    /// Generation of the row list these details belong to
    pub page_generation: u64,
    pub details: Arc<DetailMap>,
}

impl DetailSnapshot {
    pub fn get(&self, name: &str) -> Option<&Arc<PokemonDetail>> {
        self.details.get(name)
    }
}

/// Details gathered so far by one cycle, dropped with it
#[derive(Debug, Default)]
struct DetailAccumulator {
    details: DetailMap,
}

impl DetailAccumulator {
    fn merge(&mut self, row: &PokemonRef, detail: PokemonDetail) {
        if row.name != detail.name {
            tracing::debug!(row = %row.name, detail = %detail.name, "detail name differs from listing");
        }
        self.details.insert(row.name.clone(), Arc::new(detail));
    }

    fn snapshot(&self) -> Arc<DetailMap> {
        Arc::new(self.details.clone())
    }
}

/// Starts the detail-join pipeline over the rows published by the listing pipeline
pub fn spawn(
    source: Arc<dyn PokemonSource>,
    rows: watch::Receiver<PageRows>,
) -> (watch::Receiver<DetailSnapshot>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(DetailSnapshot::default());
    let handle = tokio::spawn(drive(source, rows, Arc::new(tx)));
    (rx, handle)
}

async fn drive(
    source: Arc<dyn PokemonSource>,
    mut rows: watch::Receiver<PageRows>,
    snapshots: Arc<watch::Sender<DetailSnapshot>>,
) {
    let mut cycles = CycleTracker::default();

    loop {
        let page = rows.borrow_and_update().clone();
        let token = cycles.begin();

        snapshots.send_replace(DetailSnapshot {
            generation: token.generation(),
            page_generation: page.generation,
            details: Arc::default(),
        });
        tokio::spawn(join_details(
            Arc::clone(&source),
            page,
            token,
            rows.clone(),
            Arc::clone(&snapshots),
        ));

        if rows.changed().await.is_err() {
            tracing::debug!("listing closed, stopping detail pipeline");
            break;
        }
    }
}

/// Fetches the details of `page` one row at a time, in row order.
///
/// A merge is published only while `page` is still the latest row list and
/// this cycle still owns the snapshot; the listing may publish new rows before
/// `drive` gets around to superseding this cycle.
async fn join_details(
    source: Arc<dyn PokemonSource>,
    page: PageRows,
    token: CycleToken,
    rows: watch::Receiver<PageRows>,
    snapshots: Arc<watch::Sender<DetailSnapshot>>,
) {
    let mut accumulator = DetailAccumulator::default();

    for row in page.rows.iter() {
        if row.is_placeholder() || row.name.is_empty() {
            continue;
        }

        match token.run(source.fetch_detail(&row.url)).await {
            Ok(detail) => accumulator.merge(row, detail),
            Err(StarryError::Cancelled) => {
                tracing::debug!(row = %row.name, "detail chain superseded");
                return;
            }
            Err(e) => {
                tracing::warn!(row = %row.name, error = %e, "detail fetch failed, leaving row empty");
                continue;
            }
        }

        let published = snapshots.send_if_modified(|current| {
            if current.generation != token.generation()
                || !Arc::ptr_eq(&rows.borrow().rows, &page.rows)
            {
                return false;
            }
            current.details = accumulator.snapshot();
            true
        });

        if !published {
            tracing::debug!(row = %row.name, "discarding stale details");
            return;
        }
    }

    tracing::debug!(
        page = page.generation,
        resolved = accumulator.details.len(),
        "detail chain complete"
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::testing::{ScriptedSource, drain, refs},
        entities::PageRequest,
    };

    fn loaded(generation: u64, names: &[&str]) -> PageRows {
        PageRows::loaded(generation, PageRequest::default(), refs(names))
    }

    fn keys(snapshot: &DetailSnapshot) -> Vec<String> {
        let mut keys: Vec<String> = snapshot.details.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[tokio::test(start_paused = true)]
    async fn entries_fill_in_row_order_whatever_the_latency() {
        let source = ScriptedSource::builder()
            .detail("name1", 300)
            .detail("name2", 10)
            .detail("name3", 100)
            .build();
        let (_rows_tx, rows_rx) = watch::channel(loaded(1, &["name1", "name2", "name3"]));
        let (mut snapshots, _handle) = spawn(source.clone(), rows_rx);

        let published = drain(&mut snapshots, Duration::from_secs(1)).await;
        let fills: Vec<Vec<String>> = published
            .iter()
            .filter(|snapshot| !snapshot.details.is_empty())
            .map(keys)
            .collect();

        assert_eq!(
            fills,
            vec![
                vec!["name1".to_string()],
                vec!["name1".to_string(), "name2".to_string()],
                vec![
                    "name1".to_string(),
                    "name2".to_string(),
                    "name3".to_string()
                ],
            ]
        );
        assert_eq!(source.details_finished(), vec!["name1", "name2", "name3"]);
        assert_eq!(source.max_details_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn placeholders_never_reach_the_network() {
        let source = ScriptedSource::builder().build();
        let placeholders = PageRows::loading(1, PageRequest::new(0, 4).unwrap());
        let (_rows_tx, rows_rx) = watch::channel(placeholders);
        let (mut snapshots, _handle) = spawn(source.clone(), rows_rx);

        let published = drain(&mut snapshots, Duration::from_millis(200)).await;

        assert!(published.iter().all(|snapshot| snapshot.details.is_empty()));
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_rows_mixed_with_real_rows_are_skipped() {
        let source = ScriptedSource::builder().build();
        let mut rows = refs(&["mew"]);
        rows.insert(0, PokemonRef::placeholder());
        let page = PageRows::loaded(1, PageRequest::default(), rows);
        let (_rows_tx, rows_rx) = watch::channel(page);
        let (mut snapshots, _handle) = spawn(source.clone(), rows_rx);

        drain(&mut snapshots, Duration::from_millis(200)).await;

        assert_eq!(keys(&snapshots.borrow()), vec!["mew"]);
        assert_eq!(source.details_started(), vec!["mew"]);
        assert!(snapshots.borrow().get("").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_row_does_not_poison_the_page() {
        let source = ScriptedSource::builder()
            .failing_detail("missingno")
            .build();
        let (_rows_tx, rows_rx) = watch::channel(loaded(1, &["abra", "missingno", "kadabra"]));
        let (mut snapshots, _handle) = spawn(source.clone(), rows_rx);

        drain(&mut snapshots, Duration::from_millis(200)).await;

        assert_eq!(keys(&snapshots.borrow()), vec!["abra", "kadabra"]);
    }

    #[tokio::test(start_paused = true)]
    async fn new_rows_abandon_the_running_chain() {
        let source = ScriptedSource::builder()
            .detail("old-1", 300)
            .detail("new-1", 10)
            .build();
        let (rows_tx, rows_rx) = watch::channel(loaded(1, &["old-1", "old-2"]));
        let (mut snapshots, _handle) = spawn(source.clone(), rows_rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        rows_tx.send_replace(loaded(2, &["new-1"]));

        let published = drain(&mut snapshots, Duration::from_secs(1)).await;

        assert!(
            published
                .iter()
                .all(|snapshot| snapshot.get("old-1").is_none())
        );
        let last = published.last().unwrap();
        assert_eq!(last.page_generation, 2);
        assert_eq!(keys(last), vec!["new-1"]);
        assert_eq!(source.details_started(), vec!["old-1", "new-1"]);
        assert!(!source.details_finished().contains(&"old-1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn chain_goes_quiet_as_soon_as_rows_move_on() {
        let source = ScriptedSource::builder().detail("old-1", 50).build();
        let old = loaded(1, &["old-1", "old-2"]);
        let (rows_tx, rows_rx) = watch::channel(old.clone());

        // the cycle still owns the snapshot, as before `drive` reacts to new rows
        let mut cycles = CycleTracker::default();
        let token = cycles.begin();
        let (snapshots_tx, snapshots) = watch::channel(DetailSnapshot {
            generation: token.generation(),
            page_generation: old.generation,
            details: Arc::default(),
        });

        let chain = tokio::spawn(join_details(
            source.clone(),
            old,
            token,
            rows_rx,
            Arc::new(snapshots_tx),
        ));
        tokio::time::sleep(Duration::from_millis(10)).await;
        rows_tx.send_replace(loaded(2, &["new-1"]));
        chain.await.unwrap();

        assert!(snapshots.borrow().details.is_empty());
        assert_eq!(source.details_finished(), vec!["old-1"]);
    }
}
