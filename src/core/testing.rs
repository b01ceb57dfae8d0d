// SPDX-License-Identifier: GPL-3.0-only

//! Scripted [`PokemonSource`] with fake latencies, for paused-clock tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::watch;

use super::api::PokemonSource;
use crate::{
    entities::{PageRequest, PokemonDetail, PokemonRef},
    utils::StarryError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Page(u32),
    DetailStarted(String),
    DetailFinished(String),
}

type PageScript = (Duration, Result<Vec<PokemonRef>, StarryError>);

#[derive(Debug, Default)]
pub struct ScriptedSource {
    pages: Mutex<HashMap<u32, VecDeque<PageScript>>>,
    detail_latency: HashMap<String, Duration>,
    failing_details: Vec<String>,
    calls: Mutex<Vec<Call>>,
    in_flight: Mutex<(usize, usize)>,
}

pub fn url_for(name: &str) -> String {
    format!("https://pokeapi.test/api/v2/pokemon/{name}/")
}

pub fn refs(names: &[&str]) -> Vec<PokemonRef> {
    names
        .iter()
        .map(|name| PokemonRef {
            name: name.to_string(),
            url: url_for(name),
        })
        .collect()
}

pub fn names(rows: &[PokemonRef]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

/// Collects every value published on `rx` until it stays quiet for `quiet`
pub async fn drain<T: Clone>(rx: &mut watch::Receiver<T>, quiet: Duration) -> Vec<T> {
    let mut seen = vec![rx.borrow_and_update().clone()];
    while let Ok(Ok(())) = tokio::time::timeout(quiet, rx.changed()).await {
        seen.push(rx.borrow_and_update().clone());
    }
    seen
}

impl ScriptedSource {
    pub fn builder() -> ScriptedSourceBuilder {
        ScriptedSourceBuilder::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Page(offset) => Some(offset),
                _ => None,
            })
            .collect()
    }

    pub fn details_started(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DetailStarted(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn details_finished(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DetailFinished(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn max_details_in_flight(&self) -> usize {
        self.in_flight.lock().unwrap().1
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Builds an `Arc<ScriptedSource>`, which is what the pipelines take
#[derive(Debug, Default)]
pub struct ScriptedSourceBuilder {
    source: ScriptedSource,
}

impl ScriptedSourceBuilder {
    /// Queues a page answer for `offset`, the last queued answer repeats
    pub fn page(self, offset: u32, latency_ms: u64, names: &[&str]) -> Self {
        self.push_page(offset, latency_ms, Ok(refs(names)))
    }

    pub fn failing_page(self, offset: u32, latency_ms: u64) -> Self {
        let error = StarryError::network("https://pokeapi.test/api/v2/pokemon", "status 503");
        self.push_page(offset, latency_ms, Err(error))
    }

    /// Consecutive names `prefix-{start}..prefix-{start + count}` at `offset`
    pub fn numbered_page(self, offset: u32, latency_ms: u64, prefix: &str, count: u32) -> Self {
        let names: Vec<String> = (offset..offset + count)
            .map(|n| format!("{prefix}-{n}"))
            .collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.page(offset, latency_ms, &names)
    }

    pub fn detail(mut self, name: &str, latency_ms: u64) -> Self {
        self.source
            .detail_latency
            .insert(name.to_string(), Duration::from_millis(latency_ms));
        self
    }

    pub fn failing_detail(mut self, name: &str) -> Self {
        self.source.failing_details.push(name.to_string());
        self
    }

    fn push_page(
        self,
        offset: u32,
        latency_ms: u64,
        result: Result<Vec<PokemonRef>, StarryError>,
    ) -> Self {
        self.source
            .pages
            .lock()
            .unwrap()
            .entry(offset)
            .or_default()
            .push_back((Duration::from_millis(latency_ms), result));
        self
    }

    pub fn build(self) -> Arc<ScriptedSource> {
        Arc::new(self.source)
    }
}

/// Decrements the in-flight counter even when the fetch is dropped midway
struct InFlight<'a>(&'a Mutex<(usize, usize)>);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a Mutex<(usize, usize)>) -> Self {
        let mut guard = counter.lock().unwrap();
        guard.0 += 1;
        guard.1 = guard.1.max(guard.0);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap().0 -= 1;
    }
}

#[async_trait]
impl PokemonSource for ScriptedSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<PokemonRef>, StarryError> {
        self.record(Call::Page(request.offset()));

        let (latency, result) = {
            let mut pages = self.pages.lock().unwrap();
            let queue = pages.entry(request.offset()).or_default();
            let script = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            script.unwrap_or((Duration::ZERO, Ok(Vec::new())))
        };

        tokio::time::sleep(latency).await;
        result
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, StarryError> {
        let name = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        self.record(Call::DetailStarted(name.clone()));
        let _in_flight = InFlight::enter(&self.in_flight);

        let latency = self
            .detail_latency
            .get(&name)
            .copied()
            .unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(latency).await;

        self.record(Call::DetailFinished(name.clone()));

        if self.failing_details.contains(&name) {
            return Err(StarryError::network(url, "connection reset"));
        }

        let detail = serde_json::from_value(json!({
            "id": name.len(),
            "name": name,
            "sprites": {
                "back_default": format!("https://img.test/{name}/back.png"),
                "front_default": format!("https://img.test/{name}/front.png"),
            }
        }))
        .map_err(|e| StarryError::decode(url, e))?;

        Ok(detail)
    }
}
