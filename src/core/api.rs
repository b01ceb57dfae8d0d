// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    entities::{PageRequest, PokemonDetail, PokemonPage, PokemonRef},
    utils::StarryError,
};

pub const DEFAULT_LISTING_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Where pages and details come from
#[async_trait]
pub trait PokemonSource: Send + Sync + 'static {
    /// Fetches one page of the listing
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<PokemonRef>, StarryError>;

    /// Fetches the detail record a listing entry points to
    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, StarryError>;
}

/// [`PokemonSource`] backed by the PokéApi REST endpoints
#[derive(Debug, Clone)]
pub struct StarryApi {
    client: reqwest::Client,
    listing_url: Url,
}

impl StarryApi {
    pub fn new(listing_url: &str, timeout: Option<Duration>) -> Result<Self, anywho::Error> {
        let listing_url =
            Url::parse(listing_url).map_err(|_| StarryError::InvalidUrl(listing_url.to_string()))?;

        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(10);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            listing_url,
        })
    }

    /// `<listing>?limit=<L>&offset=<O>`
    pub fn page_url(&self, request: PageRequest) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &request.limit().to_string())
            .append_pair("offset", &request.offset().to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StarryError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StarryError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StarryError::network(url.as_str(), format!("status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StarryError::network(url.as_str(), e))?;

        serde_json::from_slice(&bytes).map_err(|e| StarryError::decode(url.as_str(), e))
    }
}

#[async_trait]
impl PokemonSource for StarryApi {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<PokemonRef>, StarryError> {
        let page: PokemonPage = self.get_json(self.page_url(request)).await?;
        Ok(page.results)
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, StarryError> {
        let url = Url::parse(url).map_err(|_| StarryError::InvalidUrl(url.to_string()))?;
        self.get_json(url).await
    }
}
