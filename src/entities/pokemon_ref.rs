// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// A single entry of the listing endpoint, resolved lazily into a [`PokemonDetail`](super::PokemonDetail)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl PokemonRef {
    /// A loading cell shown while the page itself is still being fetched
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn placeholders(count: u32) -> Vec<Self> {
        (0..count).map(|_| Self::placeholder()).collect()
    }

    pub fn is_placeholder(&self) -> bool {
        self.url.is_empty()
    }
}

/// Body of `GET /pokemon?limit=&offset=`, only `results` is of interest
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPage {
    pub results: Vec<PokemonRef>,
}
