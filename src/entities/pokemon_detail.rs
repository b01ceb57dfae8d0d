// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Details of the Pokémon on the current page, keyed by name
pub type DetailMap = HashMap<String, Arc<PokemonDetail>>;

/// Body of `GET /pokemon/{id}/`, trimmed to what the grid displays
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub weight: i64,
    /// Sprite slot name to URL, `null` or nested object, in document order
    #[serde(default)]
    pub sprites: Map<String, Value>,
}

impl Debug for PokemonDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonDetail")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl PokemonDetail {
    /// Sprite slots holding a non-empty URL, in document order
    pub fn sprite_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sprites.iter().filter_map(|(slot, value)| match value {
            Value::String(url) if !url.is_empty() => Some((slot.as_str(), url.as_str())),
            _ => None,
        })
    }
}
