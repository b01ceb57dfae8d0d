// SPDX-License-Identifier: GPL-3.0-only

use crate::entities::PokemonDetail;

const DEFAULT_SLOT: &str = "front_default";

/// Click-through state over the front/back sprites of one Pokémon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteCarousel {
    /// (slot, url) pairs
    sprites: Vec<(String, String)>,
    index: usize,
}

impl SpriteCarousel {
    pub fn new(detail: &PokemonDetail) -> Self {
        let sprites: Vec<(String, String)> = detail
            .sprite_urls()
            .filter(|(slot, _)| slot.starts_with("front") || slot.starts_with("back"))
            .map(|(slot, url)| (slot.to_string(), url.to_string()))
            .collect();

        let index = sprites
            .iter()
            .position(|(slot, _)| slot == DEFAULT_SLOT)
            .unwrap_or(0);

        Self { sprites, index }
    }

    /// Advances to the next sprite, wrapping around after the last one
    pub fn next_index(&mut self) {
        if self.sprites.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.sprites.len();
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// URL of the sprite being displayed, `None` when there is nothing to show
    pub fn current(&self) -> Option<&str> {
        self.sprites.get(self.index).map(|(_, url)| url.as_str())
    }

    pub fn current_slot(&self) -> Option<&str> {
        self.sprites.get(self.index).map(|(slot, _)| slot.as_str())
    }

    #[cfg(test)]
    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.sprites.iter().map(|(_, url)| url.as_str())
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
