// SPDX-License-Identifier: GPL-3.0-only

mod page_request;
mod pokemon_detail;
mod pokemon_ref;

pub use page_request::PageRequest;
pub use pokemon_detail::{DetailMap, PokemonDetail};
pub use pokemon_ref::{PokemonPage, PokemonRef};
