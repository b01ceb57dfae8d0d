// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, fmt::Write};

use crate::{
    carousel::SpriteCarousel,
    config::StarryConfig,
    core::{DetailSnapshot, PageRows, PageStatus, StarryCore},
    entities::PokemonRef,
    utils::{capitalize_string, scale_numbers},
};

pub mod input;
mod utils;

pub use input::parse_command;
pub use utils::PaginationAction;

/// Mirror of the pipeline state plus what only the UI cares about
#[derive(Debug)]
pub struct AppModel {
    config: StarryConfig,
    core: StarryCore,
    /// Rows of the current page
    rows: PageRows,
    /// Details resolved so far for the current page
    details: DetailSnapshot,
    /// One carousel per resolved Pokémon, keyed by name
    carousels: HashMap<String, SpriteCarousel>,
    /// One-line feedback shown under the grid
    notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Paginate(PaginationAction),
    /// 1-based row whose sprite was clicked
    ClickSprite(usize),
    RowsUpdated(PageRows),
    DetailsUpdated(DetailSnapshot),
    Help,
    Redraw,
    Invalid(String),
    Quit,
}

/// What the event loop should do after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Render,
    Quit,
}

impl AppModel {
    pub fn new(config: StarryConfig, core: StarryCore) -> Self {
        let rows = core.rows().borrow().clone();
        let details = core.details().borrow().clone();

        let mut app = AppModel {
            config,
            core,
            rows,
            details: DetailSnapshot::default(),
            carousels: HashMap::new(),
            notice: None,
        };
        app.sync_details(details);
        app
    }

    pub fn update(&mut self, message: Message) -> Task {
        match message {
            Message::Paginate(action) => {
                if matches!(action, PaginationAction::PageSize(size) if !self.config.is_page_size_option(size))
                {
                    self.notice = Some(format!(
                        "page size must be one of {:?}",
                        self.config.page_size_options
                    ));
                    return Task::Render;
                }

                self.notice = match action.apply(&self.core) {
                    Ok(request) => {
                        tracing::debug!(?action, %request, "pagination");
                        None
                    }
                    Err(e) => Some(e.to_string()),
                };
            }
            Message::ClickSprite(row) => {
                let name = row
                    .checked_sub(1)
                    .and_then(|index| self.rows.rows.get(index))
                    .filter(|pokemon| !pokemon.is_placeholder())
                    .map(|pokemon| pokemon.name.clone());

                let in_sync = self.details_match_rows();
                self.notice = match name {
                    None if self.rows.is_loading() => Some("the page is still loading".to_string()),
                    None => Some(format!("there is no row {row}")),
                    Some(name) => match self.carousels.get_mut(&name).filter(|_| in_sync) {
                        Some(carousel) => {
                            carousel.next_index();
                            None
                        }
                        None => Some(format!("{} is still loading", capitalize_string(&name))),
                    },
                };
            }
            Message::RowsUpdated(rows) => {
                self.rows = rows;
            }
            Message::DetailsUpdated(details) => {
                self.sync_details(details);
            }
            Message::Help => {
                self.notice = Some(input::HELP.to_string());
            }
            Message::Redraw => {}
            Message::Invalid(line) => {
                self.notice = Some(format!("unknown command {line:?}, type h for help"));
            }
            Message::Quit => return Task::Quit,
        }

        Task::Render
    }

    /// Carousels appear as details resolve and go away with the page they belong to
    fn sync_details(&mut self, details: DetailSnapshot) {
        self.carousels
            .retain(|name, _| details.details.contains_key(name));

        for (name, detail) in details.details.iter() {
            self.carousels
                .entry(name.clone())
                .or_insert_with(|| SpriteCarousel::new(detail));
        }

        self.details = details;
    }

    /// Details lag behind rows for a moment after every page change
    fn details_match_rows(&self) -> bool {
        self.details.page_generation == self.rows.generation
    }

    pub fn carousel(&self, name: &str) -> Option<&SpriteCarousel> {
        self.carousels.get(name)
    }

    pub fn rows(&self) -> &PageRows {
        &self.rows
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Renders the grid as text
    pub fn view(&self) -> String {
        let mut out = String::new();
        let request = self.rows.request;

        let status = match &self.rows.status {
            _ if self.rows.is_loading() => "loading".to_string(),
            PageStatus::Failed(_) => "failed".to_string(),
            _ => {
                let resolved = if self.details_match_rows() {
                    self.details.details.len()
                } else {
                    0
                };
                format!("{resolved}/{} resolved", self.rows.rows.len())
            }
        };
        let _ = writeln!(
            out,
            "StarryPages  {request}  page size {}  [{status}]",
            request.limit()
        );

        if let PageStatus::Failed(e) = &self.rows.status {
            let _ = writeln!(out, "  could not load this page: {e}");
            let _ = writeln!(out, "  type r to retry");
        } else if self.rows.rows.is_empty() {
            let _ = writeln!(out, "  nothing here, this is past the end of the Pokédex");
        }

        for (index, pokemon) in self.rows.rows.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", index + 1, self.cell(pokemon));
        }

        let _ = writeln!(out);
        match &self.notice {
            Some(notice) => {
                let _ = writeln!(out, "{notice}");
            }
            None => {
                let _ = writeln!(out, "{}", input::HELP);
            }
        }

        out
    }

    fn cell(&self, pokemon: &PokemonRef) -> String {
        if pokemon.is_placeholder() {
            return "··· loading".to_string();
        }

        let name = capitalize_string(&pokemon.name);
        let (true, Some(detail), Some(carousel)) = (
            self.details_match_rows(),
            self.details.get(&pokemon.name),
            self.carousel(&pokemon.name),
        ) else {
            return format!("{name:<16} loading");
        };

        let stats = format!(
            "#{:<5} {:>6.1} kg {:>5.1} m",
            detail.id,
            scale_numbers(detail.weight),
            scale_numbers(detail.height)
        );

        match (carousel.current_slot(), carousel.current()) {
            (Some(slot), Some(url)) => format!(
                "{name:<16} {stats}  {slot} {}/{}  {url}",
                carousel.index() + 1,
                carousel.len()
            ),
            _ => format!("{name:<16} {stats}  no sprite"),
        }
    }
}
