// SPDX-License-Identifier: GPL-3.0

use super::{Message, utils::PaginationAction};

pub const HELP: &str = "n next | p prev | l <size> page size | c <row> next sprite | r retry | q quit";

/// Turns one line typed by the user into a [`Message`]
pub fn parse_command(line: &str) -> Message {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Message::Redraw;
    };
    let argument = words.next();

    if words.next().is_some() {
        return Message::Invalid(line.trim().to_string());
    }

    match (command.to_lowercase().as_str(), argument) {
        ("n" | "next", None) => Message::Paginate(PaginationAction::Next),
        ("p" | "prev" | "b" | "back", None) => Message::Paginate(PaginationAction::Back),
        ("r" | "retry", None) => Message::Paginate(PaginationAction::Reload),
        ("l" | "limit" | "size", Some(size)) => match size.parse() {
            Ok(size) => Message::Paginate(PaginationAction::PageSize(size)),
            Err(_) => Message::Invalid(line.trim().to_string()),
        },
        ("c" | "click", Some(row)) => match row.parse() {
            Ok(row) => Message::ClickSprite(row),
            Err(_) => Message::Invalid(line.trim().to_string()),
        },
        ("h" | "help" | "?", None) => Message::Help,
        ("q" | "quit" | "exit", None) => Message::Quit,
        _ => Message::Invalid(line.trim().to_string()),
    }
}
