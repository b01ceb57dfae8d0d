// SPDX-License-Identifier: GPL-3.0

use crate::{core::StarryCore, entities::PageRequest, utils::StarryError};

/// Identifies an action related to Pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationAction {
    Next,
    Back,
    PageSize(u32),
    /// Same page again, used to recover from a failed load
    Reload,
}

impl PaginationAction {
    /// Hands the action to the pagination controller, returning the request now in effect
    pub fn apply(self, core: &StarryCore) -> Result<PageRequest, StarryError> {
        match self {
            PaginationAction::Next => Ok(core.next_page()),
            PaginationAction::Back => Ok(core.prev_page()),
            PaginationAction::PageSize(limit) => core.set_limit(limit),
            PaginationAction::Reload => Ok(core.retry()),
        }
    }
}
