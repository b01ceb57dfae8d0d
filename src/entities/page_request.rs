// SPDX-License-Identifier: GPL-3.0-only

use crate::utils::StarryError;

/// The page of the listing currently being looked at.
///
/// Values are immutable: every pagination action produces a new `PageRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    offset: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl PageRequest {
    pub fn new(offset: u32, limit: u32) -> Result<Self, StarryError> {
        if limit == 0 {
            return Err(StarryError::InvalidPageSize(limit));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The following page, same size
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self
        }
    }

    /// The preceding page, clamped at the start of the listing
    pub fn prev(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self
        }
    }

    /// Same offset, different page size
    pub fn with_limit(self, limit: u32) -> Result<Self, StarryError> {
        Self::new(self.offset, limit)
    }
}

impl std::fmt::Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let first = u64::from(self.offset) + 1;
        let last = u64::from(self.offset) + u64::from(self.limit);
        write!(f, "#{first}-#{last}")
    }
}
