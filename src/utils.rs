// SPDX-License-Identifier: GPL-3.0-only

/// Everything that can go wrong while paging through PokéApi.
///
/// Errors are `Clone` because a failed listing page is published as state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StarryError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("request was superseded")]
    Cancelled,

    #[error("page size must be positive (got {0})")]
    InvalidPageSize(u32),

    #[error("invalid url {0}")]
    InvalidUrl(String),
}

impl StarryError {
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Transforms a kebab-case string into a space-separated string where each word starts with an uppercase letter.
pub fn capitalize_string(input: &str) -> String {
    input
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            if let Some(first_char) = chars.next() {
                first_char.to_uppercase().collect::<String>() + chars.as_str()
            } else {
                String::new()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Helper to scale some data from PokeApi such as weight...
/// scales a number down by dividing it by 10, converting it to a floating-point
pub fn scale_numbers(num: i64) -> f64 {
    (num as f64) / 10.0
}
