// SPDX-License-Identifier: GPL-3.0-only

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_LISTING_URL;

pub const APP_ID: &str = "dev.mariinkys.StarryPages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarryConfig {
    pub listing_url: String,
    pub items_per_page: u32,
    /// Page sizes offered to the user
    pub page_size_options: Vec<u32>,
    /// No timeout when unset, a hung request stalls its row
    pub request_timeout_secs: Option<u64>,
}

impl Default for StarryConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            items_per_page: 10,
            page_size_options: vec![5, 10, 15, 20],
            request_timeout_secs: None,
        }
    }
}

impl StarryConfig {
    /// `<config dir>/dev.mariinkys.StarryPages/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join("config.ron"))
    }

    /// Reads the config at `path`, falling back to the defaults when there is none
    pub fn load(path: &Path) -> Result<Self, anywho::Error> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: StarryConfig = ron::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), anywho::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, contents)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn is_page_size_option(&self, size: u32) -> bool {
        self.page_size_options.contains(&size)
    }
}
