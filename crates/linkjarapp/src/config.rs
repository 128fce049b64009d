//! # Configuration
//!
//! Linkjar configuration is managed by [`confique`], which handles layered
//! loading from environment variables, a TOML file, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `LINKJAR_STORAGE_KEY`, `LINKJAR_UNDO_GRACE_SECS`, ...
//! 2. **Config file**: `linkjar.toml` in the data directory (optional).
//! 3. **Compiled Defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_key` | `links` | Key the entry list is stored under |
//! | `undo_grace_secs` | `5` | Seconds a delete or clear stays undoable |
//! | `multi_url` | `split` | `split` or `text` for blobs with several URLs |
//! | `trim_text` | `true` | Trim surrounding whitespace from text entries |

use crate::classify::{Classifier, MultiUrlPolicy};
use crate::error::Result;
use crate::store::entry_store::{StoreOptions, DEFAULT_STORAGE_KEY, DEFAULT_UNDO_GRACE_SECS};
use chrono::Duration;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "linkjar.toml";

/// Configuration for linkjar, stored in `linkjar.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkjarConfig {
    /// Key the entry list is stored under (becomes `<key>.json` on disk).
    #[config(default = "links", env = "LINKJAR_STORAGE_KEY")]
    pub storage_key: String,

    /// Seconds a deleted batch can still be restored with `undo`.
    #[config(default = 5, env = "LINKJAR_UNDO_GRACE_SECS")]
    pub undo_grace_secs: u64,

    /// What to do with pasted text holding several URLs: "split" or "text".
    #[config(default = "split", env = "LINKJAR_MULTI_URL")]
    pub multi_url: MultiUrlPolicy,

    /// Trim surrounding whitespace from text entries.
    #[config(default = true, env = "LINKJAR_TRIM_TEXT")]
    pub trim_text: bool,
}

impl Default for LinkjarConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            undo_grace_secs: DEFAULT_UNDO_GRACE_SECS,
            multi_url: MultiUrlPolicy::Split,
            trim_text: true,
        }
    }
}

impl LinkjarConfig {
    /// Loads from the environment, then `<data_dir>/linkjar.toml`, then defaults.
    /// A missing file is fine; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = LinkjarConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()?;
        Ok(config)
    }

    /// Commented sample `linkjar.toml`.
    pub fn template() -> String {
        confique::toml::template::<LinkjarConfig>(confique::toml::FormatOptions::default())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.storage_key.clone(),
            grace: self.grace(),
        }
    }

    pub fn grace(&self) -> Duration {
        // TimeDelta caps out at i64::MAX milliseconds
        let secs = self.undo_grace_secs.min(i64::MAX as u64 / 1000) as i64;
        Duration::seconds(secs)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.multi_url, self.trim_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = LinkjarConfig::default();
        assert_eq!(config.storage_key, "links");
        assert_eq!(config.undo_grace_secs, 5);
        assert_eq!(config.multi_url, MultiUrlPolicy::Split);
        assert!(config.trim_text);
    }

    #[test]
    fn test_store_options_follow_config() {
        let config = LinkjarConfig {
            storage_key: "clips".to_string(),
            undo_grace_secs: 30,
            ..Default::default()
        };
        let options = config.store_options();
        assert_eq!(options.key, "clips");
        assert_eq!(options.undo_key(), "clips.undo");
        assert_eq!(options.grace, Duration::seconds(30));
    }

    #[test]
    fn test_classifier_follows_config() {
        let config = LinkjarConfig {
            multi_url: MultiUrlPolicy::Text,
            trim_text: false,
            ..Default::default()
        };
        assert_eq!(config.classifier(), Classifier::new(MultiUrlPolicy::Text, false));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "storage_key = \"clips\"\nmulti_url = \"text\"\n",
        )
        .unwrap();
        let config = LinkjarConfig::load(dir.path()).unwrap();
        assert_eq!(config.storage_key, "clips");
        assert_eq!(config.multi_url, MultiUrlPolicy::Text);
        assert_eq!(config.undo_grace_secs, 5);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LinkjarConfig::load(dir.path()).unwrap();
        assert_eq!(config.storage_key, LinkjarConfig::default().storage_key);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "undo_grace_secs = \"soon\"").unwrap();
        assert!(LinkjarConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_template_mentions_every_key() {
        let template = LinkjarConfig::template();
        for key in ["storage_key", "undo_grace_secs", "multi_url", "trim_text"] {
            assert!(template.contains(key), "missing {}", key);
        }
    }
}
