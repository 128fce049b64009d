//! # Context Setup
//!
//! Resolves where the jar lives, loads the configuration from there, and opens
//! the store.
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit override (the CLI's `--data` flag, or `LINKJAR_DATA` which
//!    the CLI maps onto the same flag).
//! 2. The OS data directory from [`directories::ProjectDirs`]
//!    (e.g. `~/.local/share/linkjar` on Linux).
//!
//! The directory is created on first use.

use crate::api::LinkjarApi;
use crate::config::LinkjarConfig;
use crate::error::{LinkjarError, Result};
use crate::store::fs_backend::FsBackend;
use crate::store::EntryStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_ENV: &str = "LINKJAR_DATA";

pub struct LinkjarContext {
    pub api: LinkjarApi<FsBackend>,
    pub config: LinkjarConfig,
    pub data_dir: PathBuf,
}

/// The directory entries are stored in, before any override.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "linkjar", "linkjar")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LinkjarError::Store("Could not determine a data directory".to_string()))
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<LinkjarContext> {
    let data_dir = match data_override {
        Some(path) => path,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)?;

    let config = LinkjarConfig::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "initialized");

    let backend = FsBackend::new(data_dir.clone());
    let store = EntryStore::open(backend, config.store_options());
    let api = LinkjarApi::new(store, config.classifier());

    Ok(LinkjarContext {
        api,
        config,
        data_dir,
    })
}
