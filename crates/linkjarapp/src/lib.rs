//! # Linkjar Architecture
//!
//! Linkjar keeps the links, snippets, and images you paste, newest first,
//! grouped by day. The library holds all of it; the `lj` binary only feeds it
//! input and prints what comes back.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/linkjar)                                        │
//! │  - Parses arguments, reads clipboard/files, renders output  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade: selector parsing and dispatch               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - EntryStore: ordering, ids, undo, write-through           │
//! │  - KeyValueStore: FsBackend (disk), MemBackend (tests)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Next to the layers sit the pure pieces: [`classify`] turns raw input into
//! payloads and [`view`] turns the entry list into filtered, sorted day groups.
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward nothing prints or exits. The only I/O is the backend
//! writing strings under keys and an image blob being read during
//! [`classify::PendingImage::decode`].
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by every UI
//! - [`classify`]: URL / text / image detection
//! - [`clock`]: time source, swappable in tests
//! - [`commands`]: business logic
//! - [`config`]: `linkjar.toml` and `LINKJAR_*` settings
//! - [`error`]: error type
//! - [`ids`]: timestamp-based id generation
//! - [`index`]: display indexes and selectors
//! - [`init`]: data directory and context setup
//! - [`model`]: entries and their fields
//! - [`store`]: entry store and backends
//! - [`view`]: filter, sort, and group

pub mod api;
pub mod classify;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod index;
pub mod init;
pub mod model;
pub mod store;
pub mod view;
