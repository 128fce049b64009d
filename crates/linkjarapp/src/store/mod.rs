//! # Storage Layer
//!
//! Entries live in memory in an [`EntryStore`] and are written through to a
//! string-keyed [`KeyValueStore`] after every mutation.
//!
//! ## Split of Concerns
//!
//! - **Backend** ([`backend::KeyValueStore`]): the "how". Reads and writes opaque
//!   strings under keys. Knows nothing about entries.
//! - **Store** ([`EntryStore`]): the "what". Ordering, id assignment, the undo
//!   buffer, serialization, and the recovery policy.
//!
//! ## Recovery Policy
//!
//! The data is not critical, so loading never fails: a missing key or a value
//! that does not parse yields an empty store (logged at `warn`). Likewise a
//! failed write after a mutation is logged and dropped; the in-memory state is
//! still updated.
//!
//! ## Undo Lifecycle
//!
//! - **Delete / Clear**: removed entries become the single pending batch,
//!   replacing any earlier batch.
//! - **Undo**: within the grace window the batch goes back to the front of the
//!   list; afterwards it is discarded and undo does nothing.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── links.json        # Entry list (JSON array)
//! ├── links.undo.json   # Pending undo batch, if any
//! └── linkjar.toml      # Optional configuration
//! ```
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.

pub mod backend;
pub mod entry_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

pub use backend::KeyValueStore;
pub use entry_store::{EntryStore, StoreOptions, UndoBatch};

/// Production store: files on disk, wall-clock time.
pub type FileStore = EntryStore<fs_backend::FsBackend>;
