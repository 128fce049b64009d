//! # Linkjar CLI
//!
//! The `lj` binary is intentionally thin: the CLI lives in `src/cli/`, the
//! OS clipboard and opener glue in `src/clipboard.rs`, and this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/linkjar/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - input gathering + dispatch (commands.rs)                 │
//! │  - terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  linkjarapp: API → commands → store                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod clipboard;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
