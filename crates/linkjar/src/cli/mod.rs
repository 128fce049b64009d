//! # CLI Behavior
//!
//! This is **one possible UI client** for linkjar. It is the only place that
//! knows about terminal I/O, exit codes, the system clipboard, and output
//! formatting.
//!
//! ## Input Sources
//!
//! - `lj add <text...>`: typed input, exactly as a text box submit.
//! - `lj add -` (or `lj add` with piped stdin): stdin as typed input.
//! - `lj paste`: the system clipboard. An image on the clipboard wins over text.
//! - `lj drop <path>`: a file. Images by extension, anything else as its text.
//!
//! ## Naked Execution
//!
//! `lj` with no subcommand lists the jar.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context setup, input gathering, dispatch
//! - `render`: output formatting (colors, alignment, relative times)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
