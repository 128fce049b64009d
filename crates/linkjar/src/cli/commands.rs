//! # CLI Layer
//!
//! The CLI layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr) and the system clipboard
//! - Installs the log subscriber
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: [`initialize`] resolves the data dir, config, and store
//! 3. **Input Gathering**: typed text, stdin, clipboard, or a dropped file into [`RawInput`]
//! 4. **API Dispatch**: call the matching `LinkjarApi` method
//! 5. **Output Formatting**: `CmdResult` into terminal output

use super::render::{print_config, print_groups, print_messages, print_notes};
use super::setup::{parse_category_arg, Cli, Commands};
use crate::clipboard;
use anyhow::{anyhow, Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use linkjarapp::classify::{image_mime_for_path, FileBlob, RawInput, TransferPayload};
use linkjarapp::commands::{CmdMessage, CmdResult};
use linkjarapp::config::LinkjarConfig;
use linkjarapp::init::{initialize, LinkjarContext};
use linkjarapp::model::{Category, EntryKind};
use linkjarapp::view::{EntryFilter, SortMode, StatusFilter, ViewOptions};
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // The template needs no data directory
    if let Some(Commands::Config { template: true }) = &cli.command {
        print!("{}", LinkjarConfig::template());
        return Ok(());
    }

    let mut ctx = initialize(cli.data.clone()).context("could not open the jar")?;

    match cli.command {
        None => handle_list(&ctx, ListArgs::default()),
        Some(Commands::Add { text }) => handle_add(&mut ctx, text),
        Some(Commands::Paste) => handle_paste(&mut ctx),
        Some(Commands::Drop { path }) => handle_drop(&mut ctx, &path),
        Some(Commands::List {
            status,
            domain,
            category,
            kind,
            sort,
            json,
        }) => handle_list(
            &ctx,
            ListArgs {
                status,
                domain,
                category,
                kind,
                sort,
                json,
            },
        ),
        Some(Commands::Delete { selectors }) => finish(ctx.api.delete(&selectors)?),
        Some(Commands::Clear) => finish(ctx.api.clear()?),
        Some(Commands::Undo) => finish(ctx.api.undo()?),
        Some(Commands::Priority { selectors, set }) => {
            finish(ctx.api.priority(&selectors, set)?)
        }
        Some(Commands::Category {
            selectors,
            category,
        }) => {
            let category = parse_category_arg(&category).map_err(|e| anyhow!(e))?;
            finish(ctx.api.categorize(&selectors, category)?)
        }
        Some(Commands::Notes { selector, text }) => handle_notes(&mut ctx, selector, text),
        Some(Commands::Open { selectors }) => handle_open(&ctx, &selectors),
        Some(Commands::Config { .. }) => {
            print_config(&ctx.config, &ctx.data_dir);
            Ok(())
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();
}

fn finish(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut LinkjarContext, text: Vec<String>) -> Result<()> {
    let from_stdin = matches!(text.as_slice(), [dash] if dash == "-")
        || (text.is_empty() && !std::io::stdin().is_terminal());

    let typed = if from_stdin {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("could not read stdin")?;
        buffer
    } else {
        text.join(" ")
    };

    finish(ctx.api.add(RawInput::Typed(typed))?)
}

fn handle_paste(ctx: &mut LinkjarContext) -> Result<()> {
    match clipboard::read_transfer() {
        Some(payload) => finish(ctx.api.add(RawInput::Transfer(payload))?),
        None => {
            debug!("nothing pasted");
            Ok(())
        }
    }
}

fn handle_drop(ctx: &mut LinkjarContext, path: &Path) -> Result<()> {
    let payload = match image_mime_for_path(path) {
        Some(mime) => TransferPayload::new().with_blob(mime, FileBlob(path.to_path_buf())),
        None => match std::fs::read_to_string(path) {
            Ok(text) => TransferPayload::new().with_text(text),
            Err(e) => {
                print_messages(&[CmdMessage::warning(format!(
                    "Could not read {}: {}",
                    path.display(),
                    e
                ))]);
                return Ok(());
            }
        },
    };
    finish(ctx.api.add(RawInput::Transfer(payload))?)
}

#[derive(Default)]
struct ListArgs {
    status: Option<StatusFilter>,
    domain: Option<String>,
    category: Option<Category>,
    kind: Option<EntryKind>,
    sort: SortMode,
    json: bool,
}

fn handle_list(ctx: &LinkjarContext, args: ListArgs) -> Result<()> {
    let options = ViewOptions {
        filter: EntryFilter {
            status: args.status.unwrap_or_default(),
            domain: args.domain,
            category: args.category,
            kind: args.kind,
        },
        sort: args.sort,
    };
    let result = ctx.api.list(&options, &Local)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.listed_groups)?);
        return Ok(());
    }

    print_groups(&result.listed_groups, Utc::now());
    print_messages(&result.messages);
    Ok(())
}

fn handle_notes(ctx: &mut LinkjarContext, selector: String, text: Vec<String>) -> Result<()> {
    let notes = if text.is_empty() {
        None
    } else {
        Some(text.join(" "))
    };
    let showing = notes.is_none();
    let result = ctx.api.notes(&[selector], notes)?;
    if showing {
        print_notes(&result.affected_entries, Utc::now());
    }
    finish(result)
}

fn handle_open(ctx: &LinkjarContext, selectors: &[String]) -> Result<()> {
    let result = ctx.api.open(selectors)?;
    for link in &result.links {
        clipboard::open_url(link);
    }
    finish(result)
}
