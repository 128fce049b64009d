//! # Command Layer
//!
//! One submodule per user-facing operation. Commands take an [`EntryStore`]
//! plus already-parsed arguments and return a [`CmdResult`]; they never print,
//! prompt, or exit.
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries:
//! - `affected_entries`: entries touched by the operation, with their display
//!   index after the operation (or before it, for removals)
//! - `listed_groups`: the derived day groups for `list`
//! - `links`: URLs to hand to the OS opener
//! - `messages`: leveled messages for the UI to render
//!
//! ## Testing Strategy
//!
//! Most of the crate's behavioural tests live here, against `InMemoryStore`
//! and `StoreFixture` with a manual clock.
//!
//! [`EntryStore`]: crate::store::EntryStore

use crate::index::DisplayEntry;
use chrono::NaiveDate;
use serde::Serialize;

pub mod add;
pub mod categorize;
pub mod clear;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod notes;
pub mod open;
pub mod priority;
pub mod undo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A day bucket whose entries carry their canonical display index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedGroup {
    pub date: NaiveDate,
    pub label: String,
    pub entries: Vec<DisplayEntry>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<DisplayEntry>,
    pub listed_groups: Vec<ListedGroup>,
    pub links: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_entries(mut self, entries: Vec<DisplayEntry>) -> Self {
        self.affected_entries = entries;
        self
    }

    pub fn with_listed_groups(mut self, groups: Vec<ListedGroup>) -> Self {
        self.listed_groups = groups;
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    /// Every listed entry, across groups, in display order.
    pub fn listed_entries(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.listed_groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}
