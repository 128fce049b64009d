use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use linkjarapp::commands::{CmdMessage, ListedGroup, MessageLevel};
use linkjarapp::config::LinkjarConfig;
use linkjarapp::index::DisplayEntry;
use linkjarapp::model::{EntryKind, PriorityState};
use linkjarapp::view::time_label;
use std::path::Path;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 24;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_groups(groups: &[ListedGroup], now: DateTime<Utc>) {
    let width = line_width();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", group.label.bold());
        for shown in &group.entries {
            println!("{}", entry_line(shown, now, width));
            if let Some(extra) = detail_line(shown) {
                println!("{}", extra);
            }
        }
    }
}

pub(super) fn print_notes(entries: &[DisplayEntry], now: DateTime<Utc>) {
    let width = line_width();
    for shown in entries {
        println!("{}", entry_line(shown, now, width));
        if shown.entry.notes.is_empty() {
            println!("      {}", "(no notes)".dimmed());
        } else {
            for line in shown.entry.notes.lines() {
                println!("      {}", line);
            }
        }
    }
}

pub(super) fn print_config(config: &LinkjarConfig, data_dir: &Path) {
    println!("{} = {}", "data_dir".bold(), data_dir.display());
    println!("{} = {}", "storage_key".bold(), config.storage_key);
    println!("{} = {}", "undo_grace_secs".bold(), config.undo_grace_secs);
    println!("{} = {}", "multi_url".bold(), config.multi_url);
    println!("{} = {}", "trim_text".bold(), config.trim_text);
}

/// `  3. ● example.com                          3:05 PM  2 hours ago`
fn entry_line(shown: &DisplayEntry, now: DateTime<Utc>, width: usize) -> String {
    let idx_str = format!("{:>3}. ", shown.index);
    let marker = priority_marker(shown.entry.priority);
    let when = format!(
        "{}  {}",
        time_label(shown.entry.created_at, &Local),
        format_time_ago(shown.entry.created_at, now)
    );
    let when = format!("{:>width$}", when, width = TIME_WIDTH);

    let fixed = idx_str.width() + 2 + TIME_WIDTH;
    let available = width.saturating_sub(fixed);
    let title = truncate_to_width(&title_of(shown), available);
    let padding = available.saturating_sub(title.width());

    let title = match shown.entry.kind() {
        EntryKind::Url => title.cyan(),
        EntryKind::Text => title.normal(),
        EntryKind::Image => title.magenta(),
    };

    format!(
        "{}{} {}{}{}",
        idx_str,
        marker,
        title,
        " ".repeat(padding),
        when.dimmed()
    )
}

fn title_of(shown: &DisplayEntry) -> String {
    let entry = &shown.entry;
    match entry.url() {
        Some(url) => {
            let host = entry.display_title();
            let rest = url
                .split_once(host.as_str())
                .map(|(_, rest)| rest.trim_end_matches('/'))
                .unwrap_or_default();
            if rest.is_empty() {
                host
            } else {
                format!("{}{}", host, rest)
            }
        }
        None => entry.display_title(),
    }
}

/// Category and notes, if there are any, on a dimmed second line.
fn detail_line(shown: &DisplayEntry) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(category) = shown.entry.category {
        parts.push(format!("[{}]", category.label()));
    }
    if let Some(first) = shown.entry.notes.lines().next().filter(|l| !l.is_empty()) {
        parts.push(first.to_string());
    }
    if parts.is_empty() {
        return None;
    }
    let line = truncate_to_width(&parts.join(" "), line_width().saturating_sub(7));
    Some(format!("       {}", line.dimmed()))
}

fn priority_marker(priority: PriorityState) -> ColoredString {
    match priority {
        PriorityState::None => " ".normal(),
        PriorityState::Pending => "●".yellow(),
        PriorityState::Done => "✓".green(),
        PriorityState::Remaining => "◐".blue(),
    }
}

fn line_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| (cols as usize).min(LINE_WIDTH))
        .unwrap_or(LINE_WIDTH)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c.is_control() { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
