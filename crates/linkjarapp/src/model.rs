//! # Domain Model: Entries and Their Payloads
//!
//! An [`Entry`] is one thing the user kept: a URL, a text snippet, or an image.
//!
//! ## One Payload Per Entry
//!
//! Exactly one of `url`, `text` or `imageData` is populated on every entry. The
//! [`Payload`] enum makes any other combination unrepresentable, and its `kind`
//! tag doubles as the discriminator in the stored JSON:
//!
//! ```text
//! {"id":1729245600000,"kind":"url","url":"https://example.com","createdAt":"...",
//!  "priority":"none","notes":""}
//! ```
//!
//! ## Priority Cycle
//!
//! Priority is a four-state cycle, advanced one step per toggle:
//!
//! ```text
//! none -> pending -> done -> remaining -> none
//! ```
//!
//! ## Legacy Records
//!
//! Lists written by the earlier link manager have no `kind` and carry a
//! millisecond `timestamp` instead of `createdAt`. They are read through
//! [`EntryRecord`] and come back as `url` entries. Boolean priority flags from
//! the starred variant map to `pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Unique entry identifier, derived from the creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(EntryId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Url,
    Text,
    Image,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryKind::Url => "url",
            EntryKind::Text => "text",
            EntryKind::Image => "image",
        };
        f.write_str(name)
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "url" | "link" => Ok(EntryKind::Url),
            "text" => Ok(EntryKind::Text),
            "image" | "img" => Ok(EntryKind::Image),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

/// The content of an entry. Serialized flat, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Url { url: String },
    Text { text: String },
    Image {
        /// Self-contained `data:<mime>;base64,...` URI.
        #[serde(rename = "imageData")]
        image_data: String,
    },
}

impl Payload {
    pub fn url(url: impl Into<String>) -> Self {
        Payload::Url { url: url.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text { text: text.into() }
    }

    pub fn image(image_data: impl Into<String>) -> Self {
        Payload::Image {
            image_data: image_data.into(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Payload::Url { .. } => EntryKind::Url,
            Payload::Text { .. } => EntryKind::Text,
            Payload::Image { .. } => EntryKind::Image,
        }
    }

    /// The raw payload string (URL, text, or data URI).
    pub fn as_str(&self) -> &str {
        match self {
            Payload::Url { url } => url,
            Payload::Text { text } => text,
            Payload::Image { image_data } => image_data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Reels,
    Useful,
    Work,
    Shopping,
    Reading,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Reels,
        Category::Useful,
        Category::Work,
        Category::Shopping,
        Category::Reading,
        Category::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Reels => "reels",
            Category::Useful => "useful",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Reading => "reading",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Reels => "Reels",
            Category::Useful => "Useful",
            Category::Work => "Work",
            Category::Shopping => "Shopping",
            Category::Reading => "Reading",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.id() == lower)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityState {
    #[default]
    None,
    Pending,
    Done,
    Remaining,
}

impl PriorityState {
    /// Cycle order. `next()` walks this list and wraps around.
    pub const CYCLE: [PriorityState; 4] = [
        PriorityState::None,
        PriorityState::Pending,
        PriorityState::Done,
        PriorityState::Remaining,
    ];

    pub fn next(self) -> Self {
        let pos = Self::CYCLE.iter().position(|s| *s == self).unwrap_or(0);
        Self::CYCLE[(pos + 1) % Self::CYCLE.len()]
    }

    /// Anything but `None` counts as flagged for priority-first sorting.
    pub fn is_flagged(self) -> bool {
        self != PriorityState::None
    }

    pub fn id(&self) -> &'static str {
        match self {
            PriorityState::None => "none",
            PriorityState::Pending => "pending",
            PriorityState::Done => "done",
            PriorityState::Remaining => "remaining",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityState::None => "No Status",
            PriorityState::Pending => "Pending",
            PriorityState::Done => "Completed",
            PriorityState::Remaining => "Remaining",
        }
    }
}

impl fmt::Display for PriorityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PriorityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PriorityState::None),
            "pending" => Ok(PriorityState::Pending),
            "done" | "completed" => Ok(PriorityState::Done),
            "remaining" => Ok(PriorityState::Remaining),
            other => Err(format!("unknown priority state '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    #[serde(flatten)]
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub priority: PriorityState,
    pub notes: String,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.payload.kind()
    }

    pub fn url(&self) -> Option<&str> {
        match &self.payload {
            Payload::Url { url } => Some(url),
            _ => None,
        }
    }

    /// One-line title for listings: hostname for links, first line for text.
    pub fn display_title(&self) -> String {
        match &self.payload {
            Payload::Url { url } => display_host(url),
            Payload::Text { text } => text.lines().next().unwrap_or_default().to_string(),
            Payload::Image { image_data } => {
                let mime = image_data
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .unwrap_or("image");
                format!("[{}]", mime)
            }
        }
    }
}

/// Hostname of `url`, or the raw string when it does not parse.
pub fn display_host(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Favicon lookup through a public favicon service. Purely decorative.
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz=64",
        host
    ))
}

/// Input to [`crate::store::EntryStore::add`]. Missing fields get defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub id: Option<EntryId>,
    pub payload: Payload,
    pub created_at: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    pub priority: PriorityState,
    pub notes: String,
}

impl EntryDraft {
    pub fn new(payload: Payload) -> Self {
        Self {
            id: None,
            payload,
            created_at: None,
            category: None,
            priority: PriorityState::None,
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: PriorityState) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update. `None` leaves a field untouched; `category: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub category: Option<Option<Category>>,
    pub priority: Option<PriorityState>,
    pub notes: Option<String>,
}

impl EntryPatch {
    pub fn category(category: Option<Category>) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn priority(priority: PriorityState) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.priority.is_none() && self.notes.is_none()
    }

    /// Applies the patch, returning whether anything changed.
    pub fn apply(&self, entry: &mut Entry) -> bool {
        let mut changed = false;
        if let Some(category) = self.category {
            changed |= entry.category != category;
            entry.category = category;
        }
        if let Some(priority) = self.priority {
            changed |= entry.priority != priority;
            entry.priority = priority;
        }
        if let Some(notes) = &self.notes {
            changed |= entry.notes != *notes;
            entry.notes = notes.clone();
        }
        changed
    }
}

// Custom deserializer so lists written before `kind`/`createdAt` existed still load.
impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = EntryRecord::deserialize(deserializer)?;
        record.into_entry().map_err(serde::de::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordPriority {
    State(String),
    Flag(bool),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: EntryId,
    #[serde(default)]
    kind: Option<EntryKind>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image_data: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    /// Legacy: milliseconds since the epoch.
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    priority: Option<RecordPriority>,
    #[serde(default)]
    notes: Option<String>,
}

impl EntryRecord {
    fn into_entry(self) -> Result<Entry, String> {
        let payload = match self.kind {
            Some(EntryKind::Url) => Payload::url(self.url.ok_or("url entry without url")?),
            Some(EntryKind::Text) => Payload::text(self.text.ok_or("text entry without text")?),
            Some(EntryKind::Image) => {
                Payload::image(self.image_data.ok_or("image entry without imageData")?)
            }
            None => match (self.url, self.text, self.image_data) {
                (Some(url), _, _) => Payload::url(url),
                (None, Some(text), _) => Payload::text(text),
                (None, None, Some(data)) => Payload::image(data),
                (None, None, None) => return Err(format!("entry {} has no payload", self.id)),
            },
        };

        let created_at = self
            .created_at
            .or_else(|| self.timestamp.and_then(DateTime::from_timestamp_millis))
            .or_else(|| i64::try_from(self.id.0).ok().and_then(DateTime::from_timestamp_millis))
            .ok_or_else(|| format!("entry {} has no creation time", self.id))?;

        let priority = match self.priority {
            Some(RecordPriority::State(s)) => s.parse().unwrap_or_default(),
            Some(RecordPriority::Flag(true)) => PriorityState::Pending,
            Some(RecordPriority::Flag(false)) | None => PriorityState::None,
        };

        Ok(Entry {
            id: self.id,
            payload,
            created_at,
            category: self.category.and_then(|c| c.parse().ok()),
            priority,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Entry {
        Entry {
            id: EntryId(1_700_000_000_000),
            payload: Payload::url("https://example.com/page"),
            created_at: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            category: Some(Category::Reading),
            priority: PriorityState::Done,
            notes: "read later".into(),
        }
    }

    #[test]
    fn priority_cycle_returns_to_start() {
        let mut state = PriorityState::None;
        let seen: Vec<_> = (0..4)
            .map(|_| {
                state = state.next();
                state
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                PriorityState::Pending,
                PriorityState::Done,
                PriorityState::Remaining,
                PriorityState::None
            ]
        );
    }

    #[test]
    fn serializes_flat_with_kind_tag() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["kind"], "url");
        assert_eq!(json["url"], "https://example.com/page");
        assert_eq!(json["category"], "reading");
        assert_eq!(json["priority"], "done");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn image_payload_uses_image_data_field() {
        let mut entry = sample();
        entry.payload = Payload::image("data:image/png;base64,AAAA");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["imageData"], "data:image/png;base64,AAAA");
        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.display_title(), "[image/png]");
    }

    #[test]
    fn legacy_record_loads_as_url() {
        let raw = r#"{"id":1700000000000,"url":"https://old.example.org/x","date":"Nov 14",
            "timestamp":1700000000000,"priority":"remaining","notes":"legacy"}"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.kind(), EntryKind::Url);
        assert_eq!(entry.priority, PriorityState::Remaining);
        assert_eq!(entry.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(entry.notes, "legacy");
        assert_eq!(entry.category, None);
    }

    #[test]
    fn legacy_boolean_priority_maps_to_pending() {
        let raw = r#"{"id":5,"text":"starred","timestamp":5,"priority":true}"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.priority, PriorityState::Pending);
        assert_eq!(entry.kind(), EntryKind::Text);
    }

    #[test]
    fn record_without_payload_is_rejected() {
        let raw = r#"{"id":5,"timestamp":5}"#;
        assert!(serde_json::from_str::<Entry>(raw).is_err());
    }

    #[test]
    fn display_host_falls_back_to_raw() {
        assert_eq!(display_host("https://example.com/page"), "example.com");
        assert_eq!(display_host("not a url"), "not a url");
    }

    #[test]
    fn favicon_only_for_parsable_urls() {
        assert_eq!(
            favicon_url("https://example.com/a").as_deref(),
            Some("https://www.google.com/s2/favicons?domain=example.com&sz=64")
        );
        assert_eq!(favicon_url("hello"), None);
    }

    #[test]
    fn patch_clears_category() {
        let mut entry = sample();
        assert!(EntryPatch::category(None).apply(&mut entry));
        assert_eq!(entry.category, None);
        assert!(!EntryPatch::category(None).apply(&mut entry));
    }
}
