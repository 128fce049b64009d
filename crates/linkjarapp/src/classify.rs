//! # Classifier
//!
//! Decides what kind of entry a piece of input becomes and extracts its payload.
//!
//! ## Rules, in order
//!
//! 1. **Image**: any alternative with an `image/*` MIME type wins. Reading and
//!    encoding it is a separate step ([`PendingImage::decode`]) because the
//!    bytes may come from a slow source (clipboard tool, file on disk).
//! 2. **Empty**: the text, once trimmed, is empty. Nothing is created.
//! 3. **URL**: the whole trimmed text is one absolute `http(s)` URL.
//! 4. **Several URLs**: two or more URLs embedded in longer text. Under
//!    [`MultiUrlPolicy::Split`] each becomes its own `url` entry; under
//!    [`MultiUrlPolicy::Text`] the blob is kept as a single text entry.
//! 5. **Text**: everything else, including text around a single URL.
//!
//! URL detection is deliberately conservative: `http://` or `https://` followed
//! by non-whitespace, confirmed by a real URL parse that yields a host.

use crate::error::{LinkjarError, Result};
use crate::model::Payload;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use url::Url;

static EMBEDDED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("valid url regex"));

static WHOLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").expect("valid url regex"));

/// What to do with a blob that embeds several URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiUrlPolicy {
    /// One `url` entry per embedded URL.
    #[default]
    Split,
    /// Keep the whole blob as one `text` entry.
    Text,
}

impl fmt::Display for MultiUrlPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiUrlPolicy::Split => f.write_str("split"),
            MultiUrlPolicy::Text => f.write_str("text"),
        }
    }
}

impl FromStr for MultiUrlPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "split" => Ok(MultiUrlPolicy::Split),
            "text" => Ok(MultiUrlPolicy::Text),
            other => Err(format!("unknown multi-url policy '{}'", other)),
        }
    }
}

/// Lazily readable bytes, e.g. an image on the clipboard or a dropped file.
pub trait BlobSource {
    fn read_blob(&self) -> std::io::Result<Vec<u8>>;
}

impl BlobSource for Vec<u8> {
    fn read_blob(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// A file whose bytes are read only when decoded.
#[derive(Debug, Clone)]
pub struct FileBlob(pub PathBuf);

impl BlobSource for FileBlob {
    fn read_blob(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.0)
    }
}

/// One alternative offered by a clipboard or drop payload.
pub enum TransferItem {
    Text(String),
    Blob {
        mime: String,
        source: Box<dyn BlobSource>,
    },
}

impl fmt::Debug for TransferItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferItem::Text(text) => f.debug_tuple("Text").field(text).finish(),
            TransferItem::Blob { mime, .. } => f.debug_struct("Blob").field("mime", mime).finish(),
        }
    }
}

/// Clipboard or drag payload: alternatives in the order the host offered them.
#[derive(Debug, Default)]
pub struct TransferPayload {
    pub items: Vec<TransferItem>,
}

impl TransferPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.items.push(TransferItem::Text(text.into()));
        self
    }

    pub fn with_blob(mut self, mime: impl Into<String>, source: impl BlobSource + 'static) -> Self {
        self.items.push(TransferItem::Blob {
            mime: mime.into(),
            source: Box::new(source),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
pub enum RawInput {
    /// Text typed and submitted by the user.
    Typed(String),
    /// Content pasted or dropped.
    Transfer(TransferPayload),
}

/// An image found in a payload, not yet read.
pub struct PendingImage {
    mime: String,
    source: Box<dyn BlobSource>,
}

impl fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingImage")
            .field("mime", &self.mime)
            .finish()
    }
}

impl PendingImage {
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Reads the bytes and encodes them as a `data:` URI.
    pub fn decode(self) -> Result<Payload> {
        let bytes = self
            .source
            .read_blob()
            .map_err(|e| LinkjarError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(LinkjarError::Decode("image is empty".to_string()));
        }
        debug!(mime = %self.mime, size = bytes.len(), "decoded image");
        Ok(Payload::image(format!(
            "data:{};base64,{}",
            self.mime,
            BASE64.encode(bytes)
        )))
    }
}

#[derive(Debug)]
pub enum Classification {
    /// Nothing worth keeping.
    Empty,
    /// Payloads ready to become entries, in input order.
    Ready(Vec<Payload>),
    /// An image that still needs [`PendingImage::decode`].
    PendingImage(PendingImage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    pub multi_url: MultiUrlPolicy,
    pub trim_text: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            multi_url: MultiUrlPolicy::Split,
            trim_text: true,
        }
    }
}

impl Classifier {
    pub fn new(multi_url: MultiUrlPolicy, trim_text: bool) -> Self {
        Self {
            multi_url,
            trim_text,
        }
    }

    pub fn classify(&self, input: RawInput) -> Classification {
        match input {
            RawInput::Typed(text) => self.classify_text(&text),
            RawInput::Transfer(payload) => self.classify_transfer(payload),
        }
    }

    fn classify_transfer(&self, payload: TransferPayload) -> Classification {
        let mut first_text = None;
        for item in payload.items {
            match item {
                TransferItem::Blob { mime, source } if is_image_mime(&mime) => {
                    return Classification::PendingImage(PendingImage { mime, source });
                }
                TransferItem::Text(text) if first_text.is_none() => first_text = Some(text),
                _ => {}
            }
        }
        match first_text {
            Some(text) => self.classify_text(&text),
            None => Classification::Empty,
        }
    }

    pub fn classify_text(&self, raw: &str) -> Classification {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Classification::Empty;
        }

        if is_web_url(trimmed) {
            return Classification::Ready(vec![Payload::url(trimmed)]);
        }

        let urls = extract_urls(trimmed);
        if urls.len() >= 2 && self.multi_url == MultiUrlPolicy::Split {
            return Classification::Ready(urls.into_iter().map(Payload::url).collect());
        }

        let text = if self.trim_text { trimmed } else { raw };
        Classification::Ready(vec![Payload::text(text)])
    }
}

/// True if `s` is exactly one absolute http(s) URL with a host.
pub fn is_web_url(s: &str) -> bool {
    WHOLE_URL.is_match(s) && parses_with_host(s)
}

/// Every http(s) URL embedded in `text`, in order of appearance.
/// Trailing sentence punctuation is not considered part of the URL.
pub fn extract_urls(text: &str) -> Vec<&str> {
    EMBEDDED_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches([',', '.', ';', ':', '!', '?', '"', '\'']))
        .filter(|candidate| parses_with_host(candidate))
        .collect()
}

fn parses_with_host(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// MIME type of a dropped image file, judged by extension.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}
