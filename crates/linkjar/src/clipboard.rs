//! System clipboard and URL opener.
//!
//! - macOS and Windows: `clipboard-rs` for text and images, `open` / `cmd /C start`
//! - Linux: `wl-paste` or `xclip`/`xsel`, `xdg-open`
//!
//! Everything here is best effort. A missing tool or an empty clipboard yields
//! `None` and a debug log line, never an error.

use linkjarapp::classify::{BlobSource, TransferPayload};
use std::process::{Command, Stdio};
use tracing::debug;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use linkjarapp::classify::is_image_mime;
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use std::io;

/// Bytes produced by running a command, read only when the image is decoded.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
#[derive(Debug, Clone)]
pub struct CommandBlob {
    program: &'static str,
    args: Vec<String>,
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl CommandBlob {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl BlobSource for CommandBlob {
    fn read_blob(&self) -> io::Result<Vec<u8>> {
        let output = Command::new(self.program)
            .args(&self.args)
            .stderr(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Ok(output.stdout)
    }
}

/// Reads the clipboard as a transfer payload: an image alternative first when
/// one is offered, then the text.
pub fn read_transfer() -> Option<TransferPayload> {
    transfer_from(image_on_clipboard(), read_text())
}

fn transfer_from<S: BlobSource + 'static>(
    image: Option<(String, S)>,
    text: Option<String>,
) -> Option<TransferPayload> {
    let mut payload = TransferPayload::new();
    if let Some((mime, source)) = image {
        payload = payload.with_blob(mime, source);
    }
    if let Some(text) = text {
        payload = payload.with_text(text);
    }

    if payload.is_empty() {
        debug!("clipboard empty or unavailable");
        None
    } else {
        Some(payload)
    }
}

/// Opens `url` with the OS handler. Failures are logged and ignored.
pub fn open_url(url: &str) {
    let result = opener(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(e) = result {
        debug!(%url, error = %e, "could not launch opener");
    }
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn native_context() -> Option<clipboard_rs::ClipboardContext> {
    match clipboard_rs::ClipboardContext::new() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            debug!(error = %e, "clipboard unavailable");
            None
        }
    }
}

/// The clipboard image re-encoded as PNG, whatever format the OS holds it in.
#[cfg(any(target_os = "macos", target_os = "windows"))]
fn image_on_clipboard() -> Option<(String, Vec<u8>)> {
    use clipboard_rs::common::RustImage;
    use clipboard_rs::{Clipboard, ContentFormat};

    let ctx = native_context()?;
    if !ctx.has(ContentFormat::Image) {
        return None;
    }
    let png = ctx
        .get_image()
        .and_then(|image| image.to_png())
        .map_err(|e| debug!(error = %e, "could not read clipboard image"))
        .ok()?;
    let bytes = png.get_bytes().to_vec();
    (!bytes.is_empty()).then(|| ("image/png".to_string(), bytes))
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn read_text() -> Option<String> {
    use clipboard_rs::{Clipboard, ContentFormat};

    let ctx = native_context()?;
    if !ctx.has(ContentFormat::Text) {
        return None;
    }
    ctx.get_text()
        .map_err(|e| debug!(error = %e, "could not read clipboard text"))
        .ok()
}

/// Runs a command and returns its stdout if it succeeded.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn capture(program: &str, args: &[&str]) -> Option<Vec<u8>> {
    match Command::new(program)
        .args(args)
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) if output.status.success() => Some(output.stdout),
        Ok(output) => {
            debug!(program, status = %output.status, "clipboard command failed");
            None
        }
        Err(e) => {
            debug!(program, error = %e, "clipboard command unavailable");
            None
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn capture_text(program: &str, args: &[&str]) -> Option<String> {
    capture(program, args).and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Picks the first `image/*` entry from a list of offered MIME types.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn first_image_type(types: &str) -> Option<String> {
    types
        .lines()
        .map(str::trim)
        .find(|t| is_image_mime(t))
        .map(str::to_string)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn image_on_clipboard() -> Option<(String, CommandBlob)> {
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        if let Some(mime) = capture_text("wl-paste", &["--list-types"])
            .as_deref()
            .and_then(first_image_type)
        {
            let blob = CommandBlob::new("wl-paste", &["--no-newline", "--type", &mime]);
            return Some((mime, blob));
        }
    }

    let mime = capture_text("xclip", &["-selection", "clipboard", "-t", "TARGETS", "-o"])
        .as_deref()
        .and_then(first_image_type)?;
    let blob = CommandBlob::new("xclip", &["-selection", "clipboard", "-t", &mime, "-o"]);
    Some((mime, blob))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn read_text() -> Option<String> {
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        if let Some(text) = capture_text("wl-paste", &["--no-newline"]) {
            return Some(text);
        }
    }
    capture_text("xclip", &["-selection", "clipboard", "-o"])
        .or_else(|| capture_text("xsel", &["--clipboard", "--output"]))
}
