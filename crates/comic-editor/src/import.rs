//! Story and frame imports.
//!
//! Validation happens here, before anything touches the document: `.txt`
//! uploads are checked by name and size, story URLs are parsed with
//! `winnow`, and video frames must be non-empty base64 payloads.

use crate::error::TransportError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use comic_core::InputError;
use std::fmt;
use std::path::Path;
use winnow::ascii::Caseless;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Largest accepted `.txt` upload.
pub const MAX_TEXT_FILE_BYTES: u64 = 5 * 1024 * 1024;

// ─── Text files ─────────────────────────────────────────────────────────

/// Check an upload's name and size before reading it.
pub fn validate_text_file(name: &str, size: u64) -> Result<(), InputError> {
    let is_txt = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(InputError::InvalidFileType(name.to_string()));
    }
    if size > MAX_TEXT_FILE_BYTES {
        return Err(InputError::FileTooLarge {
            size,
            limit: MAX_TEXT_FILE_BYTES,
        });
    }
    Ok(())
}

/// Validate and decode an uploaded `.txt` file. Invalid UTF-8 is replaced,
/// not rejected.
pub fn read_text_upload(name: &str, bytes: &[u8]) -> Result<String, InputError> {
    validate_text_file(name, bytes.len() as u64)?;
    let text = String::from_utf8_lossy(bytes).into_owned();
    if text.trim().is_empty() {
        return Err(InputError::EmptyText);
    }
    Ok(text)
}

/// Collapse whitespace runs in fetched story text to single spaces.
pub fn sanitize_story(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─── URLs ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

/// A story URL that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: Option<u16>,
    /// Path, query and fragment, verbatim; may be empty.
    pub rest: String,
}

impl fmt::Display for StoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = match self.scheme {
            Scheme::Http => "http",
            Scheme::Https => "https",
        };
        write!(f, "{scheme}://{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        f.write_str(&self.rest)
    }
}

fn scheme(input: &mut &str) -> ModalResult<Scheme> {
    alt((
        Caseless("https").value(Scheme::Https),
        Caseless("http").value(Scheme::Http),
    ))
    .parse_next(input)
}

fn is_host_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn port(input: &mut &str) -> ModalResult<u16> {
    preceded(':', take_while(1..=5, |c: char| c.is_ascii_digit()))
        .try_map(str::parse::<u16>)
        .parse_next(input)
}

fn story_url(input: &mut &str) -> ModalResult<StoryUrl> {
    let scheme = scheme.parse_next(input)?;
    "://".parse_next(input)?;
    let host = take_while(1.., is_host_char).parse_next(input)?;
    let port = opt(port).parse_next(input)?;
    let rest = alt((
        ('/', take_till(0.., char::is_whitespace)).take(),
        ('?', take_till(0.., char::is_whitespace)).take(),
        ('#', take_till(0.., char::is_whitespace)).take(),
        "",
    ))
    .parse_next(input)?;
    Ok(StoryUrl {
        scheme,
        host: host.to_ascii_lowercase(),
        port,
        rest: rest.to_string(),
    })
}

/// Parse a story URL: `http` or `https`, a non-empty host, optional port,
/// and no embedded whitespace.
pub fn parse_story_url(url: &str) -> Result<StoryUrl, InputError> {
    let trimmed = url.trim();
    story_url
        .parse(trimmed)
        .map_err(|_| InputError::MalformedUrl(trimmed.to_string()))
}

/// Fetches story text from a remote source.
#[allow(async_fn_in_trait)]
pub trait StorySource {
    async fn fetch_story(&self, url: &StoryUrl) -> Result<String, TransportError>;
}

// ─── Video frames ───────────────────────────────────────────────────────

/// Frames must be a non-empty list of non-empty, standard-alphabet
/// base64 payloads. Only the encoding is checked, not the JPEG inside.
pub fn validate_frames(frames: &[String]) -> Result<(), InputError> {
    if frames.is_empty() {
        return Err(InputError::NoFrames);
    }
    if let Some(index) = frames
        .iter()
        .position(|frame| frame.is_empty() || STANDARD.decode(frame).is_err())
    {
        return Err(InputError::InvalidFrame(index));
    }
    Ok(())
}
