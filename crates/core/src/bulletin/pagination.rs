//! Pure functions for cursor-based comment pagination.
//!
//! Comments of an event are ordered by `(created_at, uqid)` ascending. A
//! cursor is the encoded sort key of the last comment a page returned, so a
//! follow-up request resumes strictly after it even when newer comments were
//! appended in between.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::types::{Comment, Entity};

/// Page size used when a request does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest page a request may ask for.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Errors that can occur when resolving a pagination cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("Malformed cursor: {0}")]
    Malformed(String),
    #[error("Cursor does not match any comment")]
    Unmatched,
}

/// Position of a comment in pagination order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub created_at: DateTime<Utc>,
    pub uqid: Uuid,
}

impl SortKey {
    pub fn of(comment: &Comment) -> Self {
        Self {
            created_at: comment.audit.created_at,
            uqid: comment.uqid(),
        }
    }
}

/// One page of comments plus the token for the following page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    /// `None` when this page reaches the end of the collection.
    pub next_cursor: Option<String>,
}

/// Encodes a sort key as an opaque, URL-safe cursor.
pub fn encode_cursor(key: &SortKey) -> String {
    let raw = format!(
        "{}|{}",
        key.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        key.uqid
    );
    URL_SAFE_NO_PAD.encode(raw)
}

/// Decodes a cursor produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &str) -> Result<SortKey, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|e| CursorError::Malformed(e.to_string()))?;
    let raw = String::from_utf8(bytes).map_err(|e| CursorError::Malformed(e.to_string()))?;

    let (timestamp, uqid) = raw
        .split_once('|')
        .ok_or_else(|| CursorError::Malformed("missing separator".to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| CursorError::Malformed(e.to_string()))?
        .with_timezone(&Utc);
    let uqid = Uuid::parse_str(uqid).map_err(|e| CursorError::Malformed(e.to_string()))?;

    Ok(SortKey { created_at, uqid })
}

/// Clamps a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Sorts comments into pagination order.
pub fn sort_comments(comments: &mut [Comment]) {
    comments.sort_by_key(SortKey::of);
}

/// Returns the index of the first comment after `cursor`.
///
/// `sorted` must already be in pagination order. No cursor means the first
/// page (index 0).
pub fn resolve_cursor(sorted: &[Comment], cursor: Option<&str>) -> Result<usize, CursorError> {
    let Some(cursor) = cursor else {
        return Ok(0);
    };

    let key = decode_cursor(cursor)?;
    sorted
        .iter()
        .position(|comment| SortKey::of(comment) == key)
        .map(|idx| idx + 1)
        .ok_or(CursorError::Unmatched)
}

/// Cuts a page of at most `limit` comments starting at `start`.
///
/// Takes one extra element to find out whether another page exists; the
/// returned cursor points at the last comment of this page.
pub fn page_from(sorted: Vec<Comment>, start: usize, limit: usize) -> CommentPage {
    let mut window: Vec<Comment> = sorted.into_iter().skip(start).take(limit + 1).collect();

    let has_more = window.len() > limit;
    window.truncate(limit);

    let next_cursor = if has_more {
        window.last().map(|last| encode_cursor(&SortKey::of(last)))
    } else {
        None
    };

    CommentPage {
        comments: window,
        next_cursor,
    }
}
