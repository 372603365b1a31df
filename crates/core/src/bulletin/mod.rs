mod pagination;
mod types;

pub use pagination::{
    clamp_limit, decode_cursor, encode_cursor, page_from, resolve_cursor, sort_comments,
    CommentPage, CursorError, SortKey, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use types::{
    Audit, Comment, CommentPatch, Entity, Event, EventPatch, Field, FieldValue, UNKNOWN_ACTOR,
};
