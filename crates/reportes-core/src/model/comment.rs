use serde::{Deserialize, Serialize};

/// Author recorded when a comment is added without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Upper bound on comment body length, in characters.
pub const MAX_COMMENT_BODY_CHARS: usize = 4_000;

/// A note appended to a ticket. Comments are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub ticket_id: i64,
    pub body: String,
    pub author: String,
    /// Local wall-clock time as `%d/%m/%y %H:%M`.
    pub created_at: String,
}

/// Error returned when a comment cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentError {
    #[error("comment body must not be empty")]
    Empty,
    #[error("comment body must be <= {MAX_COMMENT_BODY_CHARS} characters (got {0})")]
    TooLong(usize),
}

/// Trim and validate a comment body.
///
/// # Errors
///
/// Returns [`CommentError`] for blank or oversized bodies.
pub fn validate_body(body: &str) -> Result<&str, CommentError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(CommentError::Empty);
    }
    let chars = body.chars().count();
    if chars > MAX_COMMENT_BODY_CHARS {
        return Err(CommentError::TooLong(chars));
    }
    Ok(body)
}

/// Resolve the author name, falling back to [`ANONYMOUS_AUTHOR`].
#[must_use]
pub fn author_or_anonymous(author: Option<&str>) -> &str {
    match author.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => ANONYMOUS_AUTHOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_rejected() {
        assert_eq!(validate_body("  \n "), Err(CommentError::Empty));
    }

    #[test]
    fn oversized_body_rejected() {
        let body = "x".repeat(MAX_COMMENT_BODY_CHARS + 1);
        assert_eq!(
            validate_body(&body),
            Err(CommentError::TooLong(MAX_COMMENT_BODY_CHARS + 1))
        );
    }

    #[test]
    fn author_defaults_to_anonymous() {
        assert_eq!(author_or_anonymous(None), ANONYMOUS_AUTHOR);
        assert_eq!(author_or_anonymous(Some("   ")), ANONYMOUS_AUTHOR);
        assert_eq!(author_or_anonymous(Some(" Chloe ")), "Chloe");
    }
}
