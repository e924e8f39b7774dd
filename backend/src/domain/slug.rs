//! Slug validation shared by community identifiers.
//!
//! Slugs are non-empty identifiers composed of ASCII letters, digits,
//! hyphens and underscores.

/// Return `true` when `value` is a valid URL slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && has_allowed_slug_chars(value)
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
