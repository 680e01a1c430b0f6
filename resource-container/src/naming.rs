//! Centralized identifier conventions for resource containers.
//!
//! This module is the single source of truth for all container naming:
//! - Chapter/chunk slug normalization (e.g., `1` -> `01`)
//! - Localized default chapter titles (e.g., "Chapter 1")
//! - Container slugs (e.g., `en_gen_ulb`)
//! - Mapping between container types and archive mime types
//!
//! All other modules should use these functions rather than formatting
//! identifiers directly. This keeps converted containers addressable by
//! the same rules the container entity uses to read them back.

use thiserror::Error;

/// Base mime type for resource container archives.
///
/// Container types are appended with a `+`, e.g. `application/tsrc+book`.
pub const BASE_MIME_TYPE: &str = "application/tsrc";

/// Errors raised while building or normalizing identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    /// The slug was an empty string.
    #[error("slug cannot be an empty string")]
    Empty,

    /// A container slug part was missing.
    #[error("missing container slug part: {0}")]
    MissingPart(&'static str),
}

/// Normalize a chapter or chunk slug to at least 2 significant digits.
///
/// Purely numeric slugs are stripped of leading zeros and re-padded to a
/// minimum of two digits. Non-numeric slugs pass through unchanged.
///
/// # Examples
///
/// ```
/// use resource_container::naming::normalize_slug;
///
/// assert_eq!(normalize_slug("1").unwrap(), "01");
/// assert_eq!(normalize_slug("001").unwrap(), "01");
/// assert_eq!(normalize_slug("123").unwrap(), "123");
/// assert_eq!(normalize_slug("0").unwrap(), "00");
/// assert_eq!(normalize_slug("word").unwrap(), "word");
/// assert!(normalize_slug("").is_err());
/// ```
pub fn normalize_slug(slug: &str) -> Result<String, SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }
    if !slug.chars().all(|c| c.is_ascii_digit()) {
        return Ok(slug.to_string());
    }

    let mut normalized = slug.trim_start_matches('0').to_string();
    while normalized.len() < 2 {
        normalized.insert(0, '0');
    }
    Ok(normalized)
}

/// Build a localized default chapter title, e.g. "Chapter 1".
///
/// Numeric chapter identifiers are stripped of leading zeros before being
/// substituted into the template. Languages without a translation fall
/// back to the English template.
///
/// # Examples
///
/// ```
/// use resource_container::naming::localize_chapter_title;
///
/// assert_eq!(localize_chapter_title("en", "1"), "Chapter 1");
/// assert_eq!(localize_chapter_title("en", "01"), "Chapter 1");
/// assert_eq!(localize_chapter_title("hu", "3"), "3. fejezet");
/// assert_eq!(localize_chapter_title("xyz", "2"), "Chapter 2");
/// ```
pub fn localize_chapter_title(language_slug: &str, chapter_number: &str) -> String {
    let template = match language_slug {
        "ar" => "الفصل %",
        "en" => "Chapter %",
        "ru" => "Глава %",
        "hu" => "%. fejezet",
        "sr-Latin" => "Поглавље %",
        _ => "Chapter %",
    };

    let number = if !chapter_number.is_empty() && chapter_number.chars().all(|c| c.is_ascii_digit())
    {
        let stripped = chapter_number.trim_start_matches('0');
        if stripped.is_empty() { "0" } else { stripped }
    } else {
        chapter_number
    };

    template.replace('%', number)
}

/// Build a properly formatted container slug.
///
/// # Examples
///
/// ```
/// use resource_container::naming::container_slug;
///
/// assert_eq!(container_slug("en", "gen", "ulb").unwrap(), "en_gen_ulb");
/// assert!(container_slug("en", "", "ulb").is_err());
/// ```
pub fn container_slug(
    language: &str,
    project: &str,
    resource: &str,
) -> Result<String, SlugError> {
    if language.is_empty() {
        return Err(SlugError::MissingPart("language"));
    }
    if project.is_empty() {
        return Err(SlugError::MissingPart("project"));
    }
    if resource.is_empty() {
        return Err(SlugError::MissingPart("resource"));
    }
    Ok(format!("{}_{}_{}", language, project, resource))
}

/// Build a container mime type from a container type.
///
/// # Examples
///
/// ```
/// use resource_container::naming::type_to_mime;
///
/// assert_eq!(type_to_mime("book"), "application/tsrc+book");
/// ```
pub fn type_to_mime(resource_type: &str) -> String {
    format!("{}+{}", BASE_MIME_TYPE, resource_type)
}

/// Extract the container type from a container mime type.
///
/// Returns `None` when the mime type carries no `+type` suffix.
///
/// # Examples
///
/// ```
/// use resource_container::naming::mime_to_type;
///
/// assert_eq!(mime_to_type("application/tsrc+book"), Some("book"));
/// assert_eq!(mime_to_type("application/tsrc"), None);
/// ```
pub fn mime_to_type(mime_type: &str) -> Option<&str> {
    mime_type.split('+').nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_slug_pads_numeric() {
        assert_eq!(normalize_slug("1").unwrap(), "01");
        assert_eq!(normalize_slug("001").unwrap(), "01");
        assert_eq!(normalize_slug("12").unwrap(), "12");
        assert_eq!(normalize_slug("123").unwrap(), "123");
        assert_eq!(normalize_slug("0123").unwrap(), "123");
    }

    #[test]
    fn test_normalize_slug_zero() {
        assert_eq!(normalize_slug("0").unwrap(), "00");
        assert_eq!(normalize_slug("00").unwrap(), "00");
        assert_eq!(normalize_slug("000").unwrap(), "00");
    }

    #[test]
    fn test_normalize_slug_words_pass_through() {
        assert_eq!(normalize_slug("a").unwrap(), "a");
        assert_eq!(normalize_slug("word").unwrap(), "word");
        assert_eq!(normalize_slug("0word").unwrap(), "0word");
        assert_eq!(normalize_slug("front").unwrap(), "front");
    }

    #[test]
    fn test_normalize_slug_empty_fails() {
        assert_eq!(normalize_slug(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_localize_chapter_title_english() {
        assert_eq!(localize_chapter_title("en", "1"), "Chapter 1");
        assert_eq!(localize_chapter_title("en", "01"), "Chapter 1");
        assert_eq!(localize_chapter_title("en", "12"), "Chapter 12");
    }

    #[test]
    fn test_localize_chapter_title_arabic() {
        assert_eq!(localize_chapter_title("ar", "1"), "الفصل 1");
    }

    #[test]
    fn test_localize_chapter_title_hungarian_placement() {
        assert_eq!(localize_chapter_title("hu", "7"), "7. fejezet");
    }

    #[test]
    fn test_localize_chapter_title_unknown_falls_back_to_english() {
        assert_eq!(localize_chapter_title("xyz", "2"), "Chapter 2");
        assert_eq!(localize_chapter_title("", "2"), "Chapter 2");
    }

    #[test]
    fn test_localize_chapter_title_non_numeric_passes_through() {
        assert_eq!(localize_chapter_title("en", "front"), "Chapter front");
    }

    #[test]
    fn test_container_slug() {
        assert_eq!(container_slug("en", "gen", "ulb").unwrap(), "en_gen_ulb");
    }

    #[test]
    fn test_container_slug_missing_part() {
        assert_eq!(
            container_slug("", "gen", "ulb"),
            Err(SlugError::MissingPart("language"))
        );
        assert_eq!(
            container_slug("en", "", "ulb"),
            Err(SlugError::MissingPart("project"))
        );
        assert_eq!(
            container_slug("en", "gen", ""),
            Err(SlugError::MissingPart("resource"))
        );
    }

    #[test]
    fn test_mime_round_trip() {
        let mime = type_to_mime("book");
        assert_eq!(mime_to_type(&mime), Some("book"));
    }

    #[test]
    fn test_mime_to_type_without_suffix() {
        assert_eq!(mime_to_type("text/markdown"), None);
    }
}
