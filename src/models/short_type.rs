//! Coarse content classification for captured responses.
//!
//! The short type drives list filtering and the choice between the image
//! and raw body viewers. It is derived from the response `Content-Type`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coarse classification of a response body.
///
/// The declaration order is the canonical order used when the enabled
/// filters are persisted as a boolean sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortType {
    /// application/json and `+json` variants
    Json,
    /// application/xml, text/xml and `+xml` variants
    Xml,
    /// text/html
    Html,
    /// image/*
    Image,
    /// Anything else, including missing content types
    Other,
}

impl ShortType {
    /// Number of short types.
    pub const COUNT: usize = 5;

    /// All short types in canonical order.
    pub const ALL: [ShortType; Self::COUNT] = [
        ShortType::Json,
        ShortType::Xml,
        ShortType::Html,
        ShortType::Image,
        ShortType::Other,
    ];

    /// Returns the display name shown in the filter list.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShortType::Json => "JSON",
            ShortType::Xml => "XML",
            ShortType::Html => "HTML",
            ShortType::Image => "Image",
            ShortType::Other => "Other",
        }
    }

    /// Position of this type in [`ShortType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            ShortType::Json => 0,
            ShortType::Xml => 1,
            ShortType::Html => 2,
            ShortType::Image => 3,
            ShortType::Other => 4,
        }
    }

    /// Classifies a raw `Content-Type` value.
    ///
    /// Parameters such as `charset` are ignored and matching is
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use netfox::models::ShortType;
    ///
    /// assert_eq!(
    ///     ShortType::from_content_type(Some("application/json; charset=utf-8")),
    ///     ShortType::Json
    /// );
    /// assert_eq!(ShortType::from_content_type(Some("image/png")), ShortType::Image);
    /// assert_eq!(ShortType::from_content_type(None), ShortType::Other);
    /// ```
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return ShortType::Other;
        };

        let content_type_lower = content_type.to_lowercase();
        let mime_type = content_type_lower
            .split(';')
            .next()
            .unwrap_or(&content_type_lower)
            .trim();

        if mime_type.contains("json") {
            ShortType::Json
        } else if mime_type.contains("xml") {
            ShortType::Xml
        } else if mime_type.contains("html") {
            ShortType::Html
        } else if mime_type.starts_with("image/") {
            ShortType::Image
        } else {
            ShortType::Other
        }
    }
}

impl std::fmt::Display for ShortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finds the `Content-Type` header in a case-insensitive manner.
pub fn find_content_type(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.as_str())
}
