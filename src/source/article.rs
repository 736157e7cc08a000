//! The article record returned by the headlines API.
//!
//! `Article` mirrors one entry of the `articles` array in a NewsAPI
//! `top-headlines` response.  Every field is optional because the provider
//! routinely omits or nulls them; the card renderer supplies the fallbacks.
//!
//! There is no identity field.  List position is the only key and duplicate
//! articles returned by the API are kept as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The publisher block nested inside each article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A single headline as delivered by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Publisher; usually only `name` is filled in.
    pub source: Option<ArticleSource>,

    pub author: Option<String>,

    /// Headline text.
    pub title: Option<String>,

    /// Short summary or lede.
    pub description: Option<String>,

    /// Link to the full story.
    pub url: Option<String>,

    /// Lead image; may be missing, empty or unusable.
    pub url_to_image: Option<String>,

    /// ISO-8601 publication timestamp, kept raw so one malformed date does
    /// not fail the whole page.
    pub published_at: Option<String>,

    /// Truncated body text.  Not rendered.
    pub content: Option<String>,
}

impl Article {
    /// Name of the publishing outlet, if present and non-blank.
    pub fn source_name(&self) -> Option<&str> {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Publication time parsed as RFC 3339; `None` when absent or invalid.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
