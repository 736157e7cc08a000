//! Article cards.
//!
//! [`NewsCard::from_article`] turns one [`Article`] into the strings a card
//! displays.  It is a pure function of its input; the UI layer only styles
//! and lays out the result.

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::source::Article;

/// Maximum characters of the headline shown on a card.
pub const TITLE_LIMIT: usize = 45;

/// Maximum characters of the description shown on a card.
pub const DESCRIPTION_LIMIT: usize = 88;

/// Image shown when an article has none, or its own cannot be loaded.
pub const FALLBACK_IMAGE: &str = "https://dims.apnews.com/dims4/default/f3c9330/2147483647/strip/true/crop/5785x3254+0+301/resize/1440x810!/quality/90/?url=https%3A%2F%2Fassets.apnews.com%2F89%2F52%2Ff163b1b93b8b9d670ef7f8bd6105%2F57fca08fcaa3423685511f50aa37c30f";

const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The image slot of a card.
///
/// Swapping to [`FALLBACK_IMAGE`] happens at most once.  A failure reported
/// against the fallback itself is ignored, so a broken fallback can never
/// loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    url: String,
    fell_back: bool,
}

impl CardImage {
    pub fn new(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Self {
                url: url.to_string(),
                fell_back: false,
            },
            None => Self {
                url: FALLBACK_IMAGE.to_string(),
                fell_back: true,
            },
        }
    }

    /// Report that the current image could not be loaded.
    ///
    /// Returns `true` if this switched the card to the fallback.
    pub fn mark_failed(&mut self) -> bool {
        if self.fell_back {
            return false;
        }
        self.url = FALLBACK_IMAGE.to_string();
        self.fell_back = true;
        true
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_fallback(&self) -> bool {
        self.fell_back
    }
}

/// Display-ready fields for one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsCard {
    pub title: String,
    pub description: String,
    pub image: CardImage,
    pub link: Option<String>,
    pub author: String,
    pub date: String,
    pub source: Option<String>,
}

impl NewsCard {
    pub fn from_article(article: &Article) -> Self {
        let mut image = CardImage::new(article.url_to_image.as_deref());
        if !is_loadable(image.url()) {
            image.mark_failed();
        }

        Self {
            title: article
                .title
                .as_deref()
                .map(|t| truncate_chars(t, TITLE_LIMIT))
                .unwrap_or_else(|| "No title".into()),
            description: article
                .description
                .as_deref()
                .map(|d| truncate_chars(d, DESCRIPTION_LIMIT))
                .unwrap_or_else(|| "No description".into()),
            image,
            link: article.url.clone(),
            author: article
                .author
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or("Unknown")
                .to_string(),
            date: format_date(article.published()),
            source: article.source_name().map(String::from),
        }
    }

    /// The "By … on …" byline.
    pub fn byline(&self) -> String {
        format!("By {} on {}", self.author, self.date)
    }
}

/// First `limit` characters of `s`.  Cuts mid-word.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Fixed, locale-independent timestamp, e.g. `Mon, 01 Jan 2024 00:00:00 GMT`.
pub fn format_date(published: Option<DateTime<Utc>>) -> String {
    published
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "no date".into())
}

/// A terminal cannot fetch pixels, so "loads" means an absolute http(s) URL.
fn is_loadable(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ArticleSource;

    fn full_article() -> Article {
        Article {
            source: Some(ArticleSource {
                id: Some("ap".into()),
                name: Some("Associated Press".into()),
            }),
            author: Some("Sam Reporter".into()),
            title: Some("A headline that is very much longer than forty-five characters".into()),
            description: Some("d".repeat(200)),
            url: Some("https://example.com/story".into()),
            url_to_image: Some("https://example.com/story.jpg".into()),
            published_at: Some("2024-01-01T00:00:00Z".into()),
            content: None,
        }
    }

    #[test]
    fn title_and_description_are_truncated() {
        let card = NewsCard::from_article(&full_article());

        assert_eq!(card.title.chars().count(), TITLE_LIMIT);
        assert_eq!(card.title, "A headline that is very much longer than fort");
        assert_eq!(card.description.chars().count(), DESCRIPTION_LIMIT);
    }

    #[test]
    fn short_text_is_left_alone() {
        let article = Article {
            title: Some("Short".into()),
            description: Some("Brief.".into()),
            ..Article::default()
        };
        let card = NewsCard::from_article(&article);
        assert_eq!(card.title, "Short");
        assert_eq!(card.description, "Brief.");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let title = "é".repeat(60);
        let out = truncate_chars(&title, TITLE_LIMIT);
        assert_eq!(out.chars().count(), TITLE_LIMIT);
        assert_eq!(out.len(), TITLE_LIMIT * 2);
    }

    #[test]
    fn missing_text_gets_placeholders() {
        let card = NewsCard::from_article(&Article::default());

        assert_eq!(card.title, "No title");
        assert_eq!(card.description, "No description");
        assert_eq!(card.author, "Unknown");
        assert_eq!(card.date, "no date");
        assert!(card.source.is_none());
        assert!(card.link.is_none());
    }

    #[test]
    fn blank_author_defaults_to_unknown() {
        let article = Article {
            author: Some("   ".into()),
            ..Article::default()
        };
        assert_eq!(NewsCard::from_article(&article).author, "Unknown");
    }

    #[test]
    fn date_uses_fixed_gmt_format() {
        let card = NewsCard::from_article(&full_article());
        assert_eq!(card.date, "Mon, 01 Jan 2024 00:00:00 GMT");
        assert_eq!(card.byline(), "By Sam Reporter on Mon, 01 Jan 2024 00:00:00 GMT");
    }

    #[test]
    fn valid_image_is_kept() {
        let card = NewsCard::from_article(&full_article());
        assert_eq!(card.image.url(), "https://example.com/story.jpg");
        assert!(!card.image.is_fallback());
    }

    #[test]
    fn missing_or_blank_image_uses_fallback() {
        for image in [None, Some(""), Some("   ")] {
            let article = Article {
                url_to_image: image.map(String::from),
                ..Article::default()
            };
            let card = NewsCard::from_article(&article);
            assert_eq!(card.image.url(), FALLBACK_IMAGE);
            assert!(card.image.is_fallback());
        }
    }

    #[test]
    fn unloadable_image_falls_back() {
        for image in ["//cdn.example.com/a.jpg", "data:image/png;base64,AAAA", "not a url"] {
            let article = Article {
                url_to_image: Some(image.into()),
                ..Article::default()
            };
            assert_eq!(NewsCard::from_article(&article).image.url(), FALLBACK_IMAGE);
        }
    }

    #[test]
    fn fallback_happens_exactly_once() {
        let mut image = CardImage::new(Some("https://example.com/broken.jpg"));

        assert!(image.mark_failed());
        assert_eq!(image.url(), FALLBACK_IMAGE);

        // The fallback failing too must not trigger another swap.
        assert!(!image.mark_failed());
        assert_eq!(image.url(), FALLBACK_IMAGE);
    }

    #[test]
    fn missing_image_never_swaps_again() {
        let mut image = CardImage::new(None);
        assert!(!image.mark_failed());
    }

    #[test]
    fn source_badge_comes_from_publisher_name() {
        let card = NewsCard::from_article(&full_article());
        assert_eq!(card.source.as_deref(), Some("Associated Press"));
    }
}
