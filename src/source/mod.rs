//! Headline source abstraction layer.
//!
//! This module defines the [`HeadlineSource`] trait together with the
//! request/response types shared by every source: [`PageQuery`] going out and
//! [`HeadlinesPage`] coming back.  The concrete NewsAPI implementation lives
//! in [`newsapi`].
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `gnews.rs`).
//! 2. Define a struct holding its configuration and implement
//!    [`HeadlineSource`] for it.
//! 3. Add `mod gnews;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of [`NewsApiSource`].
//!
//! The controller, fetch tasks and UI are all source-agnostic.

mod article;
mod newsapi;

pub use article::{Article, ArticleSource};
pub use newsapi::{NewsApiSource, DEFAULT_API_BASE, DEFAULT_RELAY};

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Category;

/// Parameters for one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Two-letter country code, e.g. `us`.
    pub country: String,
    pub category: Category,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

/// One decoded page of headlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlinesPage {
    /// Articles on this page, in API order.  Empty when the API sent none.
    pub articles: Vec<Article>,
    /// Total result count as reported by the API.  `None` when the value was
    /// missing or not a usable number.
    pub total_results: Option<u64>,
}

/// Trait that every headline source must implement.
///
/// Fetch tasks call [`fetch_page()`](HeadlineSource::fetch_page) from tokio
/// worker threads, so implementations must be [`Send`] + [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl HeadlineSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch_page(&self, query: &PageQuery) -> Result<HeadlinesPage> {
///         // Perform HTTP, then convert into Article values.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Human-readable label used in logs and the status bar.
    fn name(&self) -> &str;

    /// Fetch a single page of headlines.
    ///
    /// Errors are reported back to the controller, which degrades
    /// gracefully and shows them in the status bar.
    async fn fetch_page(&self, query: &PageQuery) -> Result<HeadlinesPage>;
}
