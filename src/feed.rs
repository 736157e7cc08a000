//! Pagination controller.
//!
//! [`Feed`] owns the page state for one `{country, category, page_size}`
//! selection: the current page, the cumulative article list, the last
//! reported total and the loading flags.  It never performs I/O itself.
//! Each operation hands back a [`FetchRequest`] for the caller to run, and
//! the outcome is fed back through [`Feed::apply`].
//!
//! ```text
//! Idle ─► LoadingInitial ─► Ready ─► LoadingMore ─► Ready ─► … ─► Exhausted
//! ```
//!
//! Every initial fetch opens a new *generation*.  Responses issued under an
//! older generation are dropped, so a late reply for a previous category can
//! never overwrite the current one.

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::Category;
use crate::source::{Article, HeadlinesPage, PageQuery};

/// Which of the two fetch operations a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Page 1, replacing the list.
    Initial,
    /// A follow-up page, appended to the list.
    More,
}

/// A page request the caller should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub kind: FetchKind,
    pub query: PageQuery,
}

/// Outcome of one request, sent back to [`Feed::apply`].
#[derive(Debug)]
pub struct FetchMsg {
    pub generation: u64,
    pub kind: FetchKind,
    pub page: u32,
    pub result: Result<HeadlinesPage>,
}

/// Controller phase, derived from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    Exhausted,
}

/// What [`Feed::apply`] did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The message belonged to an older generation and was ignored.
    Stale,
    /// Articles were stored.
    Loaded { kind: FetchKind, added: usize },
    /// The request failed; state degraded as described on [`Feed::apply`].
    Failed { kind: FetchKind, error: String },
}

#[derive(Debug)]
pub struct Feed {
    country: String,
    category: Category,
    page_size: u32,

    /// Last successfully loaded page, starting at 1.
    page: u32,
    /// Append-only within a generation; list position is the only key.
    articles: Vec<Article>,
    /// Total reported by the API.
    total_results: u64,
    /// True only while the page-1 request is outstanding.
    loading: bool,
    /// True while a follow-up page request is outstanding.
    more_in_flight: bool,
    generation: u64,
}

impl Feed {
    pub fn new(country: impl Into<String>, category: Category, page_size: u32) -> Self {
        Self {
            country: country.into(),
            category,
            page_size,
            page: 1,
            articles: Vec::new(),
            total_results: 0,
            loading: false,
            more_in_flight: false,
            generation: 0,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// No pages remain: the list already holds at least `total_results`
    /// articles.
    pub fn is_exhausted(&self) -> bool {
        self.articles.len() as u64 >= self.total_results
    }

    pub fn has_more(&self) -> bool {
        !self.loading && !self.is_exhausted()
    }

    pub fn phase(&self) -> Phase {
        if self.generation == 0 {
            Phase::Idle
        } else if self.loading {
            Phase::LoadingInitial
        } else if self.more_in_flight {
            Phase::LoadingMore
        } else if self.is_exhausted() {
            Phase::Exhausted
        } else {
            Phase::Ready
        }
    }

    // -- operations ----------------------------------------------------------

    /// Switch category and restart from page 1.
    pub fn set_category(&mut self, category: Category) -> FetchRequest {
        self.category = category;
        self.begin_initial()
    }

    /// Start (or restart) the session: page 1, empty list, zero total,
    /// loading.
    ///
    /// Any request still in flight from before becomes stale.
    pub fn begin_initial(&mut self) -> FetchRequest {
        self.generation += 1;
        self.page = 1;
        self.articles.clear();
        self.total_results = 0;
        self.loading = true;
        self.more_in_flight = false;

        info!(
            "fetching page 1 of {} headlines for {} (generation {})",
            self.category, self.country, self.generation
        );

        self.request(FetchKind::Initial, 1)
    }

    /// Request the next page, if there is one.
    ///
    /// Returns `None` when the feed is exhausted, the initial page is still
    /// loading, or another follow-up page is already in flight.
    pub fn begin_more(&mut self) -> Option<FetchRequest> {
        if self.generation == 0 || self.loading || self.is_exhausted() {
            return None;
        }
        if self.more_in_flight {
            debug!("page {} already in flight, ignoring trigger", self.page + 1);
            return None;
        }

        self.more_in_flight = true;
        let next = self.page + 1;
        info!(
            "fetching page {next} ({} of {} loaded)",
            self.articles.len(),
            self.total_results
        );

        Some(self.request(FetchKind::More, next))
    }

    /// Fold a finished request into the state.
    ///
    /// * Initial success replaces the list and the total (absent total → 0).
    /// * Initial failure empties the list and clears loading.
    /// * More success appends, advances the page, and takes the total only if
    ///   it is positive.  An empty follow-up page ends the feed.
    /// * More failure changes nothing but the in-flight flag, so the same
    ///   page is requested on the next trigger.
    pub fn apply(&mut self, msg: FetchMsg) -> Applied {
        if msg.generation != self.generation {
            warn!(
                "dropping stale {:?} response for page {} (generation {} != {})",
                msg.kind, msg.page, msg.generation, self.generation
            );
            return Applied::Stale;
        }

        match (msg.kind, msg.result) {
            (FetchKind::Initial, Ok(page)) => {
                self.loading = false;
                self.page = 1;
                self.total_results = page.total_results.unwrap_or(0);
                self.articles = page.articles;
                info!(
                    "loaded {} articles, {} in total",
                    self.articles.len(),
                    self.total_results
                );
                Applied::Loaded {
                    kind: FetchKind::Initial,
                    added: self.articles.len(),
                }
            }
            (FetchKind::Initial, Err(e)) => {
                self.loading = false;
                self.articles.clear();
                Applied::Failed {
                    kind: FetchKind::Initial,
                    error: format!("{e:#}"),
                }
            }
            (FetchKind::More, Ok(page)) => {
                self.more_in_flight = false;
                let added = page.articles.len();
                self.articles.extend(page.articles);
                self.page = msg.page;

                match page.total_results {
                    Some(total) if total > 0 => self.total_results = total,
                    _ => debug!("keeping total {} (page reported none)", self.total_results),
                }
                if added == 0 {
                    warn!(
                        "page {} was empty with {} of {} loaded, treating feed as exhausted",
                        msg.page,
                        self.articles.len(),
                        self.total_results
                    );
                    self.total_results = self.articles.len() as u64;
                }

                Applied::Loaded {
                    kind: FetchKind::More,
                    added,
                }
            }
            (FetchKind::More, Err(e)) => {
                self.more_in_flight = false;
                Applied::Failed {
                    kind: FetchKind::More,
                    error: format!("{e:#}"),
                }
            }
        }
    }

    fn request(&self, kind: FetchKind, page: u32) -> FetchRequest {
        FetchRequest {
            generation: self.generation,
            kind,
            query: PageQuery {
                country: self.country.clone(),
                category: self.category,
                page,
                page_size: self.page_size,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
