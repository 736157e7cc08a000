use ratatui::widgets::ListState;

use crate::config::Category;
use crate::feed::{Applied, Feed, FetchKind, FetchMsg, FetchRequest, Phase};

/// How close to the end of the list the selection must get before the next
/// page is requested.
pub const SCROLL_THRESHOLD: usize = 2;

/// Rows moved by PageUp / PageDown.
const PAGE_STEP: usize = 5;

pub struct App {
    /// Pagination state for the current category.
    pub feed: Feed,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    /// Top progress bar, 0–100.  Hidden at 100.
    pub progress: u16,
    /// Requests waiting for the main loop to spawn.
    pending: Vec<FetchRequest>,
}

impl App {
    pub fn new(feed: Feed) -> Self {
        Self {
            feed,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            progress: 100,
            pending: Vec::new(),
        }
    }

    /// Load page 1 of the current category.
    pub fn start(&mut self) {
        let request = self.feed.begin_initial();
        self.restart(request);
    }

    pub fn refresh(&mut self) {
        self.start();
    }

    pub fn set_category(&mut self, category: Category) {
        if category == self.feed.category() && self.feed.generation() > 0 {
            return;
        }
        let request = self.feed.set_category(category);
        self.restart(request);
    }

    pub fn next_category(&mut self) {
        self.set_category(self.feed.category().next());
    }

    pub fn prev_category(&mut self) {
        self.set_category(self.feed.category().prev());
    }

    fn restart(&mut self, request: FetchRequest) {
        self.list_state.select(None);
        self.progress = 20;
        self.status = format!("Loading {} headlines…", self.feed.category().title());
        self.pending.push(request);
    }

    /// Hand queued requests to the caller, which spawns them.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Fold a fetch result into the feed and update the status line.
    pub fn handle_fetch(&mut self, msg: FetchMsg) {
        match self.feed.apply(msg) {
            Applied::Stale => {}
            Applied::Loaded { kind, added } => {
                self.progress = 100;
                if kind == FetchKind::Initial {
                    let first = (!self.feed.articles().is_empty()).then_some(0);
                    self.list_state.select(first);
                }
                self.status = if self.feed.phase() == Phase::Exhausted {
                    format!("Fetched {added} articles, end of results")
                } else {
                    format!("Fetched {added} articles")
                };
            }
            Applied::Failed { kind, error } => {
                self.progress = 100;
                if kind == FetchKind::Initial {
                    self.list_state.select(None);
                }
                self.status = format!("Error: {error}");
            }
        }
    }

    /// Terminal window title, e.g. `Business - News`.
    pub fn window_title(&self) -> String {
        format!("{} - News", self.feed.category().title())
    }

    /// Page heading, e.g. `News - Top Business Headlines`.
    pub fn heading(&self) -> String {
        format!("News - Top {} Headlines", self.feed.category().title())
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        self.move_by(1);
    }

    pub fn select_previous(&mut self) {
        self.move_back_by(1);
    }

    pub fn select_page_down(&mut self) {
        self.move_by(PAGE_STEP);
    }

    pub fn select_page_up(&mut self) {
        self.move_back_by(PAGE_STEP);
    }

    pub fn select_first(&mut self) {
        if !self.feed.articles().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.feed.articles().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
            self.check_scroll_boundary();
        }
    }

    fn move_by(&mut self, step: usize) {
        let len = self.feed.articles().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + step).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.check_scroll_boundary();
    }

    fn move_back_by(&mut self, step: usize) {
        if self.feed.articles().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(step),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Queue the next page once the selection is within
    /// [`SCROLL_THRESHOLD`] rows of the end.
    fn check_scroll_boundary(&mut self) {
        let len = self.feed.articles().len();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        if selected + SCROLL_THRESHOLD < len {
            return;
        }
        if let Some(request) = self.feed.begin_more() {
            self.progress = 30;
            self.status = format!("Loading page {}…", request.query.page);
            self.pending.push(request);
        }
    }
}
