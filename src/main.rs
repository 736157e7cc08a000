//! livescroll-news — top news headlines in the terminal, with infinite scroll.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tasks)  │  (channel) │ feed.rs  │          │ card.rs  │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲  FetchRequest         ▲
//!      └───────────────────────┤ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`** — the `HeadlineSource` trait, the `Article` model and the
//!   NewsAPI implementation.
//! * **`feed`** — the pagination controller (page, articles, totals).
//! * **`fetch`** — runs each page request as a one-shot tokio task.
//! * **`app`** — owns UI state and turns scrolling into page requests.
//! * **`ui`** / **`card`** / **`spinner`** — pure rendering.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: config, logging, terminal
//!   setup and the event loop.

use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use simplelog::{ConfigBuilder, WriteLogger};
use tokio::sync::mpsc;

use livescroll_news::app::App;
use livescroll_news::config::{Args, Config};
use livescroll_news::feed::Feed;
use livescroll_news::source::{HeadlineSource, NewsApiSource};
use livescroll_news::{fetch, input, ui};

// ---------------------------------------------------------------------------
// Terminal setup and teardown
// ---------------------------------------------------------------------------

/// Owns the ratatui terminal for the lifetime of the reader.
///
/// Holding one means the screen is in raw mode on the alternate buffer;
/// dropping it puts the user's shell back, whether `main` returns or
/// unwinds.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    /// Show `<Category> - News` in the window title.
    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.terminal.backend_mut(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

/// Leave raw mode and the alternate buffer.  Best effort: called while
/// tearing down, where there is nobody left to report an error to.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Panics print to the normal screen, not into the TUI's raw buffer.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

/// File logger; stdout is owned by the TUI.
fn init_logging(config: &Config) -> Result<()> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, log_config, log_file)
        .context("installing logger")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // -- configuration -------------------------------------------------------
    dotenv::dotenv().ok();
    let config = Config::from_args(Args::parse())?;
    init_logging(&config)?;

    let source: Arc<dyn HeadlineSource> = Arc::new(NewsApiSource::from_config(&config)?);
    info!(
        "starting: country={} category={} page_size={} via {}",
        config.country,
        config.category,
        config.page_size,
        source.name()
    );

    install_panic_hook();

    // -- terminal setup ------------------------------------------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(Feed::new(
        config.country.clone(),
        config.category,
        config.page_size,
    ));
    app.start();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut title = String::new();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Spawn any page requests the app queued.
    //   2. Drain finished fetches.
    //   3. Render the UI.
    //   4. Poll for keyboard input (up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Start fetches
        for request in app.take_requests() {
            fetch::spawn(Arc::clone(&source), request, tx.clone());
        }

        // 2. Process fetch results
        while let Ok(msg) = rx.try_recv() {
            app.handle_fetch(msg);
        }

        // 3. Render
        let window_title = app.window_title();
        if window_title != title {
            guard.set_title(&window_title)?;
            title = window_title;
        }
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 4. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("shutting down");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
