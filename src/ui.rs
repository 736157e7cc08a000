//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * Layout, top to bottom: heading, progress gauge, category tabs, the
//!   card list, a footer (next-page spinner or end message) and the status
//!   bar.
//! * Cards are built fresh from the articles on every frame via
//!   [`NewsCard::from_article`]; nothing rendered is cached.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::card::NewsCard;
use crate::config::Category;
use crate::feed::Phase;
use crate::spinner;

const END_MESSAGE: &str = "Yay! You have seen it all";
const EMPTY_MESSAGE: &str = "No articles found.";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [heading_area, gauge_area, tabs_area, main_area, footer_area, status_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    draw_heading(app, frame, heading_area);
    draw_progress(app, frame, gauge_area);
    draw_tabs(app, frame, tabs_area);
    draw_articles(app, frame, main_area);
    draw_footer(app, frame, footer_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_heading(app: &App, frame: &mut Frame, area: Rect) {
    let heading = Paragraph::new(Line::from(Span::styled(
        app.heading(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .centered();
    frame.render_widget(heading, area);
}

/// Thin top-of-page bar; hidden once a request completes.
fn draw_progress(app: &App, frame: &mut Frame, area: Rect) {
    if app.progress >= 100 {
        return;
    }
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Red).bg(Color::Black))
        .percent(app.progress)
        .label("");
    frame.render_widget(gauge, area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let current = app.feed.category();
    let titles = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {}", i + 1, c.title()));
    let selected = Category::ALL.iter().position(|c| *c == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

/// Render the card list, the initial-load spinner, or the empty message.
fn draw_articles(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.feed.category().title()))
        .borders(Borders::ALL);

    if app.feed.is_loading() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        spinner::render(frame, inner);
        return;
    }

    if app.feed.articles().is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            EMPTY_MESSAGE,
            Style::default().fg(Color::DarkGray),
        )))
        .centered()
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list_items: Vec<ListItem> = app
        .feed
        .articles()
        .iter()
        .map(|article| card_item(&NewsCard::from_article(article)))
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// One card: badge and headline, description, byline, link, image.
fn card_item(card: &NewsCard) -> ListItem<'static> {
    let mut headline = Vec::new();
    if let Some(source) = &card.source {
        headline.push(Span::styled(
            format!(" {source} "),
            Style::default().fg(Color::White).bg(Color::Red),
        ));
        headline.push(Span::raw(" "));
    }
    headline.push(Span::styled(
        card.title.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    let link = match &card.link {
        Some(url) => Span::styled(
            format!("Read more: {url}"),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
        None => Span::styled("no link", Style::default().fg(Color::DarkGray)),
    };

    let image_label = if card.image.is_fallback() { "img (default)" } else { "img" };

    let lines = vec![
        Line::from(headline),
        Line::from(Span::styled(
            card.description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(card.byline(), Style::default().fg(Color::Red))),
        Line::from(link),
        Line::from(Span::styled(
            format!("{image_label}: {}", card.image.url()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    ListItem::new(Text::from(lines))
}

fn draw_footer(app: &App, frame: &mut Frame, area: Rect) {
    match app.feed.phase() {
        Phase::LoadingMore => spinner::render(frame, area),
        Phase::Exhausted if !app.feed.articles().is_empty() => {
            let end = Paragraph::new(Line::from(Span::styled(
                END_MESSAGE,
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .centered();
            frame.render_widget(end, area);
        }
        _ => {}
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} of {} articles",
                app.feed.articles().len(),
                app.feed.total_results()
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Tab/1-7: category  r: refresh"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
