mod card;
mod decks;
mod dialogs;
mod export_modal;
mod form;
mod language_selector;
pub mod layout;

pub use decks::format_deck_date;
pub use layout::{MainLayout, calculate_main_layout};

use crate::app::{App, Focus};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub(crate) fn field_block(title: &str, focused: bool) -> Block<'static> {
    let (border, title_style) = if focused {
        (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray),
        )
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title.to_string(), title_style))
}

pub(crate) fn key_hint(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(action),
    ]
}

pub fn draw(f: &mut Frame, app: &App) {
    let layout = calculate_main_layout(f.area());

    draw_header(f, app, &layout);
    form::draw_form(f, app, &layout);
    decks::draw_decks(
        f,
        app.decks(),
        app.deck_index(),
        app.focus() == Focus::Decks,
        app.is_loading_decks(),
        layout.decks_area,
    );
    card::draw_card(
        f,
        app.active_deck(),
        app.focus() == Focus::Card,
        layout.card_area,
    );
    draw_status(f, app, &layout);
    draw_help(f, app, &layout);

    let overlay_open =
        app.notice().is_some() || app.pending_delete().is_some() || app.export_modal().is_some();
    if !overlay_open && let Some(position) = form::cursor_position(app, &layout) {
        f.set_cursor_position(position);
    }

    if let Some(modal) = app.export_modal() {
        export_modal::draw_export_modal(f, modal);
    }
    if let Some(pending) = app.pending_delete() {
        dialogs::draw_delete_confirmation(f, pending);
    }
    if let Some(notice) = app.notice() {
        dialogs::draw_notice(f, notice);
    }
}

fn draw_header(f: &mut Frame, app: &App, layout: &MainLayout) {
    let banner = app
        .banner()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Connecting to {}...", app.config().backend_url));
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Sutra Flash Cards",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(banner, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);
}

fn draw_status(f: &mut Frame, app: &App, layout: &MainLayout) {
    let busy = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC);
    let line = if app.is_generating() {
        Span::styled(
            format!(
                "Generating {} cards about {}...",
                app.count(),
                app.topic().value().trim()
            ),
            busy,
        )
    } else if app.is_exporting() {
        Span::styled("Exporting...", busy)
    } else if let Some(status) = app.status_line() {
        Span::styled(status.to_string(), Style::default().fg(Color::Green))
    } else {
        Span::from("")
    };
    f.render_widget(Paragraph::new(Line::from(line)), layout.status_area);
}

fn draw_help(f: &mut Frame, app: &App, layout: &MainLayout) {
    let focus_spans = match app.focus() {
        Focus::Credential => [key_hint("Enter", " Test connection  ")].concat(),
        Focus::Topic => [key_hint("Enter", " Generate  ")].concat(),
        Focus::Language | Focus::Count => [key_hint("←/→", " Change  ")].concat(),
        Focus::Card => [
            key_hint("←/→", " Prev/Next  "),
            key_hint("Space", " Flip  "),
        ]
        .concat(),
        Focus::Decks => [
            key_hint("↑/↓", " Select  "),
            key_hint("Enter", " Study  "),
            key_hint("d", " Delete  "),
        ]
        .concat(),
    };

    let mut first = vec![];
    first.extend(focus_spans);
    first.extend(key_hint("Tab", " Next field  "));
    first.extend(key_hint("Esc", " Quit"));

    let second = [
        key_hint("Ctrl+G", " Generate  "),
        key_hint("Ctrl+T", " Test key  "),
        key_hint("Ctrl+E", " Export  "),
        key_hint("Ctrl+R", " Reload decks  "),
        key_hint("Ctrl+C", " Exit"),
    ]
    .concat();

    let help = Paragraph::new(vec![Line::from(first), Line::from(second)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, layout.help_area);
}
