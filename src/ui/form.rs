use crate::app::{App, Focus};
use crate::ui::layout::MainLayout;
use crate::ui::{field_block, language_selector};
use crate::utils::mask_secret;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn draw_form(f: &mut Frame, app: &App, layout: &MainLayout) {
    draw_credential(f, app, layout.credential_area);
    draw_topic(f, app, layout.topic_area);
    language_selector::draw_language_selector(
        f,
        app.language(),
        app.focus() == Focus::Language,
        layout.language_area,
    );
    draw_count(f, app, layout.count_area);
}

fn api_status_line(app: &App) -> Option<Line<'static>> {
    if app.is_testing() {
        return Some(Line::from(Span::styled(
            " Testing... ",
            Style::default().fg(Color::Yellow),
        )));
    }
    app.api_status().map(|status| {
        let (mark, color) = if status.success {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        Line::from(Span::styled(
            format!(" {} {} ", mark, status.message),
            Style::default().fg(color),
        ))
    })
}

fn draw_credential(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Credential;
    let mut block = field_block("Sutra API Key", focused);
    if let Some(status) = api_status_line(app) {
        block = block.title_bottom(status);
    }

    let value = app.credential().value();
    let text = if value.is_empty() {
        placeholder("Paste your key, Enter to test")
    } else {
        Line::from(mask_secret(value))
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_topic(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Topic;
    let mut block = field_block("Topic", focused);
    if app.is_generating() {
        block = block.title_bottom(Line::from(Span::styled(
            " Generating... ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let value = app.topic().value();
    let text = if value.is_empty() {
        placeholder("e.g. Ancient Rome, Enter to generate")
    } else {
        Line::from(value.to_string())
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_count(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Count;
    let arrow_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let line = Line::from(vec![
        Span::styled("◀ ", arrow_style),
        Span::styled(
            format!("{} cards", app.count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", arrow_style),
    ]);
    f.render_widget(
        Paragraph::new(line).block(field_block("Number of Cards", focused)),
        area,
    );
}

fn placeholder(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

/// Terminal cursor position for the focused text field, if any.
pub fn cursor_position(app: &App, layout: &MainLayout) -> Option<(u16, u16)> {
    let (column, area) = match app.focus() {
        // Masking keeps one column per character.
        Focus::Credential => (app.credential().cursor(), layout.credential_area),
        Focus::Topic => (app.topic().cursor_column(), layout.topic_area),
        _ => return None,
    };
    let right_edge = (area.x + area.width).saturating_sub(2);
    let x = (area.x + 1).saturating_add(column as u16).min(right_edge);
    Some((x, area.y + 1))
}
