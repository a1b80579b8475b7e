use crate::models::Language;
use crate::ui::field_block;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Shows the chosen language between arrows, with its neighbours dimmed
/// when there is room for them.
pub fn draw_language_selector(f: &mut Frame, language: Language, focused: bool, area: Rect) {
    let arrow_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("◀ ", arrow_style),
        Span::styled(
            format!("{} {}", language.icon(), language.display_name()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", arrow_style),
    ];
    if area.width > 36 {
        spans.push(Span::styled(
            format!("  next: {}", language.next().display_name()),
            dim,
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(field_block("Language", focused)),
        area,
    );
}
