use crate::models::{ActiveDeck, CardFace, Language};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_card(f: &mut Frame, active: Option<&ActiveDeck>, focused: bool, area: Rect) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let Some(active) = active else {
        let empty = Paragraph::new("Generate a deck or open a saved one to start studying.")
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title("Flash Card"),
            );
        f.render_widget(empty, area);
        return;
    };

    let language = Language::from_code(&active.deck.language)
        .map(|l| format!("{} {}", l.icon(), l.display_name()))
        .unwrap_or_else(|| active.deck.language.clone());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", active.deck.name))
        .title_bottom(Line::from(format!(" {} ", language)).right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (Some(cursor), Some(card)) = (active.cursor(), active.current_card()) else {
        let empty = Paragraph::new("This deck has no cards.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let (label, content, color) = match active.face() {
        CardFace::Front => ("FRONT", card.front.as_str(), Color::Cyan),
        CardFace::Back => ("BACK", card.back.as_str(), Color::Green),
    };
    let face_label = Paragraph::new(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(face_label, chunks[0]);

    // Vertically center the face text in the remaining space
    let mut text = Text::default();
    let text_width = chunks[1].width.max(1) as usize;
    let wrapped_lines = content
        .lines()
        .map(|l| unicode_width::UnicodeWidthStr::width(l).div_ceil(text_width).max(1))
        .sum::<usize>();
    let padding = (chunks[1].height as usize).saturating_sub(wrapped_lines) / 2;
    for _ in 0..padding {
        text.push_line(Line::from(""));
    }
    text.extend(Text::from(content.to_string()));
    let face = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(face, chunks[1]);

    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let nav = Line::from(vec![
        Span::styled(
            "◀ Prev",
            if cursor.is_first() { disabled } else { enabled },
        ),
        Span::from(format!("   Card {} of {}   ", cursor.index() + 1, cursor.len())),
        Span::styled(
            "Next ▶",
            if cursor.is_last() { disabled } else { enabled },
        ),
    ]);
    f.render_widget(
        Paragraph::new(nav).alignment(Alignment::Center),
        chunks[2],
    );
}
