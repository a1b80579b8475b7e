use crate::app::{Notice, PendingDelete};
use crate::ui::key_hint;
use crate::ui::layout::centered_rect;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Modal message. Blocks all other input until acknowledged.
pub fn draw_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Notice ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(notice.message.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    let help = Paragraph::new(Line::from(key_hint("Enter", " OK"))).alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

pub fn draw_delete_confirmation(f: &mut Frame, pending: &PendingDelete) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Delete Deck ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(format!(
        "Delete \"{}\"? This cannot be undone.",
        pending.name
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    let help = Paragraph::new(Line::from(
        [key_hint("y", " Delete  "), key_hint("n", " Cancel")].concat(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}
