use crate::export_modal::{ExportModal, ModalRow};
use crate::models::ExportFormat;
use crate::ui::key_hint;
use crate::ui::layout::centered_rect;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub fn draw_export_modal(f: &mut Frame, modal: &ExportModal) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Export Decks ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let highlighted = modal.highlighted_row();
    let highlight = Style::default().add_modifier(Modifier::REVERSED);

    let mut items = vec![
        ListItem::new(format!(
            "{} Select all ({} selected)",
            checkbox(modal.all_selected()),
            modal.selected_count()
        ))
        .style(if highlighted == ModalRow::SelectAll {
            highlight.add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }),
    ];
    if modal.decks().is_empty() {
        items.push(ListItem::new("  No decks available").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    items.extend(modal.decks().iter().enumerate().map(|(i, deck)| {
        let style = if highlighted == ModalRow::Deck(i) {
            highlight
        } else {
            Style::default()
        };
        ListItem::new(format!(
            "  {} {}",
            checkbox(modal.is_selected(&deck.id)),
            deck.label
        ))
        .style(style)
    }));
    // Keeps the highlighted row on screen when the list overflows.
    let row = match highlighted {
        ModalRow::SelectAll => 0,
        ModalRow::Deck(i) => i + 1,
    };
    let mut state = ListState::default().with_selected(Some(row));
    f.render_stateful_widget(List::new(items), chunks[0], &mut state);

    let mut format_spans = vec![Span::from("Format: ")];
    for format in ExportFormat::ALL {
        let style = if format == modal.format() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        format_spans.push(Span::styled(format.label(), style));
        format_spans.push(Span::from("  "));
    }
    f.render_widget(Paragraph::new(Line::from(format_spans)), chunks[1]);

    if !modal.can_confirm() {
        let warning = Paragraph::new(Span::styled(
            "Select at least one deck to export",
            Style::default().fg(Color::Red),
        ));
        f.render_widget(warning, chunks[2]);
    }

    let help = Line::from(
        [
            key_hint("Space", " Toggle  "),
            key_hint("←/→", " Format  "),
            key_hint("Enter", " Export  "),
            key_hint("Esc", " Cancel"),
        ]
        .concat(),
    );
    f.render_widget(Paragraph::new(help), chunks[3]);
}
