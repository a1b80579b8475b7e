use crate::models::{Deck, Language};
use crate::ui::field_block;
use crate::utils::truncate_string;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{List, ListItem, ListState},
};

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn format_deck_date(created_at: DateTime<Utc>, now: DateTime<Local>) -> String {
    let datetime = created_at.with_timezone(&Local);
    let deck_date = datetime.date_naive();

    if deck_date == now.date_naive() {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if deck_date == now.date_naive() - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

fn format_deck_item(deck: &Deck, now: DateTime<Local>) -> String {
    let language = Language::from_code(&deck.language)
        .map(|l| l.icon().to_string())
        .unwrap_or_else(|| deck.language.clone());
    let date = deck
        .created_at
        .map(|at| format!(" - {}", format_deck_date(at, now)))
        .unwrap_or_default();
    format!(
        "{} {} ({} cards){}",
        language,
        deck.name,
        deck.cards.len(),
        date
    )
}

pub fn draw_decks(
    f: &mut Frame,
    decks: &[Deck],
    selected: usize,
    focused: bool,
    loading: bool,
    area: Rect,
) {
    let title = if loading { "Saved Decks (loading...)" } else { "Saved Decks" };
    let width = area.width.saturating_sub(2) as usize;
    let now = Local::now();

    let items: Vec<ListItem> = if decks.is_empty() {
        vec![ListItem::new("No saved decks yet").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        decks
            .iter()
            .enumerate()
            .map(|(i, deck)| {
                let style = if i == selected && focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(truncate_string(&format_deck_item(deck, now), width)).style(style)
            })
            .collect()
    };

    let mut state = ListState::default();
    if !decks.is_empty() {
        state.select(Some(selected.min(decks.len() - 1)));
    }
    f.render_stateful_widget(
        List::new(items).block(field_block(title, focused)),
        area,
        &mut state,
    );
}
