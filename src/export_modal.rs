use crate::config::EmptySelectionPolicy;
use crate::models::{Deck, ExportFormat, ExportSelection};
use std::collections::HashSet;

/// Rows of the modal's checklist: the "select all" toggle, then one per deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalRow {
    SelectAll,
    Deck(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub id: String,
    pub label: String,
}

/// Local state of the export dialog. Nothing here reaches the shell until
/// `confirm` is called.
#[derive(Debug, Clone)]
pub struct ExportModal {
    decks: Vec<DeckEntry>,
    selected: HashSet<String>,
    format: ExportFormat,
    highlighted: usize,
    policy: EmptySelectionPolicy,
}

impl ExportModal {
    pub fn new(decks: &[Deck], policy: EmptySelectionPolicy) -> Self {
        Self {
            decks: decks
                .iter()
                .map(|d| DeckEntry {
                    id: d.id.clone(),
                    label: format!("{} ({} cards)", d.name, d.cards.len()),
                })
                .collect(),
            selected: HashSet::new(),
            format: ExportFormat::Json,
            highlighted: 0,
            policy,
        }
    }

    pub fn decks(&self) -> &[DeckEntry] {
        &self.decks
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    pub fn next_format(&mut self) {
        self.format = self.format.next();
    }

    pub fn prev_format(&mut self) {
        self.format = self.format.prev();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The "select all" toggle is on exactly when every listed deck is selected.
    pub fn all_selected(&self) -> bool {
        !self.decks.is_empty() && self.decks.iter().all(|d| self.selected.contains(&d.id))
    }

    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.decks.iter().map(|d| d.id.clone()).collect();
        }
    }

    pub fn toggle_deck(&mut self, id: &str) {
        if !self.selected.remove(id) && self.decks.iter().any(|d| d.id == id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn highlighted_row(&self) -> ModalRow {
        match self.highlighted {
            0 => ModalRow::SelectAll,
            n => ModalRow::Deck(n - 1),
        }
    }

    pub fn move_highlight_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_highlight_down(&mut self) {
        if self.highlighted < self.decks.len() {
            self.highlighted += 1;
        }
    }

    pub fn toggle_highlighted(&mut self) {
        match self.highlighted_row() {
            ModalRow::SelectAll => self.toggle_select_all(),
            ModalRow::Deck(idx) => {
                if let Some(id) = self.decks.get(idx).map(|d| d.id.clone()) {
                    self.toggle_deck(&id);
                }
            }
        }
    }

    /// An explicit selection always exports; an empty one only when the
    /// policy lets it mean "every deck" for the chosen format.
    pub fn can_confirm(&self) -> bool {
        !self.selected.is_empty() || self.policy.allows(self.format)
    }

    /// Ids come back in deck-list order. `None` when export is not permitted.
    pub fn confirm(&self) -> Option<ExportSelection> {
        if !self.can_confirm() {
            return None;
        }
        Some(ExportSelection {
            deck_ids: self
                .decks
                .iter()
                .filter(|d| self.selected.contains(&d.id))
                .map(|d| d.id.clone())
                .collect(),
            format: self.format,
        })
    }
}
