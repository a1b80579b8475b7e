use crate::api::GenerateOutcome;
use crate::config::Config;
use crate::error::ApiError;
use crate::export::save_export;
use crate::export_modal::ExportModal;
use crate::logger;
use crate::models::{
    ActiveDeck, ApiRequest, ApiResponse, ApiStatus, CARD_COUNTS, DEFAULT_CARD_COUNT, Deck,
    ExportFormat, ExportSelection, GenerationRequest, Language, Step,
};
use crate::storage::LocalStore;
use crate::utils::TextInput;

pub const MSG_MISSING_CREDENTIAL: &str = "Please enter your Sutra API key";
pub const MSG_MISSING_TOPIC: &str = "Please enter a topic";

const GENERIC_CONNECTIVITY_ERROR: &str = "Connection test failed";
const GENERIC_GENERATE_ERROR: &str = "Failed to generate flash cards";
const GENERIC_FETCH_ERROR: &str = "Failed to load deck";
const GENERIC_DELETE_ERROR: &str = "Failed to delete deck";
const GENERIC_EXPORT_ERROR: &str = "Failed to export decks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Credential,
    Topic,
    Language,
    Count,
    Card,
    Decks,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Credential,
        Focus::Topic,
        Focus::Language,
        Focus::Count,
        Focus::Card,
        Focus::Decks,
    ];

    pub fn next(self) -> Focus {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text_input(self) -> bool {
        matches!(self, Focus::Credential | Focus::Topic)
    }
}

/// A message the user has to dismiss before doing anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

/// Editing operations on the focused text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// All UI state. Mutated only through the methods below; network work is
/// queued as `ApiRequest`s and its results come back through
/// `handle_response`.
///
/// Requests race each other, so every response that overwrites state carries
/// the number it was issued with. `active_ticket` is shared by generation and
/// deck fetches since both replace the studied deck.
#[derive(Debug)]
pub struct App {
    config: Config,
    store: LocalStore,
    credential: TextInput,
    topic: TextInput,
    language: Language,
    count: u32,
    focus: Focus,
    active: Option<ActiveDeck>,
    decks: Vec<Deck>,
    deck_index: usize,
    api_status: Option<ApiStatus>,
    banner: Option<String>,
    status_line: Option<String>,
    notice: Option<Notice>,
    pending_delete: Option<PendingDelete>,
    export_modal: Option<ExportModal>,
    testing: bool,
    generating: bool,
    exporting: bool,
    loading_decks: bool,
    active_ticket: u64,
    decks_seq: u64,
    connectivity_seq: u64,
    outbox: Vec<ApiRequest>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, store: LocalStore) -> Self {
        let credential = match store.credential() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                logger::log(&format!("Failed to read saved credential: {}", e));
                String::new()
            }
        };

        Self {
            config,
            store,
            credential: TextInput::new(credential),
            topic: TextInput::default(),
            language: Language::English,
            count: DEFAULT_CARD_COUNT,
            focus: Focus::Credential,
            active: None,
            decks: Vec::new(),
            deck_index: 0,
            api_status: None,
            banner: None,
            status_line: None,
            notice: None,
            pending_delete: None,
            export_modal: None,
            testing: false,
            generating: false,
            exporting: false,
            loading_decks: false,
            active_ticket: 0,
            decks_seq: 0,
            connectivity_seq: 0,
            outbox: Vec::new(),
            should_quit: false,
        }
    }

    /// Startup requests: backend banner and the saved deck list.
    pub fn start(&mut self) {
        self.outbox.push(ApiRequest::Banner);
        self.load_decks();
    }

    pub fn take_requests(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    // --- read-only views -------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credential(&self) -> &TextInput {
        &self.credential
    }

    pub fn topic(&self) -> &TextInput {
        &self.topic
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn active_deck(&self) -> Option<&ActiveDeck> {
        self.active.as_ref()
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck_index(&self) -> usize {
        self.deck_index
    }

    pub fn api_status(&self) -> Option<&ApiStatus> {
        self.api_status.as_ref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn export_modal(&self) -> Option<&ExportModal> {
        self.export_modal.as_ref()
    }

    pub fn export_modal_mut(&mut self) -> Option<&mut ExportModal> {
        self.export_modal.as_mut()
    }

    pub fn is_testing(&self) -> bool {
        self.testing
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn is_loading_decks(&self) -> bool {
        self.loading_decks
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // --- form ------------------------------------------------------------

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Replaces the credential and writes it through to local storage.
    pub fn set_credential(&mut self, credential: &str) {
        self.credential = TextInput::new(credential);
        self.persist_credential();
    }

    pub fn set_topic(&mut self, topic: &str) {
        self.topic = TextInput::new(topic);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_count(&mut self, count: u32) {
        if CARD_COUNTS.contains(&count) {
            self.count = count;
        }
    }

    pub fn cycle_count(&mut self, forward: bool) {
        let idx = CARD_COUNTS
            .iter()
            .position(|c| *c == self.count)
            .unwrap_or(0);
        let len = CARD_COUNTS.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.count = CARD_COUNTS[next];
    }

    /// Applies an edit to the focused text field.
    pub fn edit(&mut self, edit: Edit) {
        let field = match self.focus {
            Focus::Credential => &mut self.credential,
            Focus::Topic => &mut self.topic,
            _ => return,
        };
        let changed = match edit {
            Edit::Insert(c) => {
                field.insert(c);
                true
            }
            Edit::Backspace => field.backspace(),
            Edit::Delete => field.delete(),
            Edit::Left => {
                field.move_left();
                false
            }
            Edit::Right => {
                field.move_right();
                false
            }
            Edit::Home => {
                field.home();
                false
            }
            Edit::End => {
                field.end();
                false
            }
        };
        if changed && self.focus == Focus::Credential {
            self.persist_credential();
        }
    }

    fn persist_credential(&mut self) {
        if let Err(e) = self.store.set_credential(self.credential.value()) {
            logger::log(&format!("Failed to save credential: {}", e));
        }
    }

    fn block(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // --- backend actions -------------------------------------------------

    pub fn test_connectivity(&mut self) {
        if self.credential.is_blank() {
            self.block(MSG_MISSING_CREDENTIAL);
            return;
        }
        self.connectivity_seq += 1;
        self.testing = true;
        self.api_status = None;
        self.outbox.push(ApiRequest::TestConnectivity {
            seq: self.connectivity_seq,
            credential: self.credential.value().to_string(),
        });
    }

    pub fn generate_deck(&mut self) {
        if self.credential.is_blank() {
            self.block(MSG_MISSING_CREDENTIAL);
            return;
        }
        if self.topic.is_blank() {
            self.block(MSG_MISSING_TOPIC);
            return;
        }

        self.active_ticket += 1;
        self.generating = true;
        self.status_line = None;
        self.outbox.push(ApiRequest::Generate {
            ticket: self.active_ticket,
            request: GenerationRequest {
                topic: self.topic.value().trim().to_string(),
                language: self.language,
                count: self.count,
                credential: self.credential.value().to_string(),
            },
        });
    }

    pub fn load_decks(&mut self) {
        self.decks_seq += 1;
        self.loading_decks = true;
        self.outbox.push(ApiRequest::LoadDecks {
            seq: self.decks_seq,
        });
    }

    pub fn select_deck(&mut self, step: Step) {
        match step {
            Step::Previous => self.deck_index = self.deck_index.saturating_sub(1),
            Step::Next => {
                if self.deck_index + 1 < self.decks.len() {
                    self.deck_index += 1;
                }
            }
        }
    }

    /// Studies the highlighted deck, fetched fresh from the backend. A
    /// generation still in flight is superseded.
    pub fn open_selected_deck(&mut self) {
        let Some(id) = self.decks.get(self.deck_index).map(|d| d.id.clone()) else {
            return;
        };
        self.active_ticket += 1;
        if self.generating {
            logger::log("Deck fetch supersedes pending generation");
            self.generating = false;
        }
        self.outbox.push(ApiRequest::FetchDeck {
            ticket: self.active_ticket,
            id,
        });
    }

    /// Asks for confirmation before deleting the highlighted deck.
    pub fn request_delete_selected(&mut self) {
        if let Some(deck) = self.decks.get(self.deck_index) {
            self.pending_delete = Some(PendingDelete {
                id: deck.id.clone(),
                name: deck.name.clone(),
            });
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            self.outbox.push(ApiRequest::DeleteDeck { id: pending.id });
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn open_export(&mut self) {
        self.export_modal = Some(ExportModal::new(&self.decks, self.config.empty_selection));
    }

    pub fn cancel_export(&mut self) {
        self.export_modal = None;
    }

    /// Closes the modal and starts the export. A disallowed selection keeps
    /// the modal open.
    pub fn confirm_export(&mut self) {
        let selection = match self.export_modal.as_ref().and_then(ExportModal::confirm) {
            Some(selection) => selection,
            None => return,
        };
        self.export_modal = None;
        self.export_decks(selection);
    }

    pub fn export_decks(&mut self, selection: ExportSelection) {
        self.exporting = true;
        self.outbox.push(ApiRequest::Export { selection });
    }

    // --- study -----------------------------------------------------------

    pub fn navigate_card(&mut self, step: Step) {
        if let Some(active) = self.active.as_mut() {
            active.navigate(step);
        }
    }

    pub fn flip(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.flip();
        }
    }

    // --- responses -------------------------------------------------------

    pub fn handle_response(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::Banner(result) => self.on_banner(result),
            ApiResponse::Connectivity { seq, result } => self.on_connectivity(seq, result),
            ApiResponse::Generated { ticket, result } => self.on_generated(ticket, result),
            ApiResponse::Decks { seq, result } => self.on_decks(seq, result),
            ApiResponse::DeckFetched { ticket, result } => self.on_deck_fetched(ticket, result),
            ApiResponse::Deleted { id, result } => self.on_deleted(&id, result),
            ApiResponse::Exported { format, result } => self.on_exported(format, result),
        }
    }

    fn on_banner(&mut self, result: Result<String, ApiError>) {
        self.banner = Some(match result {
            Ok(message) => message,
            Err(e) => {
                logger::log(&format!("Banner request failed: {}", e));
                format!("Backend unreachable at {}", self.config.backend_url)
            }
        });
    }

    fn on_connectivity(&mut self, seq: u64, result: Result<ApiStatus, ApiError>) {
        if seq < self.connectivity_seq {
            logger::log(&format!("Ignoring stale connection test {}", seq));
            return;
        }
        self.testing = false;
        self.api_status = Some(match result {
            Ok(status) => status,
            Err(e) => ApiStatus {
                success: false,
                message: e.user_message(GENERIC_CONNECTIVITY_ERROR),
                test_response: None,
            },
        });
    }

    fn on_generated(&mut self, ticket: u64, result: Result<GenerateOutcome, ApiError>) {
        if ticket != self.active_ticket {
            logger::log(&format!(
                "Ignoring superseded generation {} (latest is {})",
                ticket, self.active_ticket
            ));
            return;
        }
        self.generating = false;

        match result {
            Ok(GenerateOutcome::Generated { deck, message }) => {
                let summary = message
                    .unwrap_or_else(|| format!("Generated {} flash cards", deck.cards.len()));
                self.active = Some(ActiveDeck::new(deck));
                self.status_line = Some(summary);
                self.focus = Focus::Card;
                self.load_decks();
            }
            Ok(GenerateOutcome::Rejected { message }) => self.block(message),
            Err(e) => {
                logger::log(&format!("Generation failed: {}", e));
                self.block(e.user_message(GENERIC_GENERATE_ERROR));
            }
        }
    }

    fn on_decks(&mut self, seq: u64, result: Result<Vec<Deck>, ApiError>) {
        if seq < self.decks_seq {
            logger::log(&format!(
                "Ignoring stale deck list {} (latest is {})",
                seq, self.decks_seq
            ));
            return;
        }
        self.loading_decks = false;
        match result {
            Ok(decks) => {
                self.decks = decks;
                self.deck_index = self.deck_index.min(self.decks.len().saturating_sub(1));
            }
            Err(e) => logger::log(&format!("Failed to load decks: {}", e)),
        }
    }

    fn on_deck_fetched(&mut self, ticket: u64, result: Result<Deck, ApiError>) {
        if ticket != self.active_ticket {
            logger::log(&format!("Ignoring superseded deck fetch {}", ticket));
            return;
        }
        match result {
            Ok(deck) => {
                self.status_line = Some(format!("Studying {}", deck.name));
                self.active = Some(ActiveDeck::new(deck));
                self.focus = Focus::Card;
            }
            Err(e) => self.block(e.user_message(GENERIC_FETCH_ERROR)),
        }
    }

    fn on_deleted(&mut self, id: &str, result: Result<(), ApiError>) {
        let gone = match &result {
            Ok(()) => true,
            Err(e) => e.status() == Some(404),
        };
        if gone {
            if self.active.as_ref().is_some_and(|a| a.deck.id == id) {
                self.active = None;
            }
            self.status_line = Some("Deck deleted".to_string());
        } else if let Err(e) = result {
            self.block(e.user_message(GENERIC_DELETE_ERROR));
        }
        self.load_decks();
    }

    fn on_exported(&mut self, format: ExportFormat, result: Result<Vec<u8>, ApiError>) {
        self.exporting = false;
        match result {
            Ok(payload) => {
                match save_export(&self.config.export_dir, format, &payload, chrono::Utc::now()) {
                    Ok(path) => {
                        self.status_line = Some(format!("Exported to {}", path.display()));
                    }
                    Err(e) => self.block(format!("Could not save export: {}", e)),
                }
            }
            Err(e) => {
                logger::log(&format!("Export failed: {}", e));
                self.block(e.user_message(GENERIC_EXPORT_ERROR));
            }
        }
    }
}
