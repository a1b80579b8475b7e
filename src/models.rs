use crate::api::GenerateOutcome;
use crate::error::ApiError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Card counts offered by the generation form.
pub const CARD_COUNTS: [u32; 4] = [3, 5, 8, 10];
pub const DEFAULT_CARD_COUNT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub language: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Accepts RFC 3339 as well as the naive ISO-8601 form the backend emits
/// for UTC timestamps (`2024-01-01T12:00:00.123456`).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
    Spanish,
    French,
    German,
    Chinese,
    Japanese,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Chinese,
        Language::Japanese,
        Language::Arabic,
    ];

    /// Code sent to the backend, which keys its prompt instructions on it.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Chinese => "chinese",
            Language::Japanese => "japanese",
            Language::Arabic => "arabic",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Spanish => "Español",
            Language::French => "Français",
            Language::German => "Deutsch",
            Language::Chinese => "中文",
            Language::Japanese => "日本語",
            Language::Arabic => "العربية",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Language::English => "🇺🇸",
            Language::Hindi => "🇮🇳",
            Language::Spanish => "🇪🇸",
            Language::French => "🇫🇷",
            Language::German => "🇩🇪",
            Language::Chinese => "🇨🇳",
            Language::Japanese => "🇯🇵",
            Language::Arabic => "🇸🇦",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    pub fn next(self) -> Language {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Language {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub language: Language,
    pub count: u32,
    pub credential: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Back,
}

impl CardFace {
    pub fn flipped(self) -> CardFace {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

/// Position inside a non-empty deck. Moves past either end are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckCursor {
    index: usize,
    len: usize,
}

impl DeckCursor {
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    /// Returns `false` when the move would leave the deck.
    pub fn step(&mut self, step: Step) -> bool {
        match step {
            Step::Previous if !self.is_first() => {
                self.index -= 1;
                true
            }
            Step::Next if !self.is_last() => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }
}

/// The deck being studied together with its position and visible face.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDeck {
    pub deck: Deck,
    cursor: Option<DeckCursor>,
    face: CardFace,
}

impl ActiveDeck {
    pub fn new(deck: Deck) -> Self {
        let cursor = DeckCursor::new(deck.cards.len());
        Self {
            deck,
            cursor,
            face: CardFace::Front,
        }
    }

    pub fn cursor(&self) -> Option<DeckCursor> {
        self.cursor
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cursor.and_then(|c| self.deck.cards.get(c.index()))
    }

    /// Moves one card and always lands on the front face.
    pub fn navigate(&mut self, step: Step) -> bool {
        self.face = CardFace::Front;
        match self.cursor.as_mut() {
            Some(cursor) => cursor.step(step),
            None => false,
        }
    }

    pub fn flip(&mut self) {
        if self.cursor.is_some() {
            self.face = self.face.flipped();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Pdf];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
        }
    }

    pub fn next(self) -> ExportFormat {
        match self {
            ExportFormat::Json => ExportFormat::Csv,
            ExportFormat::Csv => ExportFormat::Pdf,
            ExportFormat::Pdf => ExportFormat::Json,
        }
    }

    pub fn prev(self) -> ExportFormat {
        match self {
            ExportFormat::Json => ExportFormat::Pdf,
            ExportFormat::Csv => ExportFormat::Json,
            ExportFormat::Pdf => ExportFormat::Csv,
        }
    }
}

/// Decks to export. An empty `deck_ids` asks the backend for every deck.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSelection {
    pub deck_ids: Vec<String>,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiStatus {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub test_response: Option<String>,
}

/// Work the shell hands to the worker.
///
/// `seq` and `ticket` values are echoed back in the matching response so the
/// shell can drop answers that a newer request has superseded.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Banner,
    TestConnectivity {
        seq: u64,
        credential: String,
    },
    Generate {
        ticket: u64,
        request: GenerationRequest,
    },
    LoadDecks {
        seq: u64,
    },
    FetchDeck {
        ticket: u64,
        id: String,
    },
    DeleteDeck {
        id: String,
    },
    Export {
        selection: ExportSelection,
    },
}

impl ApiRequest {
    /// Generation and deck fetches both replace the deck being studied.
    pub fn replaces_active_deck(&self) -> bool {
        matches!(self, ApiRequest::Generate { .. } | ApiRequest::FetchDeck { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Banner(Result<String, ApiError>),
    Connectivity {
        seq: u64,
        result: Result<ApiStatus, ApiError>,
    },
    Generated {
        ticket: u64,
        result: Result<GenerateOutcome, ApiError>,
    },
    Decks {
        seq: u64,
        result: Result<Vec<Deck>, ApiError>,
    },
    DeckFetched {
        ticket: u64,
        result: Result<Deck, ApiError>,
    },
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
    Exported {
        format: ExportFormat,
        result: Result<Vec<u8>, ApiError>,
    },
}

#[cfg(test)]
pub(crate) fn sample_deck(id: &str, cards: usize) -> Deck {
    Deck {
        id: id.to_string(),
        name: format!("Deck {}", id),
        topic: Some("Rome".to_string()),
        language: "english".to_string(),
        created_at: None,
        cards: (0..cards)
            .map(|i| Card {
                id: None,
                front: format!("front {}", i),
                back: format!("back {}", i),
                topic: None,
                language: None,
                created_at: None,
            })
            .collect(),
    }
}
