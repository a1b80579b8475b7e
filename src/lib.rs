pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod export_modal;
pub mod input;
pub mod logger;
pub mod models;
pub mod storage;
pub mod ui;
pub mod utils;
pub mod worker;


// Re-exports for convenience
pub use api::{FlashcardApi, GenerateOutcome, HttpBackend};
pub use app::{App, Focus};
pub use config::{Config, EmptySelectionPolicy};
pub use error::ApiError;
pub use input::{handle_key, handle_mouse};
pub use models::{ApiRequest, ApiResponse, Card, Deck, ExportFormat, Language};
pub use storage::LocalStore;
pub use ui::{calculate_main_layout, draw};
pub use worker::Worker;
