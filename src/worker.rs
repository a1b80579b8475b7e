use crate::api::FlashcardApi;
use crate::logger;
use crate::models::{ApiRequest, ApiResponse};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Runs backend calls as tokio tasks and reports results on `tx`.
///
/// Generation and deck fetches both replace the studied deck, so dispatching
/// either aborts the pending task of the other if it has not finished yet.
/// Everything else runs to completion.
pub struct Worker {
    api: Arc<dyn FlashcardApi>,
    tx: UnboundedSender<ApiResponse>,
    active_deck: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(api: Arc<dyn FlashcardApi>, tx: UnboundedSender<ApiResponse>) -> Self {
        Self {
            api,
            tx,
            active_deck: None,
        }
    }

    pub fn dispatch(&mut self, request: ApiRequest) {
        let replaces = request.replaces_active_deck();
        if replaces && let Some(previous) = self.active_deck.take() {
            if !previous.is_finished() {
                logger::log("Aborting superseded deck request");
            }
            previous.abort();
        }

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let response = run(api.as_ref(), request).await;
            if tx.send(response).is_err() {
                logger::log("Response channel closed, dropping result");
            }
        });

        if replaces {
            self.active_deck = Some(handle);
        }
    }
}

async fn run(api: &dyn FlashcardApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Banner => ApiResponse::Banner(api.banner().await),
        ApiRequest::TestConnectivity { seq, credential } => {
            logger::log(&format!("Connection test {}", seq));
            ApiResponse::Connectivity {
                seq,
                result: api.test_connectivity(&credential).await,
            }
        }
        ApiRequest::Generate { ticket, request } => {
            logger::log(&format!(
                "Generation {}: {} cards about {:?} in {}",
                ticket,
                request.count,
                request.topic,
                request.language.code()
            ));
            ApiResponse::Generated {
                ticket,
                result: api.generate_cards(&request).await,
            }
        }
        ApiRequest::LoadDecks { seq } => ApiResponse::Decks {
            seq,
            result: api.list_decks().await,
        },
        ApiRequest::FetchDeck { ticket, id } => {
            logger::log(&format!("Fetching deck {} ({})", id, ticket));
            ApiResponse::DeckFetched {
                ticket,
                result: api.fetch_deck(&id).await,
            }
        }
        ApiRequest::DeleteDeck { id } => {
            logger::log(&format!("Deleting deck {}", id));
            let result = api.delete_deck(&id).await;
            ApiResponse::Deleted { id, result }
        }
        ApiRequest::Export { selection } => {
            logger::log(&format!(
                "Exporting {} deck(s) as {}",
                selection.deck_ids.len(),
                selection.format.as_str()
            ));
            ApiResponse::Exported {
                format: selection.format,
                result: api.export_decks(&selection).await,
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockApi;
    use super::*;
    use crate::api::GenerateOutcome;
    use crate::models::{ExportFormat, ExportSelection, GenerationRequest, Language, sample_deck};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn generation(ticket: u64, topic: &str) -> ApiRequest {
        ApiRequest::Generate {
            ticket,
            request: GenerationRequest {
                topic: topic.to_string(),
                language: Language::Spanish,
                count: 3,
                credential: "good".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_load_decks_round_trip() {
        let api = Arc::new(MockApi::new(vec![sample_deck("a", 2)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api.clone(), tx);

        worker.dispatch(ApiRequest::LoadDecks { seq: 3 });
        match rx.recv().await {
            Some(ApiResponse::Decks {
                seq,
                result: Ok(decks),
            }) => {
                assert_eq!(seq, 3);
                assert_eq!(decks.len(), 1);
            }
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(*api.calls.lock().unwrap(), vec!["list".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_reports_id() {
        let api = Arc::new(MockApi::new(vec![sample_deck("a", 2)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api.clone(), tx);

        worker.dispatch(ApiRequest::DeleteDeck {
            id: "a".to_string(),
        });
        match rx.recv().await {
            Some(ApiResponse::Deleted { id, result }) => {
                assert_eq!(id, "a");
                assert!(result.is_ok());
            }
            other => panic!("unexpected response: {:?}", other),
        }
        assert!(api.decks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_carries_format() {
        let api = Arc::new(MockApi::new(vec![]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api, tx);

        worker.dispatch(ApiRequest::Export {
            selection: ExportSelection {
                deck_ids: vec!["a".to_string(), "b".to_string()],
                format: ExportFormat::Csv,
            },
        });
        match rx.recv().await {
            Some(ApiResponse::Exported { format, result }) => {
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(result.unwrap(), b"2 decks".to_vec());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_new_generation_aborts_pending_one() {
        let api = Arc::new(
            MockApi::new(vec![]).with_slow_topic("Rome", Duration::from_millis(200)),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api.clone(), tx);

        worker.dispatch(generation(1, "Rome"));
        tokio::task::yield_now().await;
        worker.dispatch(generation(2, "Greece"));

        match rx.recv().await {
            Some(ApiResponse::Generated { ticket, result }) => {
                assert_eq!(ticket, 2);
                match result {
                    Ok(GenerateOutcome::Generated { deck, .. }) => {
                        assert_eq!(deck.id, "Greece");
                        assert_eq!(deck.language, "spanish");
                    }
                    other => panic!("unexpected outcome: {:?}", other),
                }
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let late = timeout(Duration::from_millis(400), rx.recv()).await;
        assert!(late.is_err(), "aborted generation must not report back");
    }

    #[tokio::test]
    async fn test_other_requests_do_not_cancel_generation() {
        let api = Arc::new(
            MockApi::new(vec![]).with_slow_topic("Rome", Duration::from_millis(50)),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api, tx);

        worker.dispatch(generation(1, "Rome"));
        worker.dispatch(ApiRequest::LoadDecks { seq: 1 });
        worker.dispatch(ApiRequest::TestConnectivity {
            seq: 1,
            credential: "good".to_string(),
        });

        let mut saw_generation = false;
        for _ in 0..3 {
            if let Some(ApiResponse::Generated { ticket, .. }) =
                timeout(Duration::from_secs(2), rx.recv()).await.unwrap()
            {
                assert_eq!(ticket, 1);
                saw_generation = true;
            }
        }
        assert!(saw_generation);
    }

    #[tokio::test]
    async fn test_deck_fetch_aborts_pending_generation() {
        let api = Arc::new(
            MockApi::new(vec![sample_deck("saved", 2)])
                .with_slow_topic("Rome", Duration::from_millis(200)),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api.clone(), tx);

        worker.dispatch(generation(1, "Rome"));
        tokio::task::yield_now().await;
        worker.dispatch(ApiRequest::FetchDeck {
            ticket: 2,
            id: "saved".to_string(),
        });

        match rx.recv().await {
            Some(ApiResponse::DeckFetched { ticket, result }) => {
                assert_eq!(ticket, 2);
                assert_eq!(result.unwrap().id, "saved");
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let late = timeout(Duration::from_millis(400), rx.recv()).await;
        assert!(late.is_err(), "aborted generation must not report back");
        assert_eq!(api.decks.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_connectivity_echoes_seq() {
        let api = Arc::new(MockApi::new(vec![]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api, tx);

        worker.dispatch(ApiRequest::TestConnectivity {
            seq: 7,
            credential: "bad".to_string(),
        });
        match rx.recv().await {
            Some(ApiResponse::Connectivity { seq, result }) => {
                assert_eq!(seq, 7);
                assert!(!result.unwrap().success);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
