use crate::app::{App, Edit, Focus};
use crate::models::Step;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
        return;
    }

    if app.pending_delete().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return;
    }

    if app.export_modal().is_some() {
        handle_export_modal_key(app, key);
        return;
    }

    if ctrl {
        match key.code {
            KeyCode::Char('g') => app.generate_deck(),
            KeyCode::Char('t') => app.test_connectivity(),
            KeyCode::Char('e') => app.open_export(),
            KeyCode::Char('r') => app.load_decks(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return;
        }
        KeyCode::Esc => {
            app.quit();
            return;
        }
        _ => {}
    }

    match app.focus() {
        focus if focus.is_text_input() => handle_text_key(app, key),
        Focus::Language => match key.code {
            KeyCode::Left | KeyCode::Up => app.set_language(app.language().prev()),
            KeyCode::Right | KeyCode::Down => app.set_language(app.language().next()),
            KeyCode::Enter => app.focus_next(),
            _ => {}
        },
        Focus::Count => match key.code {
            KeyCode::Left | KeyCode::Up => app.cycle_count(false),
            KeyCode::Right | KeyCode::Down => app.cycle_count(true),
            KeyCode::Enter => app.generate_deck(),
            _ => {}
        },
        Focus::Card => match key.code {
            KeyCode::Left | KeyCode::Up => app.navigate_card(Step::Previous),
            KeyCode::Right | KeyCode::Down => app.navigate_card(Step::Next),
            KeyCode::Char(' ') | KeyCode::Enter => app.flip(),
            _ => {}
        },
        Focus::Decks => match key.code {
            KeyCode::Up => app.select_deck(Step::Previous),
            KeyCode::Down => app.select_deck(Step::Next),
            KeyCode::Enter => app.open_selected_deck(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete_selected(),
            KeyCode::Char('r') => app.load_decks(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_text_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => match app.focus() {
            Focus::Credential => app.test_connectivity(),
            _ => app.generate_deck(),
        },
        KeyCode::Char(c) => app.edit(Edit::Insert(c)),
        KeyCode::Backspace => app.edit(Edit::Backspace),
        KeyCode::Delete => app.edit(Edit::Delete),
        KeyCode::Left => app.edit(Edit::Left),
        KeyCode::Right => app.edit(Edit::Right),
        KeyCode::Home => app.edit(Edit::Home),
        KeyCode::End => app.edit(Edit::End),
        _ => {}
    }
}

fn handle_export_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_export(),
        KeyCode::Enter => app.confirm_export(),
        _ => {
            let Some(modal) = app.export_modal_mut() else {
                return;
            };
            match key.code {
                KeyCode::Up => modal.move_highlight_up(),
                KeyCode::Down => modal.move_highlight_down(),
                KeyCode::Char(' ') => modal.toggle_highlighted(),
                KeyCode::Char('a') => modal.toggle_select_all(),
                KeyCode::Left | KeyCode::BackTab => modal.prev_format(),
                KeyCode::Right | KeyCode::Tab => modal.next_format(),
                _ => {}
            }
        }
    }
}

/// A left click anywhere on the card surface flips it.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, card_area: Rect) {
    if app.notice().is_some() || app.pending_delete().is_some() || app.export_modal().is_some() {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
        && card_area.contains(Position::new(mouse.column, mouse.row))
    {
        app.set_focus(Focus::Card);
        app.flip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenerateOutcome;
    use crate::app::MSG_MISSING_CREDENTIAL;
    use crate::config::Config;
    use crate::models::{ApiRequest, ApiResponse, CardFace, ExportFormat, Language, sample_deck};
    use crate::storage::LocalStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    fn test_app() -> App {
        let config = Config {
            backend_url: "http://localhost:8001".to_string(),
            data_dir: std::env::temp_dir(),
            export_dir: std::env::temp_dir(),
            empty_selection: Default::default(),
        };
        App::new(config, LocalStore::open_in_memory().unwrap())
    }

    fn app_with_active_deck(cards: usize) -> App {
        let mut app = test_app();
        app.set_credential("key");
        app.set_topic("Rome");
        app.generate_deck();
        app.take_requests();
        app.handle_response(ApiResponse::Generated {
            ticket: 1,
            result: Ok(GenerateOutcome::Generated {
                deck: sample_deck("a", cards),
                message: None,
            }),
        });
        app.take_requests();
        app
    }

    #[test]
    fn test_typing_into_credential_and_topic() {
        let mut app = test_app();
        type_text(&mut app, "sk_1");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "Roma");
        handle_key(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.credential().value(), "sk_1");
        assert_eq!(app.topic().value(), "Rom");
    }

    #[test]
    fn test_typing_q_and_d_in_text_fields() {
        let mut app = test_app();
        app.set_focus(Focus::Topic);
        type_text(&mut app, "qdr ");
        assert_eq!(app.topic().value(), "qdr ");
        assert!(!app.should_quit());
    }

    #[test]
    fn test_enter_on_topic_generates_and_is_blocked_without_key() {
        let mut app = test_app();
        app.set_focus(Focus::Topic);
        type_text(&mut app, "Rome");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.notice().unwrap().message, MSG_MISSING_CREDENTIAL);
        assert!(app.take_requests().is_empty());

        // Notice swallows other keys until dismissed.
        handle_key(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.topic().value(), "Rome");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let mut app = test_app();
        app.set_credential("key");
        app.set_topic("Rome");

        handle_key(&mut app, ctrl('t'));
        handle_key(&mut app, ctrl('g'));
        handle_key(&mut app, ctrl('r'));
        let requests = app.take_requests();
        assert!(matches!(requests[0], ApiRequest::TestConnectivity { .. }));
        assert!(matches!(requests[1], ApiRequest::Generate { .. }));
        assert_eq!(requests[2], ApiRequest::LoadDecks { seq: 1 });

        handle_key(&mut app, ctrl('e'));
        assert!(app.export_modal().is_some());
    }

    #[test]
    fn test_ctrl_c_quits_even_with_overlay() {
        let mut app = test_app();
        app.open_export();
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_language_and_count_selectors() {
        let mut app = test_app();
        app.set_focus(Focus::Language);
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.language(), Language::Hindi);
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.language(), Language::Arabic);

        app.set_focus(Focus::Count);
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.count(), 8);
    }

    #[test]
    fn test_card_keys() {
        let mut app = app_with_active_deck(3);
        assert_eq!(app.focus(), Focus::Card);

        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(app.active_deck().unwrap().face(), CardFace::Back);
        handle_key(&mut app, key(KeyCode::Right));
        let active = app.active_deck().unwrap();
        assert_eq!(active.cursor().unwrap().index(), 1);
        assert_eq!(active.face(), CardFace::Front);

        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.active_deck().unwrap().face(), CardFace::Front);
    }

    #[test]
    fn test_delete_confirmation_keys() {
        let mut app = test_app();
        app.handle_response(ApiResponse::Decks {
            seq: 0,
            result: Ok(vec![sample_deck("a", 1)]),
        });
        app.set_focus(Focus::Decks);

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(app.pending_delete().is_some());
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert!(app.pending_delete().is_none());
        assert!(app.take_requests().is_empty());

        handle_key(&mut app, key(KeyCode::Delete));
        handle_key(&mut app, key(KeyCode::Char('y')));
        assert_eq!(
            app.take_requests(),
            vec![ApiRequest::DeleteDeck {
                id: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_export_modal_keys() {
        let mut app = test_app();
        app.handle_response(ApiResponse::Decks {
            seq: 0,
            result: Ok(vec![sample_deck("a", 1), sample_deck("b", 1), sample_deck("c", 1)]),
        });
        handle_key(&mut app, ctrl('e'));

        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(app.export_modal().unwrap().all_selected());
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.export_modal().unwrap().all_selected());

        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.export_modal().unwrap().format(), ExportFormat::Csv);

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.export_modal().is_none());
        match app.take_requests().as_slice() {
            [ApiRequest::Export { selection }] => {
                assert_eq!(selection.deck_ids, vec!["b".to_string(), "c".to_string()]);
                assert_eq!(selection.format, ExportFormat::Csv);
            }
            other => panic!("unexpected requests: {:?}", other),
        }
    }

    #[test]
    fn test_mouse_click_flips_card() {
        let mut app = app_with_active_deck(2);
        app.set_focus(Focus::Decks);
        let area = Rect::new(10, 5, 40, 10);
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        };

        handle_mouse(&mut app, click(2, 2), area);
        assert_eq!(app.active_deck().unwrap().face(), CardFace::Front);

        handle_mouse(&mut app, click(20, 8), area);
        assert_eq!(app.active_deck().unwrap().face(), CardFace::Back);
        assert_eq!(app.focus(), Focus::Card);

        handle_mouse(&mut app, click(20, 8), area);
        assert_eq!(app.active_deck().unwrap().face(), CardFace::Front);
    }

    #[test]
    fn test_esc_quits_from_main_screen() {
        let mut app = test_app();
        app.open_export();
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.export_modal().is_none());
        assert!(!app.should_quit());

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit());
    }
}
