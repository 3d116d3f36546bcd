use std::sync::mpsc;

use tempfile::tempdir;

use crate::relay::{RelayMessage, channel, parse_envelope};

use super::*;

struct FixedUrl(Option<String>);

impl UrlSource for FixedUrl {
    fn active_url(&mut self) -> Option<String> {
        self.0.clone()
    }
}

fn app_with_url(
    url: Option<&str>,
) -> (tempfile::TempDir, App, mpsc::Receiver<serde_json::Value>) {
    let tmp = tempdir().expect("create temp dir");
    let store = CommandStore::open(tmp.path()).expect("open store");
    let (relay, rx) = channel();
    let app = App::new(store, relay, Box::new(FixedUrl(url.map(|s| s.to_string()))));
    (tmp, app, rx)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn run_without_url_sends_nothing() {
    let (_tmp, mut app, rx) = app_with_url(None);
    app.run_command();
    assert!(rx.try_recv().is_err());
}

#[test]
fn run_dispatches_args_with_url_appended() {
    let (_tmp, mut app, rx) = app_with_url(Some("https://example.com"));
    app.run_command();

    let env = rx.try_recv().expect("one envelope");
    match parse_envelope(&env) {
        Some(RelayMessage::RunCommand(p)) => {
            assert_eq!(p.command, "curl");
            assert_eq!(p.args, vec!["-X", "GET", "https://example.com"]);
        }
        other => panic!("unexpected message: {:?}", other),
    }
    assert!(rx.try_recv().is_err(), "exactly one dispatch per run");
}

#[test]
fn add_argument_via_keys() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    app.handle_key(key(KeyCode::Char('a')));
    assert!(app.editor.is_open());

    app.handle_key(key(KeyCode::Char('-')));
    app.handle_key(key(KeyCode::Char('v')));
    app.handle_key(key(KeyCode::Enter));

    assert!(!app.editor.is_open());
    assert_eq!(app.spec.args, vec!["-X", "GET", "-v"]);
}

#[test]
fn multibyte_argument_edits_cleanly() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    app.handle_key(key(KeyCode::Char('a')));
    app.handle_key(key(KeyCode::Char('é')));
    app.handle_key(key(KeyCode::Char('a')));
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.spec.args, vec!["-X", "GET", "é"]);
}

#[test]
fn empty_add_argument_is_noop() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    app.handle_key(key(KeyCode::Char('a')));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.spec.args, vec!["-X", "GET"]);
}

#[test]
fn edit_base_via_keys() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    // First field is the base command; the input is seeded with it.
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.input.buf, "curl");

    for _ in 0.."curl".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    for c in "wget".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.spec.base, "wget");
}

#[test]
fn ctrl_r_removes_the_argument_under_edit() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    // Select the first argument (one step below the base).
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert!(app.editor.is_open());

    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert!(!app.editor.is_open());
    assert_eq!(app.spec.args, vec!["GET"]);
}

#[test]
fn escape_cancels_without_committing() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('x')));
    app.handle_key(key(KeyCode::Esc));

    assert!(!app.editor.is_open());
    assert_eq!(app.spec.base, "curl");
    assert!(!app.quit);
}

#[test]
fn selection_clamps_after_removal() {
    let (_tmp, mut app, _rx) = app_with_url(None);

    // Move to the last field (RUN), then remove an argument; the
    // selection must stay in range.
    for _ in 0..10 {
        app.handle_key(key(KeyCode::Down));
    }
    let last = app.fields().len() - 1;
    assert_eq!(app.selected, last);

    app.handle_key(key(KeyCode::Up));
    app.handle_key(key(KeyCode::Up));
    app.handle_key(key(KeyCode::Up));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

    assert!(app.selected < app.fields().len());
}
