//! Key handling.

use super::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use waveportal::Action;

/// What the event loop should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    None,
    Quit,
    /// Start an operation in the background.
    Run(Action),
    /// Rebuild the portal handle: drop the listener, reload the history and listen again.
    Reload,
}

/// Applies a key press to the page.
///
/// The alert is modal: while it is shown, every key except Enter and Esc is ignored.
pub(crate) fn on_key(app: &mut App, key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Command::Quit;
    }

    if app.controller.alert().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.controller.dismiss_alert();
        }
        return Command::None;
    }

    if app.controller.state().is_composing() {
        return on_compose_key(app, key);
    }

    match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('w') => {
            app.controller.start_composing();
            Command::None
        }
        KeyCode::Char('c') if app.controller.page().connect_button => {
            Command::Run(Action::ConnectWallet)
        }
        KeyCode::Char('r') => Command::Reload,
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down();
            Command::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up();
            Command::None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.scroll = 0;
            Command::None
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.scroll_to_end();
            Command::None
        }
        _ => Command::None,
    }
}

fn on_compose_key(app: &mut App, key: KeyEvent) -> Command {
    let controller = &mut app.controller;
    match key.code {
        KeyCode::Enter => Command::Run(Action::SubmitWave),
        KeyCode::Esc => {
            controller.cancel_composing();
            Command::None
        }
        KeyCode::Backspace => {
            let mut draft = controller.state().draft_message.clone();
            draft.pop();
            controller.set_draft_message(draft);
            Command::None
        }
        KeyCode::Char(c) => {
            let mut draft = controller.state().draft_message.clone();
            draft.push(c);
            controller.set_draft_message(draft);
            Command::None
        }
        _ => Command::None,
    }
}
