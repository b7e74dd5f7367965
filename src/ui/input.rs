//! Input handling for the TUI.
//!
//! Keys go to the help overlay first, then to whichever text box is active,
//! and otherwise through the keybinding registry for the current context.

use crate::app::{App, AppEvent, InputMode};
use crate::keybindings::Action as KbAction;
use crate::util::{validate_url_for_open, MAX_EMAIL_LENGTH, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_fetch;
use super::Action;

/// Lines moved by PageDown / PageUp when the viewport height is unknown.
const DEFAULT_PAGE_LINES: usize = 10;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys while visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    match app.input_mode {
        InputMode::Search | InputMode::Newsletter => {
            handle_text_input(app, code, modifiers, event_tx);
            Ok(Action::Continue)
        }
        InputMode::Normal => handle_normal_input(app, code, modifiers, event_tx),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_normal_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let context = app.context();
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::Select => {
            if let Some(request) = app.activate() {
                spawn_fetch(app, request, event_tx);
            }
        }
        KbAction::Home => app.go_home(),
        KbAction::ShowMore => app.show_more(),
        KbAction::Refresh => {
            let request = app.feed.refresh();
            spawn_fetch(app, request, event_tx);
            app.set_status(format!("Refreshing {}...", app.feed.category().name()));
        }
        KbAction::NextCategory => {
            let request = app.change_category(app.feed.category().next());
            spawn_fetch(app, request, event_tx);
        }
        KbAction::PrevCategory => {
            let request = app.change_category(app.feed.category().prev());
            spawn_fetch(app, request, event_tx);
        }
        KbAction::SelectCategory(_) => {
            if let Some(category) = action.category() {
                let request = app.change_category(category);
                spawn_fetch(app, request, event_tx);
            }
        }
        KbAction::EnterSearch => app.input_mode = InputMode::Search,
        KbAction::Newsletter => app.input_mode = InputMode::Newsletter,
        KbAction::OpenInBrowser => open_focused_article(app),
        KbAction::ScrollDown => app.scroll_down(1),
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => app.scroll_down(page_lines(app)),
        KbAction::PageUp => app.scroll_up(page_lines(app)),
        KbAction::ToggleTheme => {
            let name = app.toggle_theme();
            app.set_status(format!("{name} theme"));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        // Only bound in the text-entry contexts
        KbAction::CancelInput | KbAction::SubmitInput => {}
    }
    Ok(Action::Continue)
}

/// Edit the active text box. Only the box's own bindings (cancel, submit)
/// are honored; every other printable key is typed into the box.
fn handle_text_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let context = app.context();
    match app.keybindings.action_for_key(code, modifiers, context) {
        Some(KbAction::CancelInput) => {
            app.input_mode = InputMode::Normal;
            return;
        }
        Some(KbAction::SubmitInput) => {
            submit_text_input(app, event_tx);
            return;
        }
        _ => {}
    }

    let (buffer, max_len, label) = match app.input_mode {
        InputMode::Search => (&mut app.search_input, MAX_SEARCH_QUERY_LENGTH, "Search query"),
        InputMode::Newsletter => (&mut app.newsletter_input, MAX_EMAIL_LENGTH, "Email"),
        InputMode::Normal => return,
    };

    match code {
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if buffer.len() + c.len_utf8() > max_len {
                app.set_status(format!("{label} at max length ({max_len} chars)"));
                return;
            }
            buffer.push(c);
        }
        _ => {}
    }
}

fn submit_text_input(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.input_mode {
        InputMode::Search => {
            app.input_mode = InputMode::Normal;
            let request = app.feed.search(&app.search_input);
            // Results are shown in the list, so leave the article view
            app.go_home();
            app.selected_row = 0;
            app.clamp_selections();
            spawn_fetch(app, request, event_tx);
        }
        InputMode::Newsletter => app.submit_newsletter(),
        InputMode::Normal => {}
    }
}

fn page_lines(app: &App) -> usize {
    match app.reader_visible_lines {
        0 => DEFAULT_PAGE_LINES,
        n => n.saturating_sub(1).max(1),
    }
}

/// Open the focused article's URL in the system browser.
///
/// The URL is validated first so only http(s) links reach `open::that`.
fn open_focused_article(app: &mut App) {
    let Some(article) = app.focused_article() else {
        app.set_status("No article selected");
        return;
    };
    match validate_url_for_open(&article.url) {
        Err(e) => app.set_error_status(e.to_string()),
        Ok(url) => {
            tracing::debug!(url = %url, "Opening article in browser");
            if let Err(e) = open::that(url.as_str()) {
                app.set_error_status(format!("Failed to open browser: {e}"));
            } else {
                app.set_status("Opening in browser...");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use crate::app::tests::loaded_app;
    use crate::app::Focus;
    use pretty_assertions::assert_eq;

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    fn type_str(app: &mut App, tx: &mpsc::Sender<AppEvent>, s: &str) {
        for c in s.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_quit_key() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_typing_q_in_search_does_not_quit() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        press(&mut app, &tx, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue));
        type_str(&mut app, &tx, "ueen");
        assert_eq!(app.search_input, "queen");

        press(&mut app, &tx, KeyCode::Backspace);
        assert_eq!(app.search_input, "quee");

        press(&mut app, &tx, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_input, "quee");
    }

    #[tokio::test]
    async fn test_search_submit_issues_fetch_and_leaves_reader() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(5);
        press(&mut app, &tx, KeyCode::Enter);
        assert!(app.in_reader());

        press(&mut app, &tx, KeyCode::Char('/'));
        type_str(&mut app, &tx, "artemis");
        press(&mut app, &tx, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.in_reader());
        assert!(app.feed.is_loading());
        assert_eq!(app.feed.query(), "artemis");
        assert!(app.fetch_handle.is_some());
    }

    #[tokio::test]
    async fn test_search_length_capped() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(1);
        app.input_mode = InputMode::Search;
        app.search_input = "a".repeat(MAX_SEARCH_QUERY_LENGTH);
        press(&mut app, &tx, KeyCode::Char('b'));
        assert_eq!(app.search_input.len(), MAX_SEARCH_QUERY_LENGTH);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_newsletter_flow() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(1);
        press(&mut app, &tx, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Newsletter);
        type_str(&mut app, &tx, "a@b.io");
        assert_eq!(app.newsletter_input, "a@b.io");
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.newsletter_input.is_empty());
        assert!(app.fetch_handle.is_none());
    }

    #[tokio::test]
    async fn test_digit_jumps_to_category() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        press(&mut app, &tx, KeyCode::Char('8'));
        assert_eq!(app.feed.category(), Category::Launches);
        assert!(app.feed.is_loading());
        assert!(app.fetch_handle.is_some());
    }

    #[tokio::test]
    async fn test_next_and_prev_category_wrap() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        press(&mut app, &tx, KeyCode::Char('['));
        assert_eq!(app.feed.category(), Category::Launches);
        press(&mut app, &tx, KeyCode::Char(']'));
        assert_eq!(app.feed.category(), Category::Articles);
    }

    #[tokio::test]
    async fn test_reader_keys_scroll_instead_of_navigating() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(5);
        press(&mut app, &tx, KeyCode::Enter);
        app.reader_content_lines = 50;
        app.reader_visible_lines = 10;

        press(&mut app, &tx, KeyCode::Char('j'));
        assert_eq!(app.scroll_offset, 1);
        assert_eq!(app.selected_row, 0);

        press(&mut app, &tx, KeyCode::PageDown);
        assert_eq!(app.scroll_offset, 10);

        press(&mut app, &tx, KeyCode::Char('b'));
        assert!(!app.in_reader());
    }

    #[tokio::test]
    async fn test_show_more_in_list() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(20);
        press(&mut app, &tx, KeyCode::Char('m'));
        assert_eq!(app.feed.visible_count(), 18);
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, &tx, KeyCode::Char('j'));
        assert_eq!(app.help_scroll_offset, 1);
        assert_eq!(app.selected_row, 0);

        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_tab_cycles_focus() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(3);
        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Popular);
    }

    #[tokio::test]
    async fn test_toggle_theme_key() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = loaded_app(1);
        press(&mut app, &tx, KeyCode::Char('t'));
        assert_eq!(app.theme_variant, crate::theme::ThemeVariant::Dark);
    }
}
