//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are looked up per [`Context`] first and fall back to
//! [`Context::Global`], so the same key can mean different things in the
//! reader and in the list.
use crate::api::Category;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Select,
    Home,
    ShowMore,
    Refresh,
    NextCategory,
    PrevCategory,
    /// Jump straight to a category by its position in the navbar (0-based).
    SelectCategory(u8),
    EnterSearch,
    Newsletter,
    CancelInput,
    SubmitInput,
    OpenInBrowser,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ToggleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Cycle panel focus",
            Self::Select => "Open article / choose category",
            Self::Home => "Back to the article list",
            Self::ShowMore => "Show more articles",
            Self::Refresh => "Reload current category",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::SelectCategory(_) => "Jump to category",
            Self::EnterSearch => "Search news",
            Self::Newsletter => "Subscribe to newsletter",
            Self::CancelInput => "Cancel input",
            Self::SubmitInput => "Submit input",
            Self::OpenInBrowser => "Open article in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ToggleTheme => "Toggle dark/light theme",
            Self::ShowHelp => "Show help",
        }
    }

    /// The category targeted by a [`Action::SelectCategory`], if any.
    pub fn category(self) -> Option<Category> {
        match self {
            Self::SelectCategory(i) => Category::ALL.get(i as usize).copied(),
            _ => None,
        }
    }
}

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    Popular,
    Categories,
    Reader,
    Search,
    Newsletter,
}

impl Context {
    /// Heading used on the help screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::List => "Article list",
            Self::Popular => "Popular panel",
            Self::Categories => "Categories panel",
            Self::Reader => "Article view",
            Self::Search => "Search box",
            Self::Newsletter => "Newsletter box",
        }
    }
}

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Accepts single characters ("q", "/"), named keys ("Enter", "Esc", "Tab",
/// arrows, "Backspace", "Space", "PageUp"), "Ctrl+x" and "F1" to "F12".
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };

    format!("{modifier}{key_name}")
}

/// Registry of keybindings, supporting default bindings and config overrides.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Insertion-ordered copy for help screen enumeration.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for key in keys {
            self.bind(context, *key, action);
        }
    }

    fn register_defaults(&mut self) {
        use Context::*;

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Action::Quit);
        self.bind_all(
            Global,
            &[KeySpec::ch('j'), KeySpec::plain(KeyCode::Down)],
            Action::NavDown,
        );
        self.bind_all(
            Global,
            &[KeySpec::ch('k'), KeySpec::plain(KeyCode::Up)],
            Action::NavUp,
        );
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus);
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::Select);
        self.bind_all(
            Global,
            &[KeySpec::plain(KeyCode::Esc), KeySpec::ch('H')],
            Action::Home,
        );
        self.bind(Global, KeySpec::ch('r'), Action::Refresh);
        self.bind_all(
            Global,
            &[KeySpec::ch(']'), KeySpec::ch('l'), KeySpec::plain(KeyCode::Right)],
            Action::NextCategory,
        );
        self.bind_all(
            Global,
            &[KeySpec::ch('['), KeySpec::ch('h'), KeySpec::plain(KeyCode::Left)],
            Action::PrevCategory,
        );
        for (i, digit) in ('1'..='8').enumerate() {
            self.bind(Global, KeySpec::ch(digit), Action::SelectCategory(i as u8));
        }
        self.bind(Global, KeySpec::ch('/'), Action::EnterSearch);
        self.bind(Global, KeySpec::ch('n'), Action::Newsletter);
        self.bind(Global, KeySpec::ch('o'), Action::OpenInBrowser);
        self.bind(Global, KeySpec::ch('t'), Action::ToggleTheme);
        self.bind(Global, KeySpec::ch('?'), Action::ShowHelp);

        // === Article list ===
        self.bind_all(
            List,
            &[KeySpec::ch('m'), KeySpec::ch(' ')],
            Action::ShowMore,
        );

        // === Reader ===
        self.bind_all(
            Reader,
            &[KeySpec::plain(KeyCode::Esc), KeySpec::ch('b'), KeySpec::ch('H')],
            Action::Home,
        );
        self.bind_all(
            Reader,
            &[KeySpec::ch('j'), KeySpec::plain(KeyCode::Down)],
            Action::ScrollDown,
        );
        self.bind_all(
            Reader,
            &[KeySpec::ch('k'), KeySpec::plain(KeyCode::Up)],
            Action::ScrollUp,
        );
        self.bind_all(
            Reader,
            &[KeySpec::ctrl('d'), KeySpec::plain(KeyCode::PageDown)],
            Action::PageDown,
        );
        self.bind_all(
            Reader,
            &[KeySpec::ctrl('u'), KeySpec::plain(KeyCode::PageUp)],
            Action::PageUp,
        );

        // === Text inputs ===
        for ctx in [Search, Newsletter] {
            self.bind(ctx, KeySpec::plain(KeyCode::Esc), Action::CancelInput);
            self.bind(ctx, KeySpec::plain(KeyCode::Enter), Action::SubmitInput);
        }
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys are action names (`quit`, `show_more`, `category_3`), values are
    /// key strings (`q`, `Ctrl+d`, `F5`). The new key replaces the action's
    /// defaults in every context the action was bound in.
    ///
    /// Returns a warning for each unrecognised action or unparseable key.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{action_name}', ignoring"));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{key_str}' for action '{action_name}', ignoring"
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key, trying `context` before Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);
        self.lookup.get(&(context, key)).copied().or_else(|| {
            (context != Context::Global)
                .then(|| self.lookup.get(&(Context::Global, key)).copied())
                .flatten()
        })
    }

    /// Bindings grouped for the help screen, one row per (context, action)
    /// with all of its keys joined: `(context, "j / Down", description)`.
    pub fn help_rows(&self) -> Vec<(Context, String, &'static str)> {
        let mut rows: Vec<(Context, Action, Vec<String>)> = Vec::new();
        for (ctx, key, action) in &self.bindings {
            // Digit jumps collapse into a single "1-8" row
            if let Action::SelectCategory(_) = action {
                if rows
                    .iter()
                    .any(|(c, a, _)| c == ctx && matches!(a, Action::SelectCategory(_)))
                {
                    continue;
                }
                rows.push((*ctx, *action, vec!["1-8".to_string()]));
                continue;
            }
            match rows.iter_mut().find(|(c, a, _)| c == ctx && a == action) {
                Some((_, _, keys)) => keys.push(format_key(key)),
                None => rows.push((*ctx, *action, vec![format_key(key)])),
            }
        }
        rows.into_iter()
            .map(|(ctx, action, keys)| (ctx, keys.join(" / "), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name.strip_prefix("category_") {
        return n
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=8).contains(n))
            .map(|n| Action::SelectCategory(n - 1));
    }
    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "cycle_focus" | "focus" => Some(Action::CycleFocus),
        "select" | "open_article" => Some(Action::Select),
        "home" | "back" => Some(Action::Home),
        "show_more" | "more" => Some(Action::ShowMore),
        "refresh" | "reload" => Some(Action::Refresh),
        "next_category" => Some(Action::NextCategory),
        "prev_category" | "previous_category" => Some(Action::PrevCategory),
        "search" | "enter_search" => Some(Action::EnterSearch),
        "newsletter" => Some(Action::Newsletter),
        "cancel_input" | "cancel" => Some(Action::CancelInput),
        "submit_input" | "submit" => Some(Action::SubmitInput),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "toggle_theme" | "theme" => Some(Action::ToggleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}
