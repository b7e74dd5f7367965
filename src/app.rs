use crate::api::{ApiClient, ApiError, Article, ArticlePage, Category};
use crate::feed::{FeedController, FetchRequest};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Popular items shown in the sidebar (the subset itself holds up to 8).
pub const POPULAR_PANEL_SIZE: usize = 5;

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

/// Which panel has focus.
///
/// `Main` is the article list, or the reader when an article is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Main,
    Popular,
    Categories,
}

/// Text-entry state; keys are routed to the input box instead of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Newsletter,
}

/// Events from background tasks.
pub enum AppEvent {
    /// A fetch task finished, successfully or not.
    FetchCompleted {
        request: FetchRequest,
        result: Result<ArticlePage, ApiError>,
    },
    /// A background task panicked.
    ///
    /// `request` is set when the task was a fetch, so its loading state can
    /// be settled.
    TaskPanicked {
        task: &'static str,
        request: Option<FetchRequest>,
        error: String,
    },
}

/// Central application state.
///
/// Article data lives in [`FeedController`]; everything here is view state
/// layered on top of it (focus, cursors, input boxes, theme, status line).
pub struct App {
    pub feed: FeedController,
    pub api: ApiClient,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub focus: Focus,
    /// Cursor over list rows: visible cards first, then the "more" slice.
    pub selected_row: usize,
    pub selected_popular: usize,
    pub selected_category: usize,

    pub input_mode: InputMode,
    pub search_input: String,
    pub newsletter_input: String,

    pub scroll_offset: usize,
    /// Reader viewport height from the last render, used to clamp scrolling.
    pub reader_visible_lines: usize,
    /// Wrapped reader content height from the last render.
    pub reader_content_lines: usize,

    /// Message, time set, and whether it reports an error.
    pub status_message: Option<(Cow<'static, str>, Instant, bool)>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub needs_redraw: bool,
    pub spinner_frame: usize,

    /// Handle to the in-flight fetch, aborted when superseded.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(api: ApiClient, category: Category, theme_variant: ThemeVariant) -> Self {
        Self {
            feed: FeedController::new(category),
            api,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings: KeybindingRegistry::new(),
            focus: Focus::Main,
            selected_row: 0,
            selected_popular: 0,
            selected_category: category.index(),
            input_mode: InputMode::Normal,
            search_input: String::new(),
            newsletter_input: String::new(),
            scroll_offset: 0,
            reader_visible_lines: 0,
            reader_content_lines: 0,
            status_message: None,
            show_help: false,
            help_scroll_offset: 0,
            needs_redraw: true,
            spinner_frame: 0,
            fetch_handle: None,
        }
    }

    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Flip between light and dark. Returns the new theme's name.
    pub fn toggle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.toggle();
        self.set_theme(next);
        tracing::debug!(theme = next.name(), "Theme toggled");
        next.name()
    }

    /// Whether the detail view is showing.
    pub fn in_reader(&self) -> bool {
        self.feed.selected().is_some()
    }

    /// Keybinding context for the current focus and view.
    pub fn context(&self) -> Context {
        match self.input_mode {
            InputMode::Search => return Context::Search,
            InputMode::Newsletter => return Context::Newsletter,
            InputMode::Normal => {}
        }
        match self.focus {
            Focus::Main if self.in_reader() => Context::Reader,
            Focus::Main => Context::List,
            Focus::Popular => Context::Popular,
            Focus::Categories => Context::Categories,
        }
    }

    // ------------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------------

    /// Number of selectable list rows (visible cards plus the "more" slice).
    ///
    /// Zero while a fetch is in flight: the list area then shows only the
    /// loading indicator, so the previous list must not be reachable.
    pub fn row_count(&self) -> usize {
        if self.feed.is_loading() {
            return 0;
        }
        self.feed.visible_articles().len() + self.feed.more_articles().len()
    }

    pub fn article_at_row(&self, row: usize) -> Option<&Article> {
        if self.feed.is_loading() {
            return None;
        }
        let visible = self.feed.visible_articles();
        visible
            .get(row)
            .or_else(|| self.feed.more_articles().get(row.checked_sub(visible.len())?))
    }

    pub fn popular_panel(&self) -> &[Article] {
        let popular = self.feed.popular();
        &popular[..popular.len().min(POPULAR_PANEL_SIZE)]
    }

    /// Categories are listed in the sidebar only while no article is open.
    pub fn categories_visible(&self) -> bool {
        !self.in_reader()
    }

    /// Article an "open in browser" would target.
    pub fn focused_article(&self) -> Option<&Article> {
        match self.focus {
            Focus::Popular => self.popular_panel().get(self.selected_popular),
            _ => self
                .feed
                .selected()
                .or_else(|| self.article_at_row(self.selected_row)),
        }
    }

    /// Keep every cursor inside its list. Call after the data changes.
    pub fn clamp_selections(&mut self) {
        self.selected_row = self.selected_row.min(self.row_count().saturating_sub(1));
        self.selected_popular = self
            .selected_popular
            .min(self.popular_panel().len().saturating_sub(1));
        self.selected_category = self.selected_category.min(Category::ALL.len() - 1);
        if self.focus == Focus::Categories && !self.categories_visible() {
            self.focus = Focus::Main;
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Main => self.selected_row = self.selected_row.saturating_sub(1),
            Focus::Popular => self.selected_popular = self.selected_popular.saturating_sub(1),
            Focus::Categories => {
                self.selected_category = self.selected_category.saturating_sub(1)
            }
        }
    }

    pub fn nav_down(&mut self) {
        let len = match self.focus {
            Focus::Main => self.row_count(),
            Focus::Popular => self.popular_panel().len(),
            Focus::Categories => Category::ALL.len(),
        };
        let cursor = match self.focus {
            Focus::Main => &mut self.selected_row,
            Focus::Popular => &mut self.selected_popular,
            Focus::Categories => &mut self.selected_category,
        };
        if len > 0 {
            *cursor = cursor.saturating_add(1).min(len - 1);
        }
    }

    /// Main → Popular → Categories (when shown) → Main.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Main => Focus::Popular,
            Focus::Popular if self.categories_visible() => Focus::Categories,
            Focus::Popular | Focus::Categories => Focus::Main,
        };
    }

    /// Act on the focused row.
    ///
    /// Opens an article from the list or popular panel, or switches category
    /// from the categories panel. Returns a fetch to run for the latter.
    pub fn activate(&mut self) -> Option<FetchRequest> {
        match self.focus {
            Focus::Main if self.in_reader() => None,
            Focus::Main => {
                let article = self.article_at_row(self.selected_row)?.clone();
                self.open_article(article);
                None
            }
            Focus::Popular => {
                let article = self.popular_panel().get(self.selected_popular)?.clone();
                self.open_article(article);
                None
            }
            Focus::Categories => {
                let category = *Category::ALL.get(self.selected_category)?;
                Some(self.change_category(category))
            }
        }
    }

    pub fn open_article(&mut self, article: Article) {
        self.feed.select_article(article);
        self.scroll_offset = 0;
        self.focus = Focus::Main;
        self.clamp_selections();
    }

    /// Back to the list. The row cursor and the list itself are kept.
    pub fn go_home(&mut self) {
        self.feed.clear_selection();
        self.scroll_offset = 0;
        self.focus = Focus::Main;
    }

    pub fn change_category(&mut self, category: Category) -> FetchRequest {
        let request = self.feed.select_category(category);
        self.selected_row = 0;
        self.selected_popular = 0;
        self.selected_category = category.index();
        self.scroll_offset = 0;
        self.clamp_selections();
        request
    }

    pub fn show_more(&mut self) {
        if self.feed.show_more() {
            self.set_status(format!(
                "Showing {} of {} articles",
                self.feed.visible_count(),
                self.feed.articles().len()
            ));
        } else {
            self.set_status("All articles shown");
        }
    }

    /// Confirm the newsletter box. Nothing is sent anywhere.
    pub fn submit_newsletter(&mut self) {
        tracing::debug!("Newsletter form submitted");
        self.newsletter_input.clear();
        self.input_mode = InputMode::Normal;
        self.set_status("Subscribed!");
    }

    // ------------------------------------------------------------------------
    // Reader scrolling
    // ------------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_reader_scroll();
    }

    pub fn clamp_reader_scroll(&mut self) {
        let max_scroll = self
            .reader_content_lines
            .saturating_sub(self.reader_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    /// Set status message (expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), false));
    }

    pub fn set_error_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), true));
    }

    /// Drop the status message once it has expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time, _)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Abort the in-flight fetch on exit so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted fetch task on App drop");
        }
    }
}
