use super::popular::compute_popular;
use crate::api::{ApiError, Article, ArticlePage, Category, ErrorKind};
use std::ops::Range;
use std::sync::Arc;

/// Items revealed initially and on each "show more".
pub const PAGE_STEP: usize = 9;

/// Fixed "More {category}" slice shown under the grid.
///
/// Independent of the show-more cursor; both are kept as the web client had them.
pub const MORE_SLICE: Range<usize> = 9..10;

/// A fetch the controller wants performed.
///
/// Returned by every operation that needs the network. The caller runs it
/// (see `ApiClient::fetch`) and hands the result back through
/// [`FeedController::apply`] together with this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonic sequence number; only the latest one is ever applied.
    pub seq: u64,
    pub category: Category,
    /// `Some` for a keyword search, `None` for the category's default list.
    pub query: Option<String>,
}

impl FetchRequest {
    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }
}

/// What happened when a completed fetch was handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result list was replaced with `count` articles.
    Replaced { count: usize },
    /// The fetch failed; the list was left untouched.
    Failed { kind: ErrorKind },
    /// A newer request has been issued since; the result was discarded.
    Stale,
}

/// Single owner of everything the views render.
///
/// All transitions are synchronous. Network work is described by a returned
/// [`FetchRequest`] and its completion is fed back with [`apply`](Self::apply),
/// which keeps this type free of any runtime or rendering dependency.
///
/// Overlapping fetches resolve by sequence number: every request gets a new
/// `seq`, and a completion whose `seq` is not the latest issued is dropped.
/// Whichever request the user triggered last is the one whose data is shown.
#[derive(Debug, Clone)]
pub struct FeedController {
    category: Category,
    /// Replaced wholesale on every successful fetch, never edited in place.
    articles: Arc<Vec<Article>>,
    popular: Arc<Vec<Article>>,
    selected: Option<Article>,
    query: String,
    loading: bool,
    visible_cursor: usize,
    latest_seq: u64,
    last_error: Option<String>,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(Category::default())
    }
}

impl FeedController {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            articles: Arc::new(Vec::new()),
            popular: Arc::new(Vec::new()),
            selected: None,
            query: String::new(),
            loading: false,
            visible_cursor: PAGE_STEP,
            latest_seq: 0,
            last_error: None,
        }
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn popular(&self) -> &[Article] {
        &self.popular
    }

    pub fn selected(&self) -> Option<&Article> {
        self.selected.as_ref()
    }

    /// Last submitted search text (may be blank).
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of list items currently revealed. Never exceeds the list length.
    pub fn visible_count(&self) -> usize {
        self.visible_cursor.min(self.articles.len())
    }

    pub fn visible_articles(&self) -> &[Article] {
        &self.articles[..self.visible_count()]
    }

    /// Items for the fixed "more" section (may be empty).
    pub fn more_articles(&self) -> &[Article] {
        let len = self.articles.len();
        &self.articles[MORE_SLICE.start.min(len)..MORE_SLICE.end.min(len)]
    }

    pub fn can_show_more(&self) -> bool {
        self.visible_count() < self.articles.len()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Switch category and fetch its default list.
    ///
    /// The previous category's results are dropped immediately so they are
    /// never on screen while the new fetch is in flight.
    pub fn select_category(&mut self, category: Category) -> FetchRequest {
        tracing::info!(from = %self.category, to = %category, "Selecting category");
        self.category = category;
        self.selected = None;
        self.articles = Arc::new(Vec::new());
        self.popular = Arc::new(Vec::new());
        self.visible_cursor = PAGE_STEP;
        self.issue(None)
    }

    /// Re-fetch the active category's default list, keeping the current list
    /// on screen until the response arrives.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue(None)
    }

    /// Keyword search within the active category.
    ///
    /// A blank query is the same as [`refresh`](Self::refresh).
    pub fn search(&mut self, query: &str) -> FetchRequest {
        self.query = query.to_string();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.refresh();
        }
        self.issue(Some(trimmed.to_string()))
    }

    /// Open the detail view for `article`. The list is left as is.
    pub fn select_article(&mut self, article: Article) {
        tracing::debug!(article_id = article.id, "Selecting article");
        self.selected = Some(article);
    }

    /// Return to the list view. List and visible count are preserved.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Reveal the next page of already-fetched items.
    ///
    /// Returns `true` if anything new became visible; a no-op once every item
    /// is shown.
    pub fn show_more(&mut self) -> bool {
        let before = self.visible_count();
        self.visible_cursor = (before + PAGE_STEP).min(self.articles.len());
        self.visible_count() > before
    }

    /// Apply a completed fetch.
    ///
    /// Stale completions leave every field untouched, including the loading
    /// flag, since the newer request is still outstanding.
    pub fn apply(
        &mut self,
        request: &FetchRequest,
        result: Result<ArticlePage, ApiError>,
    ) -> FetchOutcome {
        if request.seq != self.latest_seq {
            tracing::debug!(
                seq = request.seq,
                latest = self.latest_seq,
                category = %request.category,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                let mut articles = page.results;
                let popular = if request.is_search() {
                    // Search results keep API order and never feed the popular panel
                    Vec::new()
                } else {
                    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                    compute_popular(&articles)
                };

                let count = articles.len();
                tracing::info!(
                    seq = request.seq,
                    category = %request.category,
                    search = request.is_search(),
                    count,
                    popular = popular.len(),
                    "Fetch applied"
                );

                self.articles = Arc::new(articles);
                self.popular = Arc::new(popular);
                self.visible_cursor = PAGE_STEP;
                self.last_error = None;
                FetchOutcome::Replaced { count }
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(
                    seq = request.seq,
                    category = %request.category,
                    search = request.is_search(),
                    kind = ?kind,
                    error = %e,
                    "Fetch failed, keeping previous results"
                );
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed { kind }
            }
        }
    }

    /// Settle a request whose task died without producing a result.
    ///
    /// Treated like a failed fetch: the list stays, loading clears if this was
    /// the latest request.
    pub fn abandon(&mut self, request: &FetchRequest, reason: &str) -> FetchOutcome {
        if request.seq != self.latest_seq {
            return FetchOutcome::Stale;
        }
        tracing::error!(seq = request.seq, category = %request.category, reason, "Fetch abandoned");
        self.loading = false;
        self.last_error = Some(reason.to_string());
        FetchOutcome::Failed {
            kind: ErrorKind::FetchFailed,
        }
    }

    fn issue(&mut self, query: Option<String>) -> FetchRequest {
        self.latest_seq = self.latest_seq.wrapping_add(1);
        self.loading = true;
        let request = FetchRequest {
            seq: self.latest_seq,
            category: self.category,
            query,
        };
        tracing::debug!(
            seq = request.seq,
            category = %request.category,
            query = ?request.query,
            "Issuing fetch"
        );
        request
    }
}
