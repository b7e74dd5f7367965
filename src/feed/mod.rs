//! Article feed state.
//!
//! [`FeedController`] owns the article list, the active category, the search
//! text, the opened article and the "show more" cursor. It has no knowledge of
//! the network or the terminal: operations that need data return a
//! [`FetchRequest`], and the caller feeds the response back through
//! [`FeedController::apply`].
//!
//! ```ignore
//! let mut feed = FeedController::new(Category::Science);
//! let request = feed.refresh();
//! let result = client.fetch(request.category, request.query.as_deref()).await;
//! feed.apply(&request, result);
//! ```

mod controller;
mod popular;

pub use controller::{FeedController, FetchOutcome, FetchRequest, MORE_SLICE, PAGE_STEP};
pub use popular::{compute_popular, POPULAR_LIMIT};
