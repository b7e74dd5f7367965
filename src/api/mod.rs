//! Client for the Spaceflight News REST API.
//!
//! - [`types`] - Wire types (`Article`, `ArticlePage`) and the `Category` enum
//! - [`client`] - `ApiClient`, a thin reqwest wrapper with size and time limits
//!
//! Only two calls are made against the upstream service:
//!
//! ```text
//! GET {base}/{category}/?limit=24
//! GET {base}/{category}/?search={text}&limit=24
//! ```

mod client;
mod types;

pub use client::{
    ApiClient, ApiError, ErrorKind, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, DEFAULT_TIMEOUT,
};
pub use types::{Article, ArticlePage, Category};
