//! spacenews: a terminal reader for the Spaceflight News API.
//!
//! - [`api`] talks to the article service
//! - [`feed`] owns the article list, popular subset and selection
//! - [`app`] layers view state (focus, cursors, inputs, theme) on top
//! - [`ui`] draws it with ratatui and runs the event loop

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
