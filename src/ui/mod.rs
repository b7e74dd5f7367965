//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and view dispatch
//! - `helpers` - Panic-safe fetch spawning and layout utilities
//! - `navbar` - Brand, category tabs and search box
//! - `articles` - "Latest" cards and the "More" slice
//! - `sidebar` - Popular News, Categories and the newsletter box
//! - `reader` - Article detail view
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod articles;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod navbar;
mod reader;
mod render;
mod sidebar;
mod status;

pub use loop_runner::{run, Action};
