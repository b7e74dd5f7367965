//! Small helpers shared by the views.
//!
//! - **Text**: width-aware truncation, escape stripping for API-supplied text,
//!   and the two date formats used on cards and in the reader
//! - **URLs**: browser-open validation and image source resolution

mod text;
mod url;

pub use text::{
    display_width, format_long_date, format_short_date, strip_control_chars, truncate_to_width,
};
pub use url::{
    resolve_image, validate_url_for_open, ImageSource, UrlValidationError, PLACEHOLDER_IMAGE,
    THUMBNAIL_PLACEHOLDER,
};

/// Maximum accepted length of the search box, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

/// Maximum accepted length of the newsletter email field.
pub const MAX_EMAIL_LENGTH: usize = 254;
