use thiserror::Error;
use url::Url;

/// Placeholder shown when a card or detail image is missing or unusable.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Placeholder for the small thumbnails in the "more" section.
pub const THUMBNAIL_PLACEHOLDER: &str = "/api/placeholder/100/100";

#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Check that a URL is safe to hand to the system browser.
///
/// Article links come from the API; anything other than `http`/`https`
/// (`file://`, `javascript:`, custom handlers) is refused.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

/// Where an image slot should point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(Url),
    Placeholder(&'static str),
}

impl ImageSource {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSource::Placeholder(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::Remote(url) => url.as_str(),
            ImageSource::Placeholder(path) => path,
        }
    }
}

/// Resolve an article's image: the primary URL when it is present and a
/// well-formed http(s) link, otherwise `placeholder`.
pub fn resolve_image(image_url: Option<&str>, placeholder: &'static str) -> ImageSource {
    image_url
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| validate_url_for_open(s).ok())
        .map_or(ImageSource::Placeholder(placeholder), ImageSource::Remote)
}
