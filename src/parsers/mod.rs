pub mod details;
pub mod listing;

pub use details::extract_detail;
pub use listing::extract_list;

use scraper::{ElementRef, Selector};
use url::Url;

pub const DEFAULT_IMAGE_ATTRIBUTE: &str = "src";

/// Trimmed text content of an element, `None` when nothing but whitespace
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let trimmed = text.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text of the first element under `scope` matching `selector`.
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().and_then(element_text)
}

/// Non-blank attribute value.
pub fn attribute(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reads the requested image attribute, falling back to `src` once when a
/// custom attribute was asked for and is missing.
pub fn image_source(element: ElementRef<'_>, requested: Option<&str>) -> Option<String> {
    let name = requested.unwrap_or(DEFAULT_IMAGE_ATTRIBUTE);

    attribute(element, name).or_else(|| {
        if name != DEFAULT_IMAGE_ATTRIBUTE {
            attribute(element, DEFAULT_IMAGE_ATTRIBUTE)
        } else {
            None
        }
    })
}

/// Absolute links are kept; relative ones are joined onto the origin of the
/// page they were found on. Pages with an opaque origin cannot resolve
/// relative links.
pub fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let origin = page_url.origin();
            if !origin.is_tuple() {
                return None;
            }
            Url::parse(&origin.ascii_serialization())
                .ok()?
                .join(href)
                .ok()
        }
        Err(_) => None,
    }
}
