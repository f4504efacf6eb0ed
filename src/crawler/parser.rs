//! HTML parsing and content extraction
//!
//! This module turns a fetched body into the structured pieces a page record needs:
//! - Page title
//! - Headings, h1 through h6
//! - Paragraph texts
//! - Raw links with their anchor text

use crate::url::LinkCandidate;
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Title used when a page has no usable `<title>`
pub const UNKNOWN_TITLE: &str = "Unknown Title";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Content extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,

    /// All h1 texts in document order, then all h2 texts, and so on down to h6
    pub headings: Vec<String>,

    /// Non-empty paragraph texts in document order
    pub paragraphs: Vec<String>,

    /// Every `<a href>` with non-empty anchor text, in document order
    pub links: Vec<LinkCandidate>,
}

/// Rejects responses whose declared content type is not HTML
///
/// A missing content type is accepted and left to the parser.
pub fn ensure_html(url: &str, content_type: Option<&str>) -> Result<(), ParseError> {
    match content_type {
        Some(value) if !value.to_ascii_lowercase().contains("html") => Err(ParseError::NotHtml {
            url: url.to_string(),
            content_type: value.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Parses a fetched body into an HTML document
///
/// # Arguments
///
/// * `url` - The page URL, used for error reporting
/// * `body` - Raw response bytes
///
/// # Returns
///
/// * `Ok(Html)` - The parsed document (the HTML parser itself never fails)
/// * `Err(ParseError::InvalidEncoding)` - The body is not valid UTF-8
pub fn parse_document(url: &str, body: &[u8]) -> Result<Html, ParseError> {
    let text = std::str::from_utf8(body).map_err(|_| ParseError::InvalidEncoding {
        url: url.to_string(),
    })?;
    Ok(Html::parse_document(text))
}

/// Extracts title, headings, paragraphs and links from a parsed document
///
/// # Example
///
/// ```
/// use gleaner::crawler::{extract, parse_document};
///
/// let html = br#"<html><head><title>Open Days</title></head>
///     <body><h1>Visit</h1><p>Book a place.</p><a href="/book">Book</a></body></html>"#;
/// let document = parse_document("https://x.edu/", html).unwrap();
/// let page = extract(&document);
///
/// assert_eq!(page.title, "Open Days");
/// assert_eq!(page.headings, vec!["Visit"]);
/// assert_eq!(page.links[0].href, "/book");
/// ```
pub fn extract(document: &Html) -> ExtractedPage {
    ExtractedPage {
        title: extract_title(document),
        headings: extract_headings(document),
        paragraphs: extract_paragraphs(document),
        links: extract_links(document),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects trimmed, non-empty texts of every element matching `selector`
fn select_texts(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn extract_title(document: &Html) -> String {
    select_texts(document, "title")
        .into_iter()
        .next()
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

fn extract_headings(document: &Html) -> Vec<String> {
    HEADING_TAGS
        .iter()
        .flat_map(|tag| select_texts(document, tag))
        .collect()
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    select_texts(document, "p")
}

fn extract_links(document: &Html) -> Vec<LinkCandidate> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let anchor_text = element_text(element);
            (!anchor_text.is_empty()).then(|| LinkCandidate::new(href, anchor_text))
        })
        .collect()
}
