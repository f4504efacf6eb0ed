use url::Url;

/// Prefixes that mark an href as not worth following
const BANNED_PREFIXES: &[&str] = &["../", "#", "?", "mailto", "tel", "javascript"];

/// Document and image extensions that never lead to crawlable HTML
const BANNED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".jpg", ".png", ".gif"];

/// A hyperlink as discovered on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Raw value of the `href` attribute
    pub href: String,

    /// Visible anchor text, trimmed
    pub anchor_text: String,
}

impl LinkCandidate {
    pub fn new(href: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            anchor_text: anchor_text.into(),
        }
    }
}

/// Why a link was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort,
    BannedPrefix,
    BannedExtension,
    UnresolvableBase,
    UnsupportedForm,
}

/// Outcome of running the link filter over one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    /// The link is crawlable; carries the absolute URL to fetch
    Accept(String),

    /// The link is not crawlable; carries the original href
    Reject { href: String, reason: RejectReason },
}

impl LinkVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    /// The resolved URL when accepted, the untouched href when rejected
    pub fn target(&self) -> &str {
        match self {
            Self::Accept(url) => url,
            Self::Reject { href, .. } => href,
        }
    }

    pub fn into_accepted(self) -> Option<String> {
        match self {
            Self::Accept(url) => Some(url),
            Self::Reject { .. } => None,
        }
    }
}

/// Decides whether a discovered href is crawlable and resolves it to an absolute URL
///
/// # Rules
///
/// Checked in order, first match wins:
///
/// | Condition | Verdict |
/// |-----------|---------|
/// | Fewer than 2 characters | Reject |
/// | Starts with `../`, `#`, `?`, `mailto`, `tel`, `javascript` | Reject |
/// | Ends with `.pdf`, `.doc`, `.docx`, `.jpg`, `.png`, `.gif` (any case) | Reject |
/// | Starts with `http://` or `https://` | Accept unchanged |
/// | Starts with a single `/` | Accept, joined onto `base_url` |
/// | Anything else (`//host`, bare relative paths, other schemes) | Reject |
///
/// No URL canonicalization happens beyond relative resolution: fragments, trailing
/// slashes and query order are preserved as written.
///
/// # Examples
///
/// ```
/// use gleaner::url::{filter_link, LinkCandidate};
///
/// let verdict = filter_link("https://x.edu/a", &LinkCandidate::new("/b/c", "B"));
/// assert_eq!(verdict.target(), "https://x.edu/b/c");
///
/// let verdict = filter_link("https://x.edu/a", &LinkCandidate::new("#section", "Jump"));
/// assert!(!verdict.is_accepted());
/// assert_eq!(verdict.target(), "#section");
/// ```
pub fn filter_link(base_url: &str, candidate: &LinkCandidate) -> LinkVerdict {
    let href = candidate.href.as_str();
    let reject = |reason| LinkVerdict::Reject {
        href: href.to_string(),
        reason,
    };

    if href.chars().count() < 2 {
        return reject(RejectReason::TooShort);
    }

    if BANNED_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        return reject(RejectReason::BannedPrefix);
    }

    if has_banned_extension(href) {
        return reject(RejectReason::BannedExtension);
    }

    if is_absolute_http(href) {
        return LinkVerdict::Accept(href.to_string());
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return match Url::parse(base_url).and_then(|base| base.join(href)) {
            Ok(resolved) => LinkVerdict::Accept(resolved.to_string()),
            Err(_) => reject(RejectReason::UnresolvableBase),
        };
    }

    reject(RejectReason::UnsupportedForm)
}

fn has_banned_extension(href: &str) -> bool {
    let lowered = href.to_ascii_lowercase();
    BANNED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

fn is_absolute_http(href: &str) -> bool {
    let lowered = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
