//! Domain scoping predicates
//!
//! Keeps a crawl from leaking onto third-party sites reached through outbound links.

use url::Url;

/// A host pattern a crawl is allowed to stay within
///
/// `example.com` matches only that host; `*.example.com` matches the bare domain and
/// any subdomain beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    Exact(String),
    Suffix(String),
}

impl HostPattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        match pattern.strip_prefix("*.") {
            Some(base) => Self::Suffix(base.to_string()),
            None => Self::Exact(pattern),
        }
    }

    /// Derives the default pattern for a seed: its host with any leading `www.` removed,
    /// widened to cover every subdomain
    pub fn for_seed(seed: &str) -> Option<Self> {
        let host = Url::parse(seed).ok()?.host_str()?.to_lowercase();
        let site = host.strip_prefix("www.").unwrap_or(&host);
        Some(Self::Suffix(site.to_string()))
    }

    /// Checks a lowercase host against this pattern
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(expected) => host == expected,
            Self::Suffix(base) => {
                host == base
                    || host
                        .strip_suffix(base.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            }
        }
    }
}

/// The set of hosts one seed's crawl may recurse into
#[derive(Debug, Clone)]
pub struct DomainScope {
    patterns: Vec<HostPattern>,
}

impl DomainScope {
    /// Builds the scope for a seed from configured patterns, or from the seed host when
    /// none are configured
    pub fn for_seed(seed: &str, configured: &[String]) -> Self {
        let patterns = if configured.is_empty() {
            HostPattern::for_seed(seed).into_iter().collect()
        } else {
            configured.iter().map(|p| HostPattern::parse(p)).collect()
        };
        Self { patterns }
    }

    /// Whether `candidate` (an absolute URL) may be recursed into from `current_page`
    pub fn allows(&self, candidate: &str, current_page: &str) -> bool {
        host_in_scope(candidate, &self.patterns) || contained_in_page_url(candidate, current_page)
    }
}

/// Checks whether the host of `candidate` matches any of `patterns`
pub fn host_in_scope(candidate: &str, patterns: &[HostPattern]) -> bool {
    let Some(host) = Url::parse(candidate)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
    else {
        return false;
    };

    patterns.iter().any(|pattern| pattern.matches(&host))
}

/// Checks whether `candidate` appears verbatim inside the current page's URL
pub fn contained_in_page_url(candidate: &str, current_page: &str) -> bool {
    !candidate.is_empty() && current_page.contains(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern() {
        let pattern = HostPattern::parse("example.com");
        assert!(pattern.matches("example.com"));
        assert!(!pattern.matches("blog.example.com"));
        assert!(!pattern.matches("other.com"));
    }

    #[test]
    fn test_suffix_pattern() {
        let pattern = HostPattern::parse("*.example.ac.uk");
        assert!(pattern.matches("example.ac.uk"));
        assert!(pattern.matches("www.example.ac.uk"));
        assert!(pattern.matches("deep.nested.example.ac.uk"));
        assert!(!pattern.matches("myexample.ac.uk"));
        assert!(!pattern.matches("example.ac.uk.evil.com"));
    }

    #[test]
    fn test_pattern_lowercased() {
        assert_eq!(
            HostPattern::parse("*.Example.COM"),
            HostPattern::Suffix("example.com".into())
        );
    }

    #[test]
    fn test_seed_pattern_strips_www() {
        assert_eq!(
            HostPattern::for_seed("https://WWW.Example.ac.uk/open-days"),
            Some(HostPattern::Suffix("example.ac.uk".into()))
        );
        assert_eq!(HostPattern::for_seed("/relative"), None);
    }

    #[test]
    fn test_default_scope_follows_seed_site() {
        let scope = DomainScope::for_seed("https://www.example.ac.uk/", &[]);
        let page = "https://www.example.ac.uk/";

        assert!(scope.allows("https://www.example.ac.uk/courses", page));
        assert!(scope.allows("https://library.example.ac.uk/", page));
        assert!(!scope.allows("https://twitter.com/example", page));
    }

    #[test]
    fn test_configured_scope_replaces_default() {
        let scope = DomainScope::for_seed(
            "https://www.example.ac.uk/",
            &["partner.org".to_string()],
        );
        let page = "https://www.example.ac.uk/";

        assert!(scope.allows("https://partner.org/x", page));
        assert!(!scope.allows("https://www.example.ac.uk/courses", page));
    }

    #[test]
    fn test_contained_in_page_url() {
        assert!(contained_in_page_url(
            "https://a.org/news",
            "https://a.org/news/2024/item"
        ));
        assert!(!contained_in_page_url("https://a.org/events", "https://a.org/news"));
        assert!(!contained_in_page_url("", "https://a.org/"));
    }

    #[test]
    fn test_out_of_scope_link_allowed_when_contained_in_page() {
        let scope = DomainScope::for_seed("https://example.ac.uk/", &[]);
        assert!(scope.allows("https://mirror.net/a", "https://mirror.net/a/b"));
    }

    #[test]
    fn test_unparseable_candidate_out_of_scope() {
        let patterns = vec![HostPattern::parse("*.example.com")];
        assert!(!host_in_scope("not a url", &patterns));
    }
}
