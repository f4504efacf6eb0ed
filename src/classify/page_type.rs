use std::fmt;
use std::str::FromStr;

/// Topic category assigned to a crawled page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageType {
    Undergraduate,
    Postgraduate,
    Admissions,
    Department,
    Events,
    Research,
    General,
}

const UNDERGRADUATE_TERMS: &[&str] = &[
    "undergraduate",
    "bachelor",
    "bsc",
    "beng",
    "foundation year",
];

const POSTGRADUATE_TERMS: &[&str] = &[
    "postgraduate",
    "masters",
    "master's",
    "msc",
    "mba",
    "phd",
    "doctoral",
    "mres",
];

const ADMISSIONS_TERMS: &[&str] = &[
    "admission",
    "apply",
    "application",
    "entry requirements",
    "open day",
    "open-day",
    "clearing",
];

const DEPARTMENT_TERMS: &[&str] = &["department", "faculty", "school of", "school-of", "institute"];

const EVENTS_TERMS: &[&str] = &["event", "seminar", "workshop", "conference", "webinar"];

const RESEARCH_TERMS: &[&str] = &["research", "publication", "laboratory", "journal", "grant"];

fn mentions_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}

/// Each predicate expects lowercase `url + " " + title`
pub fn is_undergraduate(text: &str) -> bool {
    mentions_any(text, UNDERGRADUATE_TERMS)
}

pub fn is_postgraduate(text: &str) -> bool {
    mentions_any(text, POSTGRADUATE_TERMS)
}

pub fn is_admissions(text: &str) -> bool {
    mentions_any(text, ADMISSIONS_TERMS)
}

pub fn is_department(text: &str) -> bool {
    mentions_any(text, DEPARTMENT_TERMS)
}

pub fn is_events(text: &str) -> bool {
    mentions_any(text, EVENTS_TERMS)
}

pub fn is_research(text: &str) -> bool {
    mentions_any(text, RESEARCH_TERMS)
}

/// Checked in priority order; the first matching category wins
const RULES: &[(fn(&str) -> bool, PageType)] = &[
    (is_undergraduate, PageType::Undergraduate),
    (is_postgraduate, PageType::Postgraduate),
    (is_admissions, PageType::Admissions),
    (is_department, PageType::Department),
    (is_events, PageType::Events),
    (is_research, PageType::Research),
];

impl PageType {
    /// Derives the page type from a page's URL and title
    pub fn detect(url: &str, title: &str) -> Self {
        let text = format!("{} {}", url, title).to_lowercase();
        RULES
            .iter()
            .find(|(matches, _)| matches(&text))
            .map(|(_, page_type)| *page_type)
            .unwrap_or(Self::General)
    }

    /// Stable lowercase form used in storage and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undergraduate => "undergraduate",
            Self::Postgraduate => "postgraduate",
            Self::Admissions => "admissions",
            Self::Department => "department",
            Self::Events => "events",
            Self::Research => "research",
            Self::General => "general",
        }
    }

    pub fn all() -> [Self; 7] {
        [
            Self::Undergraduate,
            Self::Postgraduate,
            Self::Admissions,
            Self::Department,
            Self::Events,
            Self::Research,
            Self::General,
        ]
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|page_type| page_type.as_str() == s)
            .ok_or_else(|| format!("unknown page type '{}'", s))
    }
}
