//! Page classification
//!
//! Derives a topic category, a keyword set and a display section title from the text
//! extracted from a page. All heuristics are plain substring checks.

mod keywords;
mod page_type;

use std::collections::BTreeSet;

pub use keywords::{extract_keywords, MAX_KEYWORDS};
pub use page_type::{
    is_admissions, is_department, is_events, is_postgraduate, is_research, is_undergraduate,
    PageType,
};

/// Longest section title kept before truncation
const SECTION_TITLE_LIMIT: usize = 100;

/// Result of classifying one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub page_type: PageType,
    pub keywords: BTreeSet<String>,
    pub section_title: String,
}

/// Classifies a page from its URL and extracted text
///
/// # Arguments
///
/// * `url` - The page URL (part of the page type signal)
/// * `title` - The page title
/// * `headings` - Headings in extraction order
/// * `paragraphs` - Non-empty paragraph texts in document order
pub fn classify(url: &str, title: &str, headings: &[String], paragraphs: &[String]) -> Classification {
    Classification {
        page_type: PageType::detect(url, title),
        keywords: extract_keywords(title, headings, paragraphs),
        section_title: section_title(title, headings),
    }
}

/// First heading, falling back to the title, whitespace-collapsed and capped
pub fn section_title(title: &str, headings: &[String]) -> String {
    let source = headings.first().map(String::as_str).unwrap_or(title);
    let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > SECTION_TITLE_LIMIT {
        let truncated: String = collapsed.chars().take(SECTION_TITLE_LIMIT).collect();
        format!("{}...", truncated)
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_undergraduate_page() {
        let headings = vec!["Computer Science BSc (Hons)".to_string()];
        let result = classify(
            "https://x.edu/undergraduate/cs",
            "BSc Computer Science",
            &headings,
            &[],
        );

        assert_eq!(result.page_type, PageType::Undergraduate);
        assert!(result.keywords.contains("computer science"));
        assert_eq!(result.section_title, "Computer Science BSc (Hons)");
    }

    #[test]
    fn test_section_title_falls_back_to_title() {
        assert_eq!(section_title("  Open   Days\n2025 ", &[]), "Open Days 2025");
    }

    #[test]
    fn test_section_title_truncated() {
        let long = "word ".repeat(40);
        let result = section_title("", &[long]);

        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), SECTION_TITLE_LIMIT + 3);
    }

    #[test]
    fn test_section_title_at_limit_untouched() {
        let exact = "a".repeat(SECTION_TITLE_LIMIT);
        assert_eq!(section_title(&exact, &[]), exact);
    }
}
