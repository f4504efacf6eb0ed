use std::collections::BTreeSet;

/// Maximum number of keywords attached to one page
pub const MAX_KEYWORDS: usize = 10;

/// Number of leading paragraphs scanned for keywords
const PARAGRAPHS_SCANNED: usize = 3;

/// Subject and programme vocabulary, in match priority order
const VOCABULARY: &[&str] = &[
    "computer science",
    "engineering",
    "mathematics",
    "physics",
    "chemistry",
    "biology",
    "medicine",
    "nursing",
    "psychology",
    "economics",
    "business",
    "management",
    "accounting",
    "finance",
    "marketing",
    "history",
    "philosophy",
    "literature",
    "languages",
    "music",
    "design",
    "architecture",
    "sociology",
    "politics",
    "education",
    "veterinary",
    "journalism",
    "data science",
    "artificial intelligence",
    "cyber security",
    "scholarship",
    "accommodation",
    "tuition fees",
    "placement",
    "student finance",
    "open day",
    "campus",
    "international",
];

/// Collects vocabulary terms found in the title, headings and first paragraphs
///
/// Terms are taken in vocabulary order and capped at [`MAX_KEYWORDS`].
pub fn extract_keywords(title: &str, headings: &[String], paragraphs: &[String]) -> BTreeSet<String> {
    let mut text = title.to_lowercase();
    for part in headings.iter().chain(paragraphs.iter().take(PARAGRAPHS_SCANNED)) {
        text.push(' ');
        text.push_str(&part.to_lowercase());
    }

    VOCABULARY
        .iter()
        .filter(|term| text.contains(*term))
        .take(MAX_KEYWORDS)
        .map(|term| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_title_and_headings() {
        let keywords = extract_keywords(
            "BSc Computer Science",
            &["Placement year".to_string(), "Tuition fees".to_string()],
            &[],
        );

        assert!(keywords.contains("computer science"));
        assert!(keywords.contains("placement"));
        assert!(keywords.contains("tuition fees"));
        assert_eq!(keywords.len(), 3);
    }

    #[test]
    fn test_only_first_three_paragraphs_scanned() {
        let paragraphs: Vec<String> = ["intro", "more", "still more", "music and physics"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let keywords = extract_keywords("Welcome", &[], &paragraphs);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_capped_and_from_vocabulary() {
        let everything = VOCABULARY.join(" ");
        let keywords = extract_keywords(&everything, &[], &[]);

        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert!(keywords.iter().all(|k| VOCABULARY.contains(&k.as_str())));
        assert!(keywords.contains("computer science"));
    }

    #[test]
    fn test_no_matches() {
        assert!(extract_keywords("Contact us", &["Find us".to_string()], &[]).is_empty());
    }
}
