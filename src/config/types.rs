use serde::Deserialize;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed URLs (the seed is depth 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of links followed from a single page; absent means unbounded
    #[serde(rename = "max-links-per-page", default)]
    pub max_links_per_page: Option<usize>,

    /// Timeout applied to every page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Number of seeds crawled at the same time
    #[serde(rename = "max-concurrent-seeds", default = "default_concurrent_seeds")]
    pub max_concurrent_seeds: usize,

    /// Emit a progress line every this many fetches
    #[serde(rename = "progress-interval", default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_concurrent_seeds() -> usize {
    4
}

fn default_progress_interval() -> usize {
    10
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
///
/// Every field is optional; each one that is set enables the matching sink or report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one text file per content-rich page
    #[serde(rename = "pages-dir")]
    pub pages_dir: Option<String>,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// A seed URL and the host patterns its crawl may stay within
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    /// Starting URL
    pub url: String,

    /// Domain patterns (e.g., "example.com" or "*.example.com"); empty derives one from the seed
    #[serde(default)]
    pub scope: Vec<String>,
}
