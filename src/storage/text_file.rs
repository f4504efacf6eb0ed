//! Plain-text sink: one human-readable file per page

use crate::storage::traits::{PageSink, SaveOutcome};
use crate::storage::{richness_gate, PageRecord};
use crate::PersistenceError;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Longest filename stem derived from a URL
const MAX_STEM_CHARS: usize = 100;

/// Derives the on-disk filename for a URL
///
/// Drops the scheme, replaces every character that is not a word character, `-`, `_`
/// or `.` with `_`, caps the result at 100 characters and appends `.txt`.
///
/// # Example
///
/// ```
/// use gleaner::storage::filename_for_url;
///
/// assert_eq!(
///     filename_for_url("https://www.x.edu/open-days?year=2025"),
///     "www.x.edu_open-days_year_2025.txt"
/// );
/// ```
pub fn filename_for_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let stem: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();

    format!("{}.txt", stem)
}

/// Renders the file body for a record
pub fn render_page(record: &PageRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("URL: {}\n", record.url));
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!("Title: {}\n", record.title));
    out.push_str(&format!("Section: {}\n", record.section_title));
    out.push_str(&format!("Page type: {}\n", record.page_type));
    let keywords: Vec<&str> = record.keywords.iter().map(String::as_str).collect();
    out.push_str(&format!("Keywords: {}\n", keywords.join(", ")));
    out.push_str(&format!("Scraped at: {}\n\n", record.scraped_at.to_rfc3339()));

    if !record.headings.is_empty() {
        out.push_str("HEADINGS:\n");
        out.push_str(&"-".repeat(20));
        out.push('\n');
        for heading in &record.headings {
            out.push_str(&format!("• {}\n", heading));
        }
        out.push('\n');
    }

    if !record.paragraphs.is_empty() {
        out.push_str("PARAGRAPHS:\n");
        out.push_str(&"-".repeat(20));
        out.push('\n');
        for paragraph in record.paragraphs.iter().filter(|p| !p.trim().is_empty()) {
            out.push_str(&format!("{}\n\n", paragraph));
        }
    }

    out
}

/// Writes each record to `<dir>/<filename_for_url(url)>`
///
/// Keeps track of which URL owns each filename for the lifetime of the sink. A second
/// URL that maps to an already-claimed name gets the first 8 hex digits of its SHA-256
/// appended, so distinct pages never overwrite each other.
pub struct TextFileSink {
    dir: PathBuf,
    owners: Mutex<HashMap<String, String>>,
}

impl TextFileSink {
    /// Creates the sink, creating the output directory if needed
    pub fn new(dir: &Path) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            owners: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Picks the filename for `url`, claiming it in the ownership index
    fn claim_filename(&self, url: &str) -> String {
        let mut owners = self
            .owners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let base = filename_for_url(url);
        let name = match owners.get(&base) {
            Some(owner) if owner != url => {
                let digest = hex::encode(Sha256::digest(url.as_bytes()));
                let stem = base.trim_end_matches(".txt");
                format!("{}-{}.txt", stem, &digest[..8])
            }
            _ => base,
        };

        owners.entry(name.clone()).or_insert_with(|| url.to_string());
        name
    }

    /// Releases the filename owned by `url`, returning it if there was one
    fn release_filename(&self, url: &str) -> Option<String> {
        let mut owners = self
            .owners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let name = owners
            .iter()
            .find(|(_, owner)| owner.as_str() == url)
            .map(|(name, _)| name.clone())?;
        owners.remove(&name);
        Some(name)
    }
}

impl PageSink for TextFileSink {
    fn name(&self) -> &str {
        "text-file"
    }

    fn save(&self, record: &PageRecord) -> Result<SaveOutcome, PersistenceError> {
        if let Some(reason) = richness_gate(record) {
            return Ok(SaveOutcome::Skipped(reason));
        }

        let path = self.dir.join(self.claim_filename(&record.url));
        std::fs::write(&path, render_page(record))?;

        Ok(SaveOutcome::Written(path.display().to_string()))
    }

    fn discard(&self, url: &str) -> Result<(), PersistenceError> {
        let Some(name) = self.release_filename(url) else {
            return Ok(());
        };

        match std::fs::remove_file(self.dir.join(name)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
