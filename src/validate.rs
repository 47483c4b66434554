//! Pre-parse validation: rejects titles that are known junk before any
//! pattern matching runs.
//!
//! The junk tables below are curated data, not logic - extend them as new
//! placeholder naming schemes show up in the wild.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::normalize::remove_file_extension;

// ============================================================================
// Junk Tables
// ============================================================================

/// Hash-like and placeholder release names that carry no usable metadata.
/// Applied to the title with its file extension removed.
pub static REJECT_HASHED_RELEASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // md5-length mixed-case token at the start
        Regex::new(r"^[0-9a-zA-Z]{32}").unwrap(),
        // shorter all-lowercase hash spanning the whole name
        Regex::new(r"^[a-z0-9]{24}$").unwrap(),
        // fixed-width letter+digit obfuscation, kept strict since it sits
        // close to legitimate numbering schemes
        Regex::new(r"^[A-Z]{11}\d{3}$").unwrap(),
        Regex::new(r"^[a-z]{12}\d{3}$").unwrap(),
        // automated backup dumps
        Regex::new(r"^Backup_\d{5,}S\d{2}-\d{2}$").unwrap(),
        // literal placeholder names seen as release titles
        Regex::new(r"^123$").unwrap(),
        Regex::new(r"(?i)^abc$").unwrap(),
        Regex::new(r"(?i)^b00bs$").unwrap(),
    ]
});

// ============================================================================
// Validation
// ============================================================================

/// Returns `false` for titles that should never reach the pattern cascade.
///
/// The password+yenc combination marks intentionally obfuscated junk and is
/// rejected silently; every other rejection is logged at debug level.
pub fn validate_before_parsing(title: &str) -> bool {
    let lower = title.to_lowercase();
    if lower.contains("password") && lower.contains("yenc") {
        return false;
    }

    if !title.chars().any(char::is_alphanumeric) {
        debug!("rejected release title without alphanumeric characters: {title}");
        return false;
    }

    let title_without_extension = remove_file_extension(title);

    if REJECT_HASHED_RELEASES
        .iter()
        .any(|re| re.is_match(&title_without_extension))
    {
        debug!("rejected hashed release title: {title}");
        return false;
    }

    true
}

// ============================================================================
// TESTS
// ============================================================================
