//! The ordered extraction-pattern tables for track- and album-style
//! release titles.
//!
//! Rules are tried strictly in list order and the first one that matches
//! wins, so the tables run from the most constrained conventions down to
//! the loosest ones - a specific convention must never be shadowed by a
//! lax rule that happens to match it too. Capture slots are looked up by
//! name; a rule only defines the slots its convention carries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Track-style titles. These conventions are loose by nature (file names
/// inside an album folder rarely carry more than a number, an artist, and
/// a track name), so the table is short and mostly overlapping.
pub static TRACK_TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Track with artist (01 - artist - trackName)
        Regex::new(r"(?i)(?P<track_number>\d*)?(?:[-| ]{0,1})(?P<artist>[a-zA-Z0-9, ().&_]*)[-| ]{0,1}(?P<track_name>[a-zA-Z0-9, ().&_]+)").unwrap(),
        // Track without artist (01 - trackName)
        Regex::new(r"(?i)(?P<track_number>\d*)[-| .]{0,1}(?P<track_name>[a-zA-Z0-9, ().&_]+)").unwrap(),
        // Track without trackNumber or artist (trackName)
        Regex::new(r"(?i)(?P<track_number>\d*)[-| .]{0,1}(?P<track_name>[a-zA-Z0-9, ().&_]+)").unwrap(),
        // Track without trackNumber, with artist (artist - trackName)
        Regex::new(r"(?i)(?P<track_number>\d*)[-| .]{0,1}(?P<track_name>[a-zA-Z0-9, ().&_]+)").unwrap(),
        // Track with artist and starting title (01 - artist - trackName)
        Regex::new(r"(?i)(?P<track_number>\d*)?[-| ]{0,1}(?P<artist>[a-zA-Z0-9, ().&_]*)[-| ]{0,1}(?P<track_name>[a-zA-Z0-9, ().&_]+)").unwrap(),
    ]
});

/// Album-style release titles, most specific first: discography bundles
/// with explicit year ranges, then tracker conventions carrying a version
/// and source, down to a bare `Artist - Album Year`.
pub static ALBUM_TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // (Genre) [Source]? Artist - Discography with two years
        Regex::new(r"(?i)^(?:\(.+?\))(?:\W*(?:\[(?P<source>.+?)\]))?\W*(?P<artist>.+?)(?: - )(?P<discography>Discography|Discografia).+?(?P<start_year>\d{4}).+?(?P<end_year>\d{4})").unwrap(),
        // Artist - Discography with two years
        Regex::new(r"(?i)^(?P<artist>.+?)(?: - )(?:.+?)?(?P<discography>Discography|Discografia).+?(?P<start_year>\d{4}).+?(?P<end_year>\d{4})").unwrap(),
        // Artist - Discography with end year
        Regex::new(r"(?i)^(?P<artist>.+?)(?: - )(?:.+?)?(?P<discography>Discography|Discografia).+?(?P<end_year>\d{4})").unwrap(),
        // Artist Discography with two years
        Regex::new(r"(?i)^(?P<artist>.+?)\W*(?P<discography>Discography|Discografia).+?(?P<start_year>\d{4}).+?(?P<end_year>\d{4})").unwrap(),
        // Artist Discography with end year
        Regex::new(r"(?i)^(?P<artist>.+?)\W*(?P<discography>Discography|Discografia).+?(?P<end_year>\d{4})").unwrap(),
        // Artist Discography
        Regex::new(r"(?i)^(?P<artist>.+?)\W*(?P<discography>Discography|Discografia)").unwrap(),
        // (Genre) [Source]? Artist - Album - Year
        Regex::new(r"(?i)^(?:\(.+?\))(?:\W*(?:\[(?P<source>.+?)\]))?\W*(?P<artist>.+?)(?: - )(?P<album>.+?)(?: - )(?P<release_year>\d{4})").unwrap(),
        // Artist-Album-Version-Source-Year
        // e.g. Imagine Dragons-Smoke And Mirrors-Deluxe Edition-2CD-FLAC-2015-JLM
        Regex::new(r"(?i)^(?P<artist>.+?)[-](?P<album>.+?)[-](?:[\(|\[]?)(?P<version>.+?(?:Edition)?)(?:[\)|\]]?)[-](?P<source>\d?CD|WEB).+?(?P<release_year>\d{4})").unwrap(),
        // Artist-Album-Source-Year
        // e.g. Dani_Sbert-Togheter-WEB-2017-FURY
        Regex::new(r"(?i)^(?P<artist>.+?)[-](?P<album>.+?)[-](?P<source>\d?CD|WEB).+?(?P<release_year>\d{4})").unwrap(),
        // Artist - Album (Year) strict
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?: - )+)(?P<album>.+?)\W*(?:\(|\[).+?(?P<release_year>\d{4})").unwrap(),
        // Artist - Album (Year)
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?: - )+)(?P<album>.+?)\W*(?:\(|\[)(?P<release_year>\d{4})").unwrap(),
        // Artist - Album - Year [something]
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?: - )+)(?P<album>.+?)\W*(?: - )(?P<release_year>\d{4})\W*(?:\(|\[)").unwrap(),
        // Artist - Album [something] or Artist - Album (something)
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?: - )+)(?P<album>.+?)\W*(?:\(|\[)").unwrap(),
        // Artist - Album Year
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?: - )+)(?P<album>.+?)\W*(?P<release_year>\d{4})").unwrap(),
        // Artist-Album (Year) strict, hyphen with no space between artist and album
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-)+)(?P<album>.+?)\W*(?:\(|\[).+?(?P<release_year>\d{4})").unwrap(),
        // Artist-Album (Year), hyphen with no space
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-)+)(?P<album>.+?)\W*(?:\(|\[)(?P<release_year>\d{4})").unwrap(),
        // Artist-Album [something] or Artist-Album (something), hyphen with no space
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-)+)(?P<album>.+?)\W*(?:\(|\[)").unwrap(),
        // Artist-Album-something-Year
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-)+)(?P<album>.+?)(?:-.+?)(?P<release_year>\d{4})").unwrap(),
        // Artist-Album Year, hyphen with no space
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-)+)(?:(?P<album>.+?)(?:-)+)(?P<release_year>\d{4})").unwrap(),
        // Artist - Year - Album
        Regex::new(r"(?i)^(?:(?P<artist>.+?)(?:-))(?P<release_year>\d{4})(?:-)(?P<album>[^-]+)").unwrap(),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile_and_keep_order() {
        // table construction compiles every pattern; the first album rule
        // must stay the most constrained discography convention
        assert_eq!(TRACK_TITLE_PATTERNS.len(), 5);
        assert_eq!(ALBUM_TITLE_PATTERNS.len(), 20);
        assert!(ALBUM_TITLE_PATTERNS[0].as_str().contains("start_year"));
        assert!(ALBUM_TITLE_PATTERNS[19].as_str().starts_with("(?i)^(?:(?P<artist>"));
    }
}
