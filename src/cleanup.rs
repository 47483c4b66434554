//! Standalone string utilities: folding names and titles for downstream
//! catalog matching, and generic cleanup helpers (bracket removal, tag
//! removal, dash truncation).
//!
//! Everything here is pure and stateless; the functions are used both
//! inside the parsing pipeline and directly by callers.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Articles and connectives dropped when folding an artist name. Leading
/// occurrences are kept ("The Beatles" folds to "thebeatles", not
/// "beatles"); a trailing "a" is kept as well.
static ARTICLE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:a|an|the|and|or|of)\b").unwrap());

/// Non-word characters collapsed out of a folded artist name.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

/// Delimiters folded to a single space when normalizing a title.
static WORD_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s.,_=|-]+").unwrap());

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static COMMON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:a|an|the|and|or|of)\b\s?").unwrap());

/// Marker words removed from a track title before matching.
static SPECIAL_MARKER_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:part|special|edition|christmas)\b\s?").unwrap());

static DUPLICATE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Credit and qualifier tags stripped from track/album titles:
/// "feat."-style credit spans, and bracketed edition/version qualifiers.
static COMMON_TAGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:\[|\()*\b(?:(?:featuring|feat.|feat|ft|ft.)\s)\s*.*(?:\]|\))*").unwrap(),
        Regex::new(r"(?i)(?:\(|\[)(?:[^\(\[]*)(?:version|limited|deluxe|single|clean|album|special|bonus|promo|remastered)(?:[^\)\]]*)(?:\)|\])").unwrap(),
    ]
});

static BRACKETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\(.*\)").unwrap(),
        Regex::new(r"\[.*\]").unwrap(),
    ]
});

static AFTER_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-:].*").unwrap());

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Strip diacritics via NFKD decomposition: "Beyoncé" keeps its letters,
/// loses its accents.
fn remove_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

// ============================================================================
// FOLDING FUNCTIONS
// ============================================================================

/// Fold an artist name for catalog matching: drop mid-string articles,
/// collapse every non-word character, lowercase, strip accents. A purely
/// numeric name is returned untouched.
pub fn clean_artist_name(name: &str) -> String {
    if name.parse::<i64>().is_ok() {
        return name.to_string();
    }

    let spaced = name.replace('_', " ");
    let mut folded = String::with_capacity(spaced.len());
    let mut last = 0;
    for m in ARTICLE_WORD.find_iter(&spaced) {
        let leading = m.start() == 0;
        let trailing_a = m.as_str().eq_ignore_ascii_case("a") && m.end() == spaced.len();
        if leading || trailing_a {
            continue;
        }
        folded.push_str(&spaced[last..m.start()]);
        last = m.end();
    }
    folded.push_str(&spaced[last..]);

    let folded = NON_WORD.replace_all(&folded, "");
    remove_accents(&folded.to_lowercase())
}

/// Fold a title for matching: delimiters to spaces, punctuation dropped,
/// common words dropped, whitespace collapsed, lowercased.
pub fn normalize_title(title: &str) -> String {
    let t = WORD_DELIMITER.replace_all(title, " ");
    let t = PUNCTUATION.replace_all(&t, "");
    let t = COMMON_WORD.replace_all(&t, "");
    let t = DUPLICATE_SPACES.replace_all(&t, " ");
    t.trim().to_lowercase()
}

/// Fold a track title for matching: marker words dropped, punctuation
/// collapsed to spaces, whitespace collapsed, lowercased.
pub fn normalize_track_title(title: &str) -> String {
    let t = SPECIAL_MARKER_WORD.replace_all(title, "");
    let t = PUNCTUATION.replace_all(&t, " ");
    let t = DUPLICATE_SPACES.replace_all(&t, " ");
    t.trim().to_lowercase()
}

// ============================================================================
// CLEANUP FUNCTIONS
// ============================================================================

/// Strip bracketed edition/version qualifiers from an album title.
pub fn clean_album_title(album: &str) -> String {
    COMMON_TAGS[1].replace_all(album, "").trim().to_string()
}

/// Strip featuring credits and bracketed qualifiers from a track title.
pub fn clean_track_title(title: &str) -> String {
    let mut intermediate = title.to_string();
    for re in COMMON_TAGS.iter() {
        intermediate = re.replace_all(&intermediate, "").trim().to_string();
    }
    intermediate
}

/// Remove bracketed and parenthesized spans entirely.
pub fn remove_brackets_and_contents(text: &str) -> String {
    let mut intermediate = text.to_string();
    for re in BRACKETS.iter() {
        intermediate = re.replace_all(&intermediate, "").trim().to_string();
    }
    intermediate
}

/// Truncate at the first dash or colon.
pub fn remove_after_dash(text: &str) -> String {
    AFTER_DASH.replace(text, "").trim().to_string()
}

// ============================================================================
// TESTS
// ============================================================================
