//! Pre-cascade normalization of release titles.
//!
//! Applied in order before any extraction pattern runs: reversed-title
//! repair, extension stripping, quality-noise stripping, website/tracker
//! prefix and suffix cleanup, and air-date canonicalization. All functions
//! here are pure; nothing is cached between calls.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Trailing `.xxx`-style suffix candidate. Only stripped when the suffix is
/// a known media extension, so numeric-looking album suffixes survive.
static FILE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.[a-z0-9]{2,4}$").unwrap());

/// Episode/season-code fragments that only occur in character-reversed
/// titles ("720p" shows up as "p027", "S01E02" as "20E10S").
static REVERSED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-._ ](p027|p0801|\d{2}E\d{2}S)[-._ ]").unwrap());

/// Resolution/codec/bit-depth noise that pollutes artist and album capture
/// groups: "1080p", "x264", "DD5.1", pixel dimensions, "10bit".
static QUALITY_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:(?:480|720|1080|2160|320)[ip]|[xh][\W_]?26[45]|DD\W?5\W1|[<>*:|]|848x480|1280x720|1920x1080|3840x2160|4096x2160|(?:8|10)b(?:it)?)\s*",
    )
    .unwrap()
});

/// Leading bracketed-website or `www.<host>.<tld>` prefix.
pub static WEBSITE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[\s*[a-z]+(?:\.[a-z]+)+\s*\][- ]*|^www\.[a-z]+\.(?:com|net)[ -]*").unwrap()
});

/// Trailing bracketed tracker tag.
static TORRENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(?:ettv|rartv|rarbg|cttv)\]$").unwrap());

/// 4-digit-year air date in either year-first or month-day-first order.
/// Digit boundaries are enforced in code since the candidates sit inside
/// free text.
static AIR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?P<y1>\d{4})[_.-](?P<m1>[0-1][0-9])[_.-](?P<d1>[0-3][0-9])|(?P<m2>[0-1][0-9])[_.-](?P<d2>[0-3][0-9])[_.-](?P<y2>\d{4}))",
    )
    .unwrap()
});

/// Compact 6-digit air date (2-digit year + month + day); must be bounded
/// by `_`, `.`, or `-` on both sides.
static SIX_DIGIT_AIR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<airdate>(?P<airyear>[1-9]\d)(?P<airmonth>[0-1][0-9])(?P<airday>[0-3][0-9]))")
        .unwrap()
});

/// Known media/container extensions, with the leading dot, lowercase.
pub static MEDIA_EXTENSIONS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        ".mp3", ".mp2", ".m4a", ".m4b", ".m4p", ".flac", ".ape", ".wav", ".wma", ".ogg", ".oga",
        ".opus", ".aac", ".aif", ".aiff", ".mka", ".mpc", ".wv", ".tak", ".tta", ".shn", ".dsf",
        ".dff", ".ac3", ".dts", ".ra",
    ]
    .into_iter()
    .collect()
});

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// Strip a trailing file extension, but only if it is a known media
/// extension (or a `.par2`/`.nzb` wrapper). Idempotent.
pub fn remove_file_extension(title: &str) -> String {
    if let Some(m) = FILE_EXTENSION.find(title) {
        let ext = m.as_str().to_lowercase();
        if MEDIA_EXTENSIONS.contains(ext.as_str()) || ext == ".par2" || ext == ".nzb" {
            return title[..m.start()].to_string();
        }
    }
    title.to_string()
}

/// Detect a character-reversed title and repair it: the extension-stripped
/// portion is reversed, the original trailing extension region re-appended.
/// Returns `None` when the title shows no reversal marker.
pub fn repair_reversed(title: &str) -> Option<String> {
    if !REVERSED_TITLE.is_match(title) {
        return None;
    }
    let stripped = remove_file_extension(title);
    let reversed: String = stripped.chars().rev().collect();
    Some(format!("{}{}", reversed, &title[stripped.len()..]))
}

/// Canonicalize an embedded air date to `yyyy.mm.dd`, preserving the text
/// before it. A compact 6-digit date is expanded to `20yy.mm.dd` unless
/// month and day are both zero.
pub fn canonicalize_air_dates(title: &str) -> String {
    let mut result = title.to_string();

    let bytes = title.as_bytes();
    for caps in AIR_DATE.captures_iter(title) {
        let whole = caps.get(0).unwrap();
        if whole.start() > 0 && bytes[whole.start() - 1].is_ascii_digit() {
            continue;
        }
        if whole.end() < bytes.len() && bytes[whole.end()].is_ascii_digit() {
            continue;
        }
        let (year, month, day) = match caps.name("y1") {
            Some(y) => (y.as_str(), &caps["m1"], &caps["d1"]),
            None => (caps.name("y2").unwrap().as_str(), &caps["m2"], &caps["d2"]),
        };
        result = format!("{}{year}.{month}.{day}", &title[..whole.start()]);
        break;
    }

    let with_date = result.clone();
    let bytes = with_date.as_bytes();
    let is_delim = |b: u8| matches!(b, b'_' | b'.' | b'-');
    for caps in SIX_DIGIT_AIR_DATE.captures_iter(&with_date) {
        let m = caps.name("airdate").unwrap();
        if m.start() == 0 || !is_delim(bytes[m.start() - 1]) {
            continue;
        }
        if m.end() >= bytes.len() || !is_delim(bytes[m.end()]) {
            continue;
        }
        let (month, day) = (&caps["airmonth"], &caps["airday"]);
        if month == "00" && day == "00" {
            continue;
        }
        let fixed = format!("20{}.{month}.{day}", &caps["airyear"]);
        result = with_date.replace(m.as_str(), &fixed);
        break;
    }

    result
}

/// Quality-noise stripping, prefix/suffix cleanup, and air-date
/// canonicalization for a title that already had its extension removed.
pub fn simplify_release_title(title: &str) -> String {
    let simple = QUALITY_NOISE.replace_all(title, "");
    let simple = WEBSITE_PREFIX.replace(&simple, "");
    let simple = TORRENT_SUFFIX.replace(&simple, "");
    canonicalize_air_dates(&simple)
}

/// Full normalization pipeline: reversal repair, extension strip, then
/// [`simplify_release_title`].
pub fn normalize(title: &str) -> String {
    let repaired = repair_reversed(title).unwrap_or_else(|| title.to_string());
    simplify_release_title(&remove_file_extension(&repaired))
}

// ============================================================================
// TESTS
// ============================================================================
