//! Release-group resolution: the uploader/team tag conventionally appended
//! to a release title, plus the anime-style leading sub-group tag that
//! takes precedence over it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::{remove_file_extension, WEBSITE_PREFIX};

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Strips the leading delimiter-joined prefix run and any trailing junk
/// suffix tags before the group scan. The suffix list is curated data.
static CLEAN_RELEASE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:.*?[-._ ])|(?:-(?:RP|1|NZBGeek|Obfuscated|Scrambled|sample|Pre|postbot|xpost))+$")
        .unwrap()
});

/// Trailing `-<token>` release-group marker candidate.
static RELEASE_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-(?P<release_group>[a-z0-9]+)(?:\b|[-._ ])").unwrap());

/// Anime-style leading bracketed sub-group; the tag must not start or end
/// with whitespace.
static ANIME_SUB_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(?P<subgroup>\S(?:.*?\S)?)\]").unwrap());

/// Codec/source tokens that masquerade as a trailing group marker.
const CODEC_SUFFIXES: [&str; 4] = ["MP3", "ALAC", "FLAC", "WEB"];

// ============================================================================
// RESOLUTION
// ============================================================================

/// Extract the release group from a title, or `None` when no plausible
/// group marker is present.
///
/// A leading anime-style sub-group wins immediately. Otherwise the last
/// trailing `-<token>` candidate wins, with codec tokens excluded and
/// purely numeric candidates discarded (release groups are never bare
/// numbers).
pub fn resolve_release_group(title: &str) -> Option<String> {
    let title = remove_file_extension(title.trim());
    let title = WEBSITE_PREFIX.replace(&title, "");

    if let Some(caps) = ANIME_SUB_GROUP.captures(&title) {
        return Some(caps["subgroup"].to_string());
    }

    let cleaned = CLEAN_RELEASE_GROUP.replace_all(&title, "");

    let mut group: Option<&str> = None;
    for caps in RELEASE_GROUP.captures_iter(&cleaned) {
        let candidate = caps.name("release_group").unwrap().as_str();
        let upper = candidate.to_uppercase();
        if CODEC_SUFFIXES.iter().any(|codec| upper.ends_with(codec)) {
            continue;
        }
        group = Some(candidate);
    }

    let group = group?;
    if group.parse::<i32>().is_ok() {
        return None;
    }
    Some(group.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_group() {
        assert_eq!(
            resolve_release_group("Imagine Dragons-Smoke And Mirrors-Deluxe Edition-2CD-FLAC-2015-JLM")
                .as_deref(),
            Some("JLM")
        );
    }

    #[test]
    fn test_numeric_group_discarded() {
        assert_eq!(resolve_release_group("Artist-Album-2015-128"), None);
    }

    #[test]
    fn test_codec_tokens_excluded() {
        // a trailing codec token is not a group
        assert_eq!(resolve_release_group("Artist-Album-WEB"), None);
        // the last non-codec candidate wins
        assert_eq!(resolve_release_group("Artist-Album-GRP-FLAC"), Some("GRP".to_string()));
    }

    #[test]
    fn test_anime_sub_group_wins() {
        assert_eq!(
            resolve_release_group("[SubGroup] Artist - Album - GRP").as_deref(),
            Some("SubGroup")
        );
        // whitespace-padded tags are not sub-groups
        assert_eq!(resolve_release_group("[ padded ] Artist-Album-GRP").as_deref(), Some("GRP"));
    }

    #[test]
    fn test_junk_suffix_stripped() {
        assert_eq!(
            resolve_release_group("Artist-Album-2016-GRP-Obfuscated").as_deref(),
            Some("GRP")
        );
        assert_eq!(
            resolve_release_group("Artist-Album-2016-GRP-xpost").as_deref(),
            Some("GRP")
        );
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(resolve_release_group("Artist Name - Album Title (2016)"), None);
    }
}
