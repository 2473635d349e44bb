// Customer visibility rules for carwash rows.
//
// The `status` column is free text and has accumulated years of
// inconsistent values ("Açık", "Kapalı", "open", "active", "1", NULL...).
// The `is_active` flag is settable independently of the text. These rules
// reconcile the two into a single visible/hidden decision.

/// Canonical stored value for an open carwash.
pub const STATUS_OPEN: &str = "Açık";

/// Canonical stored value for a closed carwash.
pub const STATUS_CLOSED: &str = "Kapalı";

// Legacy tokens still found in production rows, in normalized form
// (see normalize_status). The two sets are disjoint.
const OPEN_TOKENS: [&str; 5] = ["açik", "acik", "open", "active", "1"];
const CLOSED_TOKENS: [&str; 4] = ["kapali", "closed", "inactive", "0"];

/// What a status token says about the carwash, before the `is_active`
/// flag is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Open,
    Closed,
    Unknown,
}

impl StatusKind {
    /// Display label for listing pages.
    pub fn label(&self) -> &'static str {
        match self {
            StatusKind::Open => STATUS_OPEN,
            StatusKind::Closed => STATUS_CLOSED,
            StatusKind::Unknown => "?",
        }
    }
}

/// Lower-cases a status token and folds the Turkish dotless ı to i so
/// that "AÇIK", "Açık" and "açık" compare equal. Lower-casing 'İ' leaves
/// a combining dot behind, which is stripped for the same reason.
/// NULL and empty both normalize to the empty string.
pub fn normalize_status(status: Option<&str>) -> String {
    status
        .unwrap_or("")
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'ı' => Some('i'),
            '\u{0307}' => None,
            c => Some(c),
        })
        .collect()
}

/// Classify a raw status token as open-like, closed-like or unknown.
pub fn classify_status(status: Option<&str>) -> StatusKind {
    let normalized = normalize_status(status);
    if CLOSED_TOKENS.contains(&normalized.as_str()) {
        StatusKind::Closed
    } else if OPEN_TOKENS.contains(&normalized.as_str()) {
        StatusKind::Open
    } else {
        StatusKind::Unknown
    }
}

/// Whether a carwash row appears in the customer listing.
///
/// An explicit closed status hides the row even when `is_active` is set,
/// and an explicit open status shows it even when the flag is 0. Any
/// other token defers to the flag. A NULL flag counts as 0.
pub fn is_carwash_visible(status: Option<&str>, is_active: Option<i64>) -> bool {
    match classify_status(status) {
        StatusKind::Closed => false,
        StatusKind::Open => true,
        StatusKind::Unknown => is_active.unwrap_or(0) == 1,
    }
}

/// Map an incoming toggle token to the canonical stored
/// (status, is_active) pair. Unrecognized tokens are rejected so that
/// writes stay canonical; reads remain tolerant of historical values.
pub fn canonical_status(token: &str) -> Option<(&'static str, i64)> {
    match classify_status(Some(token)) {
        StatusKind::Open => Some((STATUS_OPEN, 1)),
        StatusKind::Closed => Some((STATUS_CLOSED, 0)),
        StatusKind::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tokens_visible_for_any_flag() {
        for status in ["Açık", "açık", "acik", "open", "active", "1"] {
            for flag in [Some(0), Some(1), None] {
                assert!(
                    is_carwash_visible(Some(status), flag),
                    "status '{}' with is_active {:?} should be visible",
                    status,
                    flag
                );
            }
        }
    }

    #[test]
    fn test_closed_tokens_hidden_for_any_flag() {
        for status in ["Kapalı", "kapalı", "kapali", "closed", "inactive", "0"] {
            for flag in [Some(0), Some(1), None] {
                assert!(
                    !is_carwash_visible(Some(status), flag),
                    "status '{}' with is_active {:?} should be hidden",
                    status,
                    flag
                );
            }
        }
    }

    #[test]
    fn test_unknown_status_defers_to_flag() {
        for status in [Some("pending"), Some(""), Some("   "), None] {
            assert!(is_carwash_visible(status, Some(1)));
            assert!(!is_carwash_visible(status, Some(0)));
            assert!(!is_carwash_visible(status, None));
        }
    }

    #[test]
    fn test_case_insensitive_turkish_tokens() {
        // All spellings of the canonical open token must classify alike,
        // including the all-caps form with the dotted capital I.
        for status in ["AÇIK", "açık", "Açık", "AÇIK ", " açık"] {
            assert_eq!(classify_status(Some(status)), StatusKind::Open, "{}", status);
        }
        for status in ["KAPALI", "Kapalı", "kapali", "KAPALİ"] {
            assert_eq!(classify_status(Some(status)), StatusKind::Closed, "{}", status);
        }
    }

    #[test]
    fn test_scenario_table() {
        // Open status overrides an inactive flag.
        assert!(is_carwash_visible(Some("Açık"), Some(0)));
        // Closed status overrides an active flag.
        assert!(!is_carwash_visible(Some("Kapalı"), Some(1)));
        // No status: the flag decides.
        assert!(is_carwash_visible(None, Some(1)));
        assert!(!is_carwash_visible(None, Some(0)));
        // Legacy english token.
        assert!(is_carwash_visible(Some("active"), Some(0)));
        // Unrecognized token falls through to the flag.
        assert!(is_carwash_visible(Some("pending"), Some(1)));
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status(Some("AÇIK")), "açik");
        assert_eq!(normalize_status(Some("Açık")), "açik");
        assert_eq!(normalize_status(Some("KAPALI")), "kapali");
        assert_eq!(normalize_status(Some("  Open ")), "open");
        assert_eq!(normalize_status(Some("")), "");
        assert_eq!(normalize_status(None), "");
    }

    #[test]
    fn test_canonical_status() {
        assert_eq!(canonical_status("open"), Some((STATUS_OPEN, 1)));
        assert_eq!(canonical_status("Açık"), Some((STATUS_OPEN, 1)));
        assert_eq!(canonical_status("closed"), Some((STATUS_CLOSED, 0)));
        assert_eq!(canonical_status("KAPALI"), Some((STATUS_CLOSED, 0)));
        assert_eq!(canonical_status("maybe"), None);
        assert_eq!(canonical_status(""), None);
    }
}
