//! Image tag comparison.
//!
//! A rollout may ask for a release candidate (`1.2.0-rc.3`) to be promoted while the registry already reports
//! the final release (`1.2.0`). Only the expected side is normalized; an observed release candidate never
//! matches an expected release.

const RC_MARKER: &str = "-rc.";

/// Returns `tag` without a trailing `-rc.<digits>` segment, or `None` if it has none.
pub fn strip_rc_suffix(tag: &str) -> Option<&str> {
    let idx = tag.rfind(RC_MARKER)?;
    let digits = &tag[idx + RC_MARKER.len()..];

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(&tag[..idx])
    } else {
        None
    }
}

/// Check whether an observed registry tag satisfies the expected rollout tag.
///
/// Tags match when they are identical, or when `observed` carries no release-candidate suffix and equals
/// `expected` with its `-rc.<digits>` suffix removed.
pub fn tag_matches(observed: &str, expected: &str) -> bool {
    if observed == expected {
        return true;
    }
    if strip_rc_suffix(observed).is_some() {
        return false;
    }
    strip_rc_suffix(expected).is_some_and(|base| base == observed)
}
