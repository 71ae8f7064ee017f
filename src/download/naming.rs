//! Detection of filenames the download service replaced with generated names

use regex::Regex;
use std::sync::LazyLock;

/// Suffix the service falls back to for some images when it loses the name
const AUXILIARY_SUFFIX: &str = "jfif";

/// 8-4-4-4-12 hex groups. Unanchored, the name sits in the middle of a path.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("Invalid regex pattern")
});

/// Whether `path` looks like the service substituted an opaque name.
///
/// A legitimate UUID-shaped name is indistinguishable and also matches.
///
/// ```
/// use fanrelay::download::naming::is_opaque_renamed;
///
/// assert!(is_opaque_renamed("/dl/a1b2c3d4-e5f6-47a8-89ab-cdef01234567"));
/// assert!(is_opaque_renamed("photo.jfif"));
/// assert!(!is_opaque_renamed("photo.jpg"));
/// ```
pub fn is_opaque_renamed(path: &str) -> bool {
    path.ends_with(AUXILIARY_SUFFIX) || UUID_PATTERN.is_match(path)
}
