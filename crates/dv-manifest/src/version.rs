//! Version labels: recognition, ordering and classification.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Directory names treated as version roots (`2.4`, `v3`, `1.0.12`).
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v?\d+(\.\d+)*$").unwrap());

/// Whether a directory name looks like a version label.
pub fn is_version_label(name: &str) -> bool {
    VERSION_RE.is_match(name)
}

/// How a version relates to the entity's stable version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionStatus {
    /// The stable version, or the only version there is.
    Current,
    /// Older than the stable version.
    Outdated,
    /// Newer than the stable version (pre-release documentation).
    Future,
}

impl VersionStatus {
    /// Whether readers should be warned about this version.
    pub fn needs_warning(self) -> bool {
        self != Self::Current
    }
}

/// One dot-separated part of a version label.
///
/// Variant order matters: numeric parts sort before textual ones.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Numeric(u64),
    Text(&'a str),
}

impl<'a> Segment<'a> {
    fn parse(part: &'a str) -> Self {
        part.parse().map_or(Self::Text(part), Self::Numeric)
    }
}

/// Compare two version labels.
///
/// Parts are compared left to right: numbers numerically, missing parts as
/// `0`, numbers before words, words lexicographically. A leading `v` is
/// ignored, so `v2.10` sorts after `2.9`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = a.strip_prefix('v').unwrap_or(a);
    let b = b.strip_prefix('v').unwrap_or(b);

    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(l), None) => Segment::parse(l).cmp(&Segment::Numeric(0)),
            (None, Some(r)) => Segment::Numeric(0).cmp(&Segment::parse(r)),
            (Some(l), Some(r)) => Segment::parse(l).cmp(&Segment::parse(r)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

/// Sort labels oldest first. Labels comparing equal (`2.0`, `v2`) keep a
/// deterministic order by their text.
pub fn sort_versions(labels: &mut [String]) {
    labels.sort_by(|a, b| compare_versions(a, b).then_with(|| a.cmp(b)));
}

/// The newest label, if any.
pub fn latest_version<'a>(labels: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    labels
        .into_iter()
        .max_by(|a, b| compare_versions(a, b).then_with(|| a.cmp(b)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_is_version_label() {
        assert!(is_version_label("2.4"));
        assert!(is_version_label("v3"));
        assert!(is_version_label("1.0.12"));
        assert!(!is_version_label("master"));
        assert!(!is_version_label("2.x"));
        assert!(!is_version_label("v"));
        assert!(!is_version_label("2."));
    }

    #[test]
    fn test_compare_versions_numeric() {
        assert_eq!(compare_versions("2.10", "2.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.3", "2.4"), Ordering::Less);
        assert_eq!(compare_versions("3.0", "2.4"), Ordering::Greater);
        assert_eq!(compare_versions("10", "9"), Ordering::Greater);
    }

    #[test]
    fn test_compare_versions_missing_parts_are_zero() {
        assert_eq!(compare_versions("2", "2.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.0.0", "2"), Ordering::Equal);
        assert_eq!(compare_versions("2.0.1", "2"), Ordering::Greater);
    }

    #[test]
    fn test_compare_versions_leading_v() {
        assert_eq!(compare_versions("v2.10", "2.9"), Ordering::Greater);
        assert_eq!(compare_versions("v1.0", "1.0"), Ordering::Equal);
    }

    #[test]
    fn test_compare_versions_words_after_numbers() {
        assert_eq!(compare_versions("master", "4.0"), Ordering::Greater);
        assert_eq!(compare_versions("2.0.rc1", "2.0.1"), Ordering::Greater);
        assert_eq!(compare_versions("alpha", "beta"), Ordering::Less);
    }

    #[test]
    fn test_sort_versions() {
        let mut labels: Vec<String> = ["3.0", "2.10", "master", "2.4", "v2", "2.0"]
            .into_iter()
            .map(str::to_owned)
            .collect();

        sort_versions(&mut labels);

        assert_eq!(labels, vec!["2.0", "v2", "2.4", "2.10", "3.0", "master"]);
    }

    #[test]
    fn test_latest_version() {
        assert_eq!(latest_version(["2.3", "3.0", "2.4"]), Some("3.0"));
        assert_eq!(latest_version(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_needs_warning() {
        assert!(!VersionStatus::Current.needs_warning());
        assert!(VersionStatus::Outdated.needs_warning());
        assert!(VersionStatus::Future.needs_warning());
    }
}
