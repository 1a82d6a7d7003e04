use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::StateFile;

static LEADING_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d").expect("leading digit pattern is valid"));

/// Directory segments starting with a decimal digit, deduplicated and sorted
/// as strings (`"10-net"` sorts before `"2-app"`).
///
/// NOTE: The result is informational. Blob names are derived from the full
/// relative directory, not from this list.
pub fn numeric_directories(files: &[StateFile]) -> Vec<String> {
    let mut found = BTreeSet::new();

    for file in files {
        // Segments that are not valid UTF-8 cannot be named in the report.
        for segment in file.directory_components().filter_map(|s| s.to_str()) {
            if LEADING_DIGIT.is_match(segment) && found.insert(segment.to_string()) {
                tracing::debug!(directory = %segment, "numeric directory found");
            }
        }
    }

    found.into_iter().collect()
}
