/// Replace every run of whitespace with a single space and trim both ends.
///
/// Empty or all-whitespace input collapses to an empty string.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
