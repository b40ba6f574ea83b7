use std::path::PathBuf;

/// Turns a tree key into a relative path using the host separator.
///
/// Both `/` and `\` count as separators no matter which platform runs the
/// tests, so a fixture written once works everywhere. `.` segments are
/// dropped and `..` pops the previous segment; the result never climbs above
/// the directory it is joined onto.
pub fn normalize_key(key: &str) -> PathBuf {
    lazy_static::lazy_static! {
        static ref SEPARATOR_REGEX: regex::Regex =
            regex::Regex::new(r"[\\/]+").expect("a valid regex pattern");
    }

    let mut new_path = PathBuf::new();

    for segment in SEPARATOR_REGEX.split(key) {
        match segment {
            // Skip empty segments and the current-dir marker "."
            "" | "." => {}

            // For "..", pop the last segment if possible
            ".." => {
                new_path.pop();
            }

            other => new_path.push(other),
        }
    }

    new_path
}
