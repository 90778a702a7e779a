//! Front-matter splitting and parsing for `index.md` files.

use std::collections::HashMap;

/// Split a raw post file into its front-matter and body segments.
///
/// The file format is three `---`-delimited segments: everything before the
/// first delimiter (ignored), the raw front-matter lines, and the Markdown
/// body. Returns `None` when the split yields fewer than three segments.
pub fn split_post(raw: &str) -> Option<(&str, &str)> {
    let mut segments = raw.splitn(3, "---");
    let _leading = segments.next()?;
    let meta = segments.next()?;
    let body = segments.next()?;
    Some((meta, body))
}

/// Parse front-matter lines into a key/value map.
///
/// Each line is split at its first colon; double quotes are stripped from
/// the value and both sides are trimmed. Lines without a colon or with an
/// empty key are skipped.
pub fn parse_front_matter(raw: &str) -> HashMap<String, String> {
    let mut data = HashMap::new();
    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.replace('"', "");
        data.insert(key.to_string(), value.trim().to_string());
    }
    data
}
