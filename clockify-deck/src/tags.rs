//! The configured tag filter is one string of comma separated names; a
//! literal comma inside a name is escaped as `\,`.

use itertools::Itertools;

/// Split a tag filter string into names: unescaped commas separate, segments
/// are trimmed, empty segments are dropped, escapes are restored.
pub fn parse_tag_filter(input: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                chars.next();
                current.push(',');
            }
            ',' => flush_segment(&mut names, &mut current),
            _ => current.push(c),
        }
    }
    flush_segment(&mut names, &mut current);

    names
}

/// Join names back into a filter string, escaping literal commas.
pub fn serialize_tag_filter(names: &[String]) -> String {
    names.iter().map(|name| name.replace(',', "\\,")).join(", ")
}

fn flush_segment(names: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        names.push(trimmed.to_string());
    }
    current.clear();
}
