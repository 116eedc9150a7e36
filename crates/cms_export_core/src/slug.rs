use std::collections::HashSet;

use html_escape::decode_html_entities;

use crate::record::RecordId;

pub const DEFAULT_MAX_NAME_LEN: usize = 80;

/// Builds the base file name `"{id}. {title}"` for a record.
///
/// The title is entity-decoded, stripped of path-hostile characters, has its
/// whitespace runs folded to `_`, and is cut to `max_len` characters. The id
/// prefix keeps names unique per record and sorts files in table order.
pub fn sanitize_title(title: &str, id: RecordId, max_len: usize) -> String {
    let decoded = decode_html_entities(title);
    let stripped = strip_hostile(&decoded);
    let folded = fold_whitespace(&stripped);
    let mut body: String = folded.trim_matches('_').chars().take(max_len).collect();
    if body.is_empty() {
        body = "untitled".to_string();
    }
    format!("{id}. {body}")
}

/// Replaces every character that is unsafe in a file name with `_`.
pub fn strip_hostile(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_hostile(c) { '_' } else { c })
        .collect()
}

fn is_hostile(c: char) -> bool {
    matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|')
        || (c.is_control() && !c.is_whitespace())
}

fn fold_whitespace(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                folded.push('_');
            }
            in_run = true;
        } else {
            folded.push(c);
            in_run = false;
        }
    }
    folded
}

/// Returns `{base}.{extension}` or the first free `{base}_{n}.{extension}`,
/// and reserves the result in `existing`.
pub fn make_unique(base: &str, extension: &str, existing: &mut HashSet<String>) -> String {
    let name = make_unique_with(base, extension, |candidate| existing.contains(candidate));
    existing.insert(name.clone());
    name
}

/// Like [`make_unique`], but asks `is_taken` instead of a set and reserves nothing.
///
/// Suffixes always start at `_1` and grow by one; gaps left by deleted files
/// are not reused.
pub fn make_unique_with(
    base: &str,
    extension: &str,
    mut is_taken: impl FnMut(&str) -> bool,
) -> String {
    let extension = extension.trim_start_matches('.');
    let desired = format!("{base}.{extension}");
    if !is_taken(&desired) {
        return desired;
    }
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{base}_{counter}.{extension}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
