//! Symbol-name helpers shared by intake and classification.
//!
//! Analyzer messages wrap the offending name in quotes ("'count' is not defined.").
//! Everything downstream depends only on the extracted name, never on message wording.

/// Quote pairs recognised around a symbol name.
const QUOTES: &[(char, char)] = &[
    ('\'', '\''),
    ('"', '"'),
    ('`', '`'),
    ('\u{2018}', '\u{2019}'),
    ('\u{201C}', '\u{201D}'),
];

/// Extract the quoted symbol name from a free-text diagnostic message.
///
/// Returns the first quoted run whose content is a valid identifier. When no quoted
/// run is an identifier, the first non-empty quoted run is returned instead.
pub fn extract_symbol(message: &str) -> Option<String> {
    let runs = quoted_runs(message);
    if let Some(ident) = runs.iter().find(|r| is_identifier(r)) {
        return Some((*ident).to_string());
    }
    runs.into_iter()
        .find(|r| !r.trim().is_empty())
        .map(|r| r.trim().to_string())
}

fn quoted_runs(message: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = message;

    while let Some((open_idx, open, close)) = rest.char_indices().find_map(|(i, c)| {
        QUOTES
            .iter()
            .find(|(o, _)| *o == c)
            .map(|(o, cl)| (i, *o, *cl))
    }) {
        let after_open = &rest[open_idx + open.len_utf8()..];
        match after_open.find(close) {
            Some(close_idx) => {
                out.push(&after_open[..close_idx]);
                rest = &after_open[close_idx + close.len_utf8()..];
            }
            None => break,
        }
    }

    out
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub fn is_identifier_part(c: char) -> bool {
    c == '_' || c == '$' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// True when `name` is a syntactically valid identifier name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// True when the first character is an upper-case letter.
pub fn starts_upper(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Lower-case the first character, leaving the rest untouched.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
