//! Escaping helpers for text report formats.
//!
//! Cell values come straight from user spreadsheets and may contain pipes,
//! backticks or newlines that would break a Markdown table, or characters
//! that are not valid in file names.

/// Escape a string for use inside a Markdown table cell.
///
/// ```
/// use sheet_diff::reports::escape::escape_markdown_table;
/// assert_eq!(escape_markdown_table("a|b\nc"), "a\\|b c");
/// ```
#[must_use]
pub fn escape_markdown_table(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' => result.push_str("\\|"),
            '\n' => result.push(' '),
            '\r' => {}
            '`' => result.push_str("\\`"),
            '[' => result.push_str("\\["),
            ']' => result.push_str("\\]"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape emphasis and code markers in running Markdown text.
#[must_use]
pub fn escape_markdown_inline(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' | '_' | '`' | '#' | '[' | ']' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            '\n' | '\r' => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}

/// Turn a report table name into a portable file stem.
///
/// Path separators, reserved punctuation and control characters become `_`;
/// an empty result becomes `table`.
///
/// ```
/// use sheet_diff::reports::escape::file_stem_for;
/// assert_eq!(file_stem_for("Details_Q1/Q2: draft"), "Details_Q1_Q2_ draft");
/// ```
#[must_use]
pub fn file_stem_for(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        "table".to_string()
    } else {
        stem.to_string()
    }
}
