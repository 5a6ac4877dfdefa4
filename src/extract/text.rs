//! Plain-text normalization applied to extracted page content

/// Flattens text into a single line
///
/// Newline, carriage-return and tab characters become spaces, the result is
/// trimmed, and runs of spaces collapse into one. Applying it twice gives the
/// same result as applying it once.
///
/// # Examples
///
/// ```
/// use web_connector::extract::normalize_text;
///
/// assert_eq!(normalize_text("  Hello\n\n\tworld  "), "Hello world");
/// ```
pub fn normalize_text(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();

    let mut normalized = String::with_capacity(flattened.len());
    let mut previous_was_space = false;

    for c in flattened.trim().chars() {
        if c == ' ' {
            if !previous_was_space {
                normalized.push(' ');
            }
            previous_was_space = true;
        } else {
            normalized.push(c);
            previous_was_space = false;
        }
    }

    normalized
}

/// Keeps the first `max_chars` characters of `text`
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
