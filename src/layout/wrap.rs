//! Greedy word wrapping.
//!
//! Paragraphs are separated by `\n` and wrapped independently. Words are
//! separated by single spaces and never split: a word wider than the limit
//! is emitted on its own (overflowing) line. Empty paragraphs produce no
//! line, so runs of blank lines collapse.

/// Wrap `text` into lines no wider than `max_width` as reported by `measure`.
///
/// ## Example
///
/// ```
/// use quotecard::layout::wrap::wrap_text;
///
/// // 10px per character
/// let measure = |s: &str| s.chars().count() as f32 * 10.0;
/// let lines = wrap_text("the quick brown fox", 100.0, measure);
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) > max_width && !current.is_empty() {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
