//! Export file naming.

/// Used when the quote yields no usable words.
pub const FALLBACK_STEM: &str = "quote-card";

const MAX_WORDS: usize = 4;

/// Slug from the first four words of `quote`.
///
/// Each word keeps only ASCII letters, digits and Latin Extended-A/B
/// letters (which covers Romanian diacritics), lowercased; words that
/// end up empty are dropped.
///
/// ```
/// use quotecard::export::filename_stem;
///
/// assert_eq!(filename_stem("  Țara mea, frumoasă și dragă! "), "țara-mea-frumoasă-și");
/// assert_eq!(filename_stem("«» ..."), "quote-card");
/// ```
pub fn filename_stem(quote: &str) -> String {
    let words: Vec<String> = quote
        .split_whitespace()
        .take(MAX_WORDS)
        .map(|word| {
            word.chars()
                .filter(|&c| is_slug_char(c))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        words.join("-")
    }
}

pub fn export_filename(quote: &str) -> String {
    format!("{}.png", filename_stem(quote))
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{0100}'..='\u{024F}').contains(&c)
}
