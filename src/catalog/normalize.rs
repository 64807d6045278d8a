use deunicode::deunicode_char;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Folds a title or name into its lookup key
///
/// Lower-cases, decomposes accented characters and drops the combining
/// marks, then transliterates what is left to ASCII, so "Amélie" maps to
/// "amelie" and "Æon Flux" to "aeon flux". Characters with no
/// transliteration are kept as they are. Surrounding whitespace is trimmed.
pub fn normalize_title(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for c in raw
        .trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
    {
        match deunicode_char(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }
    folded.trim().to_lowercase()
}
