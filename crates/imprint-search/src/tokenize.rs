//! Term extraction for the search index.

const MIN_TOKEN_LEN: usize = 2;

/// Split text into lowercase index terms.
///
/// Splits on any non-alphanumeric character and drops tokens shorter than
/// two characters. Unicode letters survive intact, so accented words index
/// under their accented form.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}
