use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII punctuation: !"#$%&'()*+,-./:;<=>?@[\]^_`{|}~
    static ref PUNCT: Regex = Regex::new(r"[[:punct:]]").expect("valid regex");
}

/// Normalize a single raw token: ASCII lowercase, then drop every ASCII punctuation character.
/// Returns an empty string when nothing survives.
pub fn normalize_token(raw: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    PUNCT.replace_all(&lowered, "").into_owned()
}

/// Split on whitespace, lowercase, strip punctuation and drop empty tokens.
///
/// The index of a term in the returned vector is its token offset in the text,
/// which is what phrase search relies on.
pub fn normalize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Like [`normalize`] but pairs every term with its offset.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    normalize(text)
        .into_iter()
        .enumerate()
        .map(|(pos, term)| (term, pos))
        .collect()
}
