use docsearch_core::tokenizer::{normalize, tokenize};

#[test]
fn it_lowercases_and_strips_ascii_punctuation() {
    let words = normalize("Hello, World! It's \"GNU/Linux\" (v2.0)");
    assert_eq!(words, vec!["hello", "world", "its", "gnulinux", "v20"]);
}

#[test]
fn it_keeps_stopwords_and_does_not_stem() {
    let words = normalize("The runners are Running");
    assert_eq!(words, vec!["the", "runners", "are", "running"]);
}

#[test]
fn it_numbers_positions_after_dropping_empty_tokens() {
    let toks = tokenize("-- alpha , beta");
    assert_eq!(toks, vec![("alpha".to_string(), 0), ("beta".to_string(), 1)]);
}
