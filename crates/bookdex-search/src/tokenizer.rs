//! Term normalization shared by index construction and querying.
//!
//! The bundled `search-engine.js` runtime applies the same rules, so a change
//! here must be mirrored there.

/// Minimum length, in characters, of a word term.
pub const MIN_TERM_LEN: usize = 2;

/// Tokenize text into normalized terms, in order, keeping duplicates.
///
/// Words are split on characters that are neither alphabetic nor numeric and
/// lowercased; words shorter than [`MIN_TERM_LEN`] characters are dropped. Runs of CJK characters also
/// produce one term per character and one per adjacent pair.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut terms = Vec::new();

    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() >= MIN_TERM_LEN && !word.chars().all(is_cjk_char) {
            terms.push(word.to_lowercase());
        }
    }

    let mut run: Vec<char> = Vec::new();
    for c in text.chars().chain(std::iter::once(' ')) {
        if is_cjk_char(c) {
            run.push(c);
            continue;
        }
        push_cjk_terms(&run, &mut terms);
        run.clear();
    }

    terms
}

fn push_cjk_terms(run: &[char], terms: &mut Vec<String>) {
    for c in run {
        terms.push(c.to_string());
    }
    for pair in run.windows(2) {
        terms.push(pair.iter().collect());
    }
}

/// Tokenize and deduplicate, keeping first occurrence order.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Check if a character is a CJK (Chinese, Japanese, Korean) character.
fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |      // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |      // CJK Unified Ideographs Extension A
        '\u{20000}'..='\u{2A6DF}' |    // CJK Unified Ideographs Extension B
        '\u{F900}'..='\u{FAFF}' |      // CJK Compatibility Ideographs
        '\u{3040}'..='\u{309F}' |      // Hiragana
        '\u{30A0}'..='\u{30FF}' |      // Katakana
        '\u{AC00}'..='\u{D7AF}'        // Korean Hangul Syllables
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_filters_short() {
        let terms = tokenize("I am a test");
        assert_eq!(terms, vec!["am", "test"]);
    }

    #[test]
    fn test_tokenize_keeps_duplicates() {
        assert_eq!(tokenize("rust Rust RUST"), vec!["rust", "rust", "rust"]);
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(
            tokenize("state-machine/index_builder"),
            vec!["state", "machine", "index", "builder"]
        );
    }

    #[test]
    fn test_tokenize_cjk() {
        let terms = tokenize("你好世界");
        assert!(terms.contains(&"你".to_string()));
        assert!(terms.contains(&"界".to_string()));
        assert!(terms.contains(&"你好".to_string()));
        assert!(terms.contains(&"世界".to_string()));
        assert!(!terms.contains(&"你好世界".to_string()));
    }

    #[test]
    fn test_tokenize_mixed_scripts() {
        let terms = tokenize("Rust 入门");
        assert!(terms.contains(&"rust".to_string()));
        assert!(terms.contains(&"入门".to_string()));
    }

    #[test]
    fn test_tokenize_min_length_counts_chars() {
        assert_eq!(tokenize("a é я ok"), vec!["ok"]);
        assert_eq!(tokenize("éa яб"), vec!["éa", "яб"]);
    }

    #[test]
    fn test_tokenize_keeps_alphabetic_marks() {
        assert_eq!(
            tokenize("\u{939}\u{93F}\u{928}\u{94D}\u{926}\u{940}"),
            vec!["\u{939}\u{93F}\u{928}", "\u{926}\u{940}"]
        );
    }

    #[test]
    fn test_tokenize_unique() {
        assert_eq!(tokenize_unique("test test TEST other"), vec!["test", "other"]);
    }

    #[test]
    fn test_is_cjk_char() {
        assert!(is_cjk_char('你'));
        assert!(is_cjk_char('あ'));
        assert!(is_cjk_char('ア'));
        assert!(is_cjk_char('한'));
        assert!(!is_cjk_char('a'));
        assert!(!is_cjk_char('1'));
    }
}
