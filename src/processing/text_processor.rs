//! Text normalization and tokenization

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Tokenizer shared by skill extraction and similarity scoring. Built once
/// and borrowed read-only by the pipeline stages.
#[derive(Debug, Clone)]
pub struct TextProcessor {
    term_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        // Same token pattern as scikit-learn's TfidfVectorizer: two or more word characters
        let term_regex = Regex::new(r"\b\w\w+\b").expect("Invalid term regex");

        Self { term_regex }
    }

    /// Lowercase and split text into word units on Unicode word boundaries.
    ///
    /// Punctuation becomes its own token and whitespace is dropped. Runs of
    /// `+` or `#` directly after a word are glued onto it, so `C++` and `C#`
    /// come out as `c++` and `c#` rather than `c`, `+`, `+`. Possessive
    /// endings (`'s`, `’s`, a bare trailing apostrophe) are split off the
    /// word they follow, so `Python's` yields `python` and `'s`.
    pub fn word_tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens: Vec<String> = Vec::new();
        let mut adjacent = false;

        for segment in lowered.split_word_bounds() {
            if segment.chars().all(char::is_whitespace) {
                adjacent = false;
                continue;
            }

            let (stem, possessive) = Self::split_possessive(segment);
            let is_suffix = stem.chars().all(|c| c == '+' || c == '#');
            match tokens.last_mut() {
                Some(last) if adjacent && is_suffix && Self::accepts_suffix(last) => {
                    last.push_str(stem)
                }
                _ => tokens.push(stem.to_string()),
            }
            if let Some(possessive) = possessive {
                tokens.push(possessive.to_string());
            }
            adjacent = true;
        }

        tokens
    }

    /// Lowercased terms for vectorization.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.term_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn split_possessive(segment: &str) -> (&str, Option<&str>) {
        for suffix in ["'s", "\u{2019}s", "'", "\u{2019}"] {
            if let Some(stem) = segment.strip_suffix(suffix) {
                if !stem.is_empty() {
                    return (stem, Some(&segment[stem.len()..]));
                }
            }
        }
        (segment, None)
    }

    fn accepts_suffix(token: &str) -> bool {
        token
            .chars()
            .last()
            .map_or(false, |c| c.is_alphanumeric() || c == '+' || c == '#')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens_split_punctuation() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("Looking for Python, Java, and teamwork skills.");

        assert!(tokens.contains(&"python".to_string()));
        assert!(tokens.contains(&"java".to_string()));
        assert!(tokens.contains(&"teamwork".to_string()));
        assert!(tokens.contains(&",".to_string()));
        assert!(!tokens.iter().any(|t| t.trim().is_empty()));
    }

    #[test]
    fn test_word_tokens_keep_plus_and_hash_suffixes() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("Shipped C++ and C# services (C++).");

        assert_eq!(tokens.iter().filter(|t| t.as_str() == "c++").count(), 2);
        assert!(tokens.contains(&"c#".to_string()));
    }

    #[test]
    fn test_possessive_endings_are_split() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("Python's ecosystem and Java\u{2019}s JVM; SQL's joins");

        assert!(tokens.contains(&"python".to_string()));
        assert!(tokens.contains(&"java".to_string()));
        assert!(tokens.contains(&"sql".to_string()));
        assert!(tokens.contains(&"'s".to_string()));
        assert!(tokens.contains(&"\u{2019}s".to_string()));
        assert!(!tokens.iter().any(|t| t.starts_with("python") && t.len() > 6));
    }

    #[test]
    fn test_contraction_is_not_treated_as_possessive() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("Don't");
        assert_eq!(tokens, vec!["don't"]);
    }

    #[test]
    fn test_detached_plus_is_not_glued() {
        let processor = TextProcessor::new();
        let tokens = processor.word_tokens("java + sql");

        assert_eq!(tokens, vec!["java", "+", "sql"]);
    }

    #[test]
    fn test_terms_drop_single_characters() {
        let processor = TextProcessor::new();
        let terms = processor.terms("I know C++ and R, plus Python!");

        assert_eq!(terms, vec!["know", "and", "plus", "python"]);
    }
}
