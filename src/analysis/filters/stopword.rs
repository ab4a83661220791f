use std::collections::HashSet;
use crate::analysis::filter::TokenFilter;
use crate::analysis::token::{Token, TokenType};

/// Drops stop-word `Word` tokens; comparison is case-insensitive
#[derive(Debug, Clone)]
pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<String>) -> Self {
        StopWordFilter {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn english() -> Self {
        let words = vec![
            "a", "an", "and", "are", "as", "at", "be", "by", "for",
            "from", "has", "in", "is", "it", "its", "of", "on",
            "that", "the", "to", "was", "were", "with"
        ].into_iter().map(String::from).collect();

        StopWordFilter::new(words)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .filter(|token| !token.is(TokenType::Word) || !self.stop_words.contains(token.lowercase()))
            .collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(self.clone())
    }
}
