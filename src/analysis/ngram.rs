use crate::analysis::token::Token;

/// Generates word n-grams: every run of consecutive tokens up to `max_len`
#[derive(Debug, Clone, Copy)]
pub struct NGramGenerator {
    pub max_len: usize,
}

impl Default for NGramGenerator {
    fn default() -> Self {
        NGramGenerator { max_len: usize::MAX }
    }
}

impl NGramGenerator {
    pub fn new(max_len: usize) -> Self {
        NGramGenerator { max_len }
    }

    /// N-grams grouped by start token, shortest first within a group
    pub fn generate<'a>(&self, tokens: &'a [Token]) -> Vec<&'a [Token]> {
        let mut result = Vec::new();

        for start in 0..tokens.len() {
            let longest = self.max_len.min(tokens.len() - start);
            for n in 1..=longest {
                result.push(&tokens[start..start + n]);
            }
        }

        result
    }
}
