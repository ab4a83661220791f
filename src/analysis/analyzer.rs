use crate::analysis::filter::TokenFilter;
use crate::analysis::sequence::TokenSequence;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{parse_quoted_constants, StandardTokenizer, Tokenizer};

/// Text analysis pipeline: tokenizer, optional quoted-constant pass, filters
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub quote: Option<char>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            quote: None,
            filters: Vec::new(),
            name,
        }
    }

    pub fn with_quotes(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        if let Some(quote) = self.quote {
            tokens = parse_quoted_constants(tokens, quote);
        }

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    pub fn analyze(&self, text: &str) -> TokenSequence {
        TokenSequence::new(self.tokens(text))
    }

    /// Standard tokenizer with double-quoted constants
    pub fn standard() -> Self {
        Analyzer::new("standard".to_string(), Box::new(StandardTokenizer))
            .with_quotes('"')
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::standard()
    }
}

impl Clone for Analyzer {
    fn clone(&self) -> Self {
        Analyzer {
            tokenizer: self.tokenizer.clone_box(),
            quote: self.quote,
            filters: self.filters.iter().map(|f| f.clone_box()).collect(),
            name: self.name.clone(),
        }
    }
}
