use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use crate::analysis::token::Token;

/// Immutable, indexed view over the tokens of one input
#[derive(Debug, Default)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    index: OnceLock<HashMap<Token, usize>>,  // Built on first lookup
}

impl TokenSequence {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenSequence {
            tokens,
            index: OnceLock::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Position of `token`, or `None` for a token from another input
    pub fn index_of(&self, token: &Token) -> Option<usize> {
        self.index
            .get_or_init(|| {
                self.tokens.iter()
                    .enumerate()
                    .map(|(i, t)| (t.clone(), i))
                    .collect()
            })
            .get(token)
            .copied()
    }

    pub fn next(&self, token: &Token) -> Option<&Token> {
        self.next_matching(token, |_| true)
    }

    /// First token after `token` accepted by `predicate`
    pub fn next_matching<P>(&self, token: &Token, predicate: P) -> Option<&Token>
    where
        P: Fn(&Token) -> bool,
    {
        let idx = self.index_of(token)?;
        self.tokens[idx + 1..].iter().find(|t| predicate(t))
    }

    pub fn prev(&self, token: &Token) -> Option<&Token> {
        self.prev_matching(token, |_| true)
    }

    /// Closest token before `token` accepted by `predicate`
    pub fn prev_matching<P>(&self, token: &Token, predicate: P) -> Option<&Token>
    where
        P: Fn(&Token) -> bool,
    {
        let idx = self.index_of(token)?;
        self.tokens[..idx].iter().rev().find(|t| predicate(t))
    }

    /// Tokens from `t1` to `t2`; empty when either is unknown or the range is empty
    pub fn between(&self, t1: &Token, t2: &Token, inclusive: bool) -> &[Token] {
        let (Some(start), Some(end)) = (self.index_of(t1), self.index_of(t2)) else {
            return &[];
        };

        let (start, end) = if inclusive {
            (start, end + 1)
        } else {
            (start + 1, end)
        };

        if start >= end {
            return &[];
        }
        &self.tokens[start..end]
    }

    /// Absolute index difference between two tokens
    pub fn distance(&self, t1: &Token, t2: &Token) -> Option<usize> {
        let a = self.index_of(t1)?;
        let b = self.index_of(t2)?;
        Some(a.abs_diff(b))
    }
}

impl From<Vec<Token>> for TokenSequence {
    fn from(tokens: Vec<Token>) -> Self {
        TokenSequence::new(tokens)
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for t in &self.tokens {
            f.write_str(t.text())?;
        }
        Ok(())
    }
}
