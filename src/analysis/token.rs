use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Unknown,
    Separator,
    Punctuation,
    Math,
    Bracket,
    Word,
    Number,
    SentenceEnd,
}

impl TokenType {
    pub fn is_word_or_number(self) -> bool {
        matches!(self, TokenType::Word | TokenType::Number)
    }
}

/// Token representation.
///
/// Identity is `(text, offset)`: two tokens with the same text at the same
/// offset are equal regardless of their type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    text: String,            // Raw substring of the input
    lowercase: String,       // Cached lower-case form
    offset: usize,           // Byte offset in input text
    token_type: TokenType,
}

impl Token {
    pub fn new(token_type: TokenType, offset: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let lowercase = text.to_lowercase();
        Token {
            text,
            lowercase,
            offset,
            token_type,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Token length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    pub fn is_separator(&self) -> bool {
        self.token_type == TokenType::Separator
    }

    /// Case-insensitive comparison with a plain string
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.lowercase == other.to_lowercase()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.text == other.text
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.offset.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}
