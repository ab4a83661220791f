use crate::analysis::token::{Token, TokenType};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

/// Character-class tokenizer.
///
/// Runs of the same class form one token, except that brackets, math
/// symbols and punctuation are always single-character tokens and digits
/// never break an open word ("aa555" stays one word). The output always ends
/// with an empty `SentenceEnd` token positioned at the end of the input.
#[derive(Debug, Clone, Default)]
pub struct StandardTokenizer;

impl StandardTokenizer {
    pub fn new() -> Self {
        StandardTokenizer
    }

    pub fn char_type(ch: char) -> TokenType {
        match ch {
            '0'..='9' => TokenType::Number,
            ' ' | '\t' | '\n' | '\r' => TokenType::Separator,
            '(' | ')' | '[' | ']' | '{' | '}' => TokenType::Bracket,
            '+' | '-' | '/' | '*' | '&' | '|' | '=' | '<' | '>' | '~' | '^' | '#' => TokenType::Math,
            ',' | ';' | ':' | '"' | '.' | '?' | '!' | '_' | '\'' => TokenType::Punctuation,
            c if c.is_whitespace() => TokenType::Separator,
            _ => TokenType::Word,
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current = TokenType::Unknown;
        let mut start = 0;

        for (pos, ch) in text.char_indices() {
            let char_type = StandardTokenizer::char_type(ch);
            let single = matches!(char_type, TokenType::Bracket | TokenType::Math | TokenType::Punctuation);
            let extends = !single
                && (char_type == current || (char_type == TokenType::Number && current == TokenType::Word));

            if !extends {
                if pos > start {
                    tokens.push(Token::new(current, start, &text[start..pos]));
                }
                start = pos;
                current = char_type;
            }
        }

        if text.len() > start {
            tokens.push(Token::new(current, start, &text[start..]));
        }
        tokens.push(Token::new(TokenType::SentenceEnd, text.len(), ""));

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(StandardTokenizer)
    }
}

/// Collapses quote-delimited runs into single `Word` tokens.
///
/// A doubled quote inside a run is a literal quote. An unterminated run is
/// flushed when `SentenceEnd` (or the end of input) is reached.
pub fn parse_quoted_constants(tokens: Vec<Token>, quote: char) -> Vec<Token> {
    let is_quote = |t: &Token| {
        let mut chars = t.text().chars();
        chars.next() == Some(quote) && chars.next().is_none()
    };

    let mut out = Vec::with_capacity(tokens.len());
    let mut value = String::new();
    let mut run_start: Option<usize> = None;
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        if is_quote(&token) {
            let Some(start) = run_start else {
                run_start = Some(token.offset() + quote.len_utf8());
                continue;
            };

            match iter.next() {
                Some(next) if is_quote(&next) => value.push_str(next.text()),
                Some(next) => {
                    out.push(Token::new(TokenType::Word, start, std::mem::take(&mut value)));
                    run_start = None;
                    out.push(next);
                }
                None => {
                    out.push(Token::new(TokenType::Word, start, std::mem::take(&mut value)));
                    run_start = None;
                }
            }
        } else if let Some(start) = run_start {
            if token.is(TokenType::SentenceEnd) {
                out.push(Token::new(TokenType::Word, start, std::mem::take(&mut value)));
                run_start = None;
                out.push(token);
            } else {
                value.push_str(token.text());
            }
        } else {
            out.push(token);
        }
    }

    if let Some(start) = run_start {
        out.push(Token::new(TokenType::Word, start, value));
    }

    out
}
