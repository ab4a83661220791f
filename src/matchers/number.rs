use std::str::FromStr;
use rust_decimal::Decimal;
use tracing::debug;
use crate::analysis::token::{Token, TokenType};
use crate::core::error::{Error, ErrorKind, Result};
use crate::matchers::Matcher;
use crate::matchers::state::{run_state_machine, MatchState, Transition};
use crate::matches::{Match, MatchBag, MatchBuilder, MatchKind, NumberMatch, SCORE_CERTAIN};

/// Recognizes integers and decimals such as `20`, `20.5` or `20,5`
#[derive(Debug, Clone, Default)]
pub struct NumberMatcher;

impl NumberMatcher {
    pub fn new() -> Self {
        NumberMatcher
    }
}

impl Matcher for NumberMatcher {
    fn first_pass_only(&self) -> bool {
        true
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        run_state_machine(bag.sequence().tokens(), NumberState::Idle)
    }

    fn name(&self) -> &str {
        "number"
    }
}

#[derive(Debug, Clone)]
enum NumberState {
    Idle,
    Integer(Token),                // Digits read so far
    Separated(Token),              // Integer part followed by `.` or `,`
    Decimal(Token, Token),         // Integer and fractional parts
}

impl MatchState for NumberState {
    fn advance(self, token: &Token) -> Result<Transition<Self>> {
        let mut transition = Transition::new();

        match self {
            NumberState::Idle => {
                transition.push(NumberState::Idle);
                if token.is(TokenType::Number) {
                    transition.push(NumberState::Integer(token.clone()));
                }
            }
            NumberState::Integer(int) => {
                if token.is(TokenType::Punctuation) && matches!(token.text(), "." | ",") {
                    transition.push(NumberState::Separated(int.clone()));
                }
                transition.result = number_match(&int, None)?;
            }
            NumberState::Separated(int) => {
                if token.is(TokenType::Number) {
                    transition.push(NumberState::Decimal(int, token.clone()));
                }
            }
            NumberState::Decimal(int, frac) => {
                transition.result = number_match(&int, Some(&frac))?;
            }
        }

        Ok(transition)
    }
}

fn number_match(int: &Token, frac: Option<&Token>) -> Result<Option<Match>> {
    let literal = match frac {
        Some(frac) => format!("{}.{}", int.text(), frac.text()),
        None => int.text().to_string(),
    };

    let value = match Decimal::from_str(&literal) {
        Ok(value) => value,
        Err(err) if literal.chars().all(|c| c.is_ascii_digit() || c == '.') => {
            debug!(literal = %literal, error = %err, "number literal out of range, skipped");
            return Ok(None);
        }
        Err(err) => {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("malformed number literal '{}': {}", literal, err),
            ));
        }
    };

    let end = frac.unwrap_or(int).clone();
    let m = MatchBuilder::new(MatchKind::Number(NumberMatch { value }))
        .score(SCORE_CERTAIN)
        .matched_tokens(1)
        .build(int.clone(), end);
    Ok(Some(m))
}
