use crate::analysis::token::Token;
use crate::core::error::Result;
use crate::matches::Match;

/// One hypothesis tracked by `run_state_machine`
pub trait MatchState: Sized {
    /// Consumes the state for `token`, yielding successors and at most one
    /// completed match
    fn advance(self, token: &Token) -> Result<Transition<Self>>;
}

pub struct Transition<S> {
    pub next: Vec<S>,
    pub result: Option<Match>,
}

impl<S> Transition<S> {
    pub fn new() -> Self {
        Transition {
            next: Vec::new(),
            result: None,
        }
    }

    pub fn push(&mut self, state: S) {
        self.next.push(state);
    }

    pub fn successors(&self) -> usize {
        self.next.len()
    }
}

impl<S> Default for Transition<S> {
    fn default() -> Self {
        Transition::new()
    }
}

/// Feeds every token to every live state.
///
/// Successors of a state are queued before its result is collected, and
/// results keep the order in which they complete.
pub fn run_state_machine<S: MatchState>(tokens: &[Token], start: S) -> Result<Vec<Match>> {
    let mut states = vec![start];
    let mut results = Vec::new();

    for token in tokens {
        for state in std::mem::take(&mut states) {
            let transition = state.advance(token)?;
            states.extend(transition.next);
            if let Some(m) = transition.result {
                results.push(m);
            }
        }

        if states.is_empty() {
            break;
        }
    }

    Ok(results)
}
