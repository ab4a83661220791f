use std::sync::Arc;
use crate::analysis::sequence::TokenSequence;
use crate::analysis::token::{Token, TokenType};
use crate::matches::Match;

/// Depth-first enumeration of non-overlapping match chains.
///
/// Branching happens only at tokens where some match starts, so the number
/// of combinations grows with ambiguity, not with sentence length.
pub struct CombinationSearch<'s> {
    sequence: &'s TokenSequence,
    starts: Vec<Vec<Arc<Match>>>,   // Indexed by start token; longest span first, then best score
    include_zero_matches: bool,
}

impl<'s> CombinationSearch<'s> {
    pub fn new<I>(sequence: &'s TokenSequence, matches: I, include_zero_matches: bool) -> Self
    where
        I: IntoIterator<Item = Arc<Match>>,
    {
        let mut starts = vec![Vec::new(); sequence.len()];
        for m in matches {
            if let Some(idx) = sequence.index_of(m.start()) {
                starts[idx].push(m);
            }
        }

        for group in &mut starts {
            group.sort_by(|a, b| {
                b.span_len().cmp(&a.span_len())
                    .then_with(|| b.score().total_cmp(&a.score()))
            });
        }

        CombinationSearch {
            sequence,
            starts,
            include_zero_matches,
        }
    }

    /// Feeds every combination to `handler`; false when the handler cancelled
    pub fn run<H>(&self, handler: &mut H) -> bool
    where
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        let mut chain = Vec::new();
        self.traverse(0, &mut chain, handler)
    }

    fn traverse<H>(&self, from: usize, chain: &mut Vec<Arc<Match>>, handler: &mut H) -> bool
    where
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        let next = (from..self.starts.len()).find(|&idx| !self.starts[idx].is_empty());
        let Some(idx) = next else {
            return self.emit(chain, handler);
        };

        for m in &self.starts[idx] {
            let end = self.sequence.index_of(m.end()).unwrap_or(idx).max(idx);
            chain.push(Arc::clone(m));
            let proceed = self.traverse(end + 1, chain, handler);
            chain.pop();
            if !proceed {
                return false;
            }
        }

        true
    }

    fn emit<H>(&self, chain: &[Arc<Match>], handler: &mut H) -> bool
    where
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        if !self.include_zero_matches {
            return handler(chain);
        }

        let tokens = self.sequence.tokens();
        let mut filled = Vec::with_capacity(chain.len() * 2 + 1);
        let mut gap_start = 0;
        for m in chain {
            let start = self.sequence.index_of(m.start()).unwrap_or(gap_start);
            filled.extend(stub(&tokens[gap_start.min(start)..start]));
            filled.push(Arc::clone(m));
            gap_start = self.sequence.index_of(m.end()).map_or(start, |end| end.max(start)) + 1;
        }
        filled.extend(stub(&tokens[gap_start.min(tokens.len())..]));

        handler(&filled)
    }
}

/// Stub over the first to last content token of `gap`
fn stub(gap: &[Token]) -> Option<Arc<Match>> {
    let is_content = |t: &&Token| !matches!(t.token_type(), TokenType::Separator | TokenType::SentenceEnd);
    let first = gap.iter().find(is_content)?;
    let last = gap.iter().rev().find(is_content)?;
    Some(Arc::new(Match::stub(first.clone(), last.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
    use crate::matches::MatchBuilder;

    fn key(seq: &TokenSequence, name: &str, from: usize, to: usize, score: f32) -> Arc<Match> {
        Arc::new(MatchBuilder::key(name)
            .score(score)
            .build(seq.tokens()[from].clone(), seq.tokens()[to].clone()))
    }

    fn all(search: &CombinationSearch) -> Vec<String> {
        let mut out = Vec::new();
        search.run(&mut |c: &[Arc<Match>]| {
            out.push(c.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(","));
            true
        });
        out
    }

    #[test]
    fn test_branches_longest_first() {
        // a b c
        let seq = TokenSequence::new(StandardTokenizer.tokenize("a b c"));
        let matches = vec![
            key(&seq, "a", 0, 0, 1.0),
            key(&seq, "ab", 0, 2, 0.5),
            key(&seq, "b", 2, 2, 1.0),
            key(&seq, "c", 4, 4, 1.0),
        ];
        let search = CombinationSearch::new(&seq, matches, false);
        assert_eq!(all(&search), vec!["Key[ab],Key[c]", "Key[a],Key[b],Key[c]"]);
    }

    #[test]
    fn test_equal_span_by_score() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("a"));
        let matches = vec![key(&seq, "low", 0, 0, 0.2), key(&seq, "high", 0, 0, 0.9)];
        let search = CombinationSearch::new(&seq, matches, false);
        assert_eq!(all(&search), vec!["Key[high]", "Key[low]"]);
    }

    #[test]
    fn test_gap_stubs_span_content_tokens() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("x, y b z"));
        // b is token 5
        let search = CombinationSearch::new(&seq, vec![key(&seq, "b", 5, 5, 1.0)], true);
        assert_eq!(all(&search), vec!["StubMatch[x..y],Key[b],StubMatch[z]"]);
    }

    #[test]
    fn test_separator_only_gap_has_no_stub() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("a b"));
        let matches = vec![key(&seq, "a", 0, 0, 1.0), key(&seq, "b", 2, 2, 1.0)];
        let search = CombinationSearch::new(&seq, matches, true);
        assert_eq!(all(&search), vec!["Key[a],Key[b]"]);
    }

    #[test]
    fn test_cancel_propagates() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("a b"));
        let matches = vec![
            key(&seq, "a1", 0, 0, 1.0),
            key(&seq, "a2", 0, 0, 0.5),
            key(&seq, "b1", 2, 2, 1.0),
            key(&seq, "b2", 2, 2, 0.5),
        ];
        let search = CombinationSearch::new(&seq, matches, false);
        let mut calls = 0;
        let completed = search.run(&mut |_: &[Arc<Match>]| {
            calls += 1;
            calls < 2
        });
        assert!(!completed);
        assert_eq!(calls, 2);
    }
}
