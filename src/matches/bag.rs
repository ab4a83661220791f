use std::collections::HashMap;
use std::sync::Arc;
use crate::analysis::sequence::TokenSequence;
use crate::analysis::token::Token;
use crate::matches::Match;

/// Append-only store of the matches found for one input.
///
/// Every match is listed once and indexed once by its start token and once
/// by its end token.
#[derive(Debug)]
pub struct MatchBag<'a> {
    sequence: &'a TokenSequence,
    matches: Vec<Arc<Match>>,
    by_start: HashMap<Token, Vec<usize>>,
    by_end: HashMap<Token, Vec<usize>>,
}

impl<'a> MatchBag<'a> {
    pub fn new(sequence: &'a TokenSequence) -> Self {
        MatchBag {
            sequence,
            matches: Vec::new(),
            by_start: HashMap::new(),
            by_end: HashMap::new(),
        }
    }

    /// Bag over `sequence` preloaded with existing matches
    pub fn with_matches<I>(sequence: &'a TokenSequence, matches: I) -> Self
    where
        I: IntoIterator<Item = Arc<Match>>,
    {
        let mut bag = MatchBag::new(sequence);
        for m in matches {
            bag.add_shared(m);
        }
        bag
    }

    pub fn sequence(&self) -> &'a TokenSequence {
        self.sequence
    }

    pub fn add(&mut self, m: Match) -> Arc<Match> {
        let m = Arc::new(m);
        self.add_shared(Arc::clone(&m));
        m
    }

    pub fn add_shared(&mut self, m: Arc<Match>) {
        let pos = self.matches.len();
        self.by_start.entry(m.start().clone()).or_default().push(pos);
        self.by_end.entry(m.end().clone()).or_default().push(pos);
        self.matches.push(m);
    }

    pub fn matches(&self) -> &[Arc<Match>] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches starting at `token`, in insertion order
    pub fn find_by_start(&self, token: &Token) -> Vec<Arc<Match>> {
        self.lookup(&self.by_start, token)
    }

    /// Matches ending at `token`, in insertion order
    pub fn find_by_end(&self, token: &Token) -> Vec<Arc<Match>> {
        self.lookup(&self.by_end, token)
    }

    pub fn has_start(&self, token: &Token) -> bool {
        self.by_start.contains_key(token)
    }

    /// Matches accepted by `predicate`, in insertion order
    pub fn find<P>(&self, predicate: P) -> impl Iterator<Item = &Arc<Match>>
    where
        P: Fn(&Match) -> bool,
    {
        self.matches.iter().filter(move |m| predicate(m))
    }

    fn lookup(&self, index: &HashMap<Token, Vec<usize>>, token: &Token) -> Vec<Arc<Match>> {
        index.get(token)
            .map(|positions| positions.iter().map(|&i| Arc::clone(&self.matches[i])).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
    use crate::matches::MatchBuilder;

    #[test]
    fn test_indexed_by_start_and_end() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("New York city"));
        let new = seq.get(0).unwrap().clone();
        let york = seq.get(2).unwrap().clone();
        let city = seq.get(4).unwrap().clone();

        let mut bag = MatchBag::new(&seq);
        bag.add(MatchBuilder::key("ny").build(new.clone(), york.clone()));
        bag.add(MatchBuilder::key("new").build(new.clone(), new.clone()));
        bag.add(MatchBuilder::key("city").build(city.clone(), city.clone()));

        assert_eq!(bag.len(), 3);
        assert_eq!(bag.find_by_start(&new).len(), 2);
        assert_eq!(bag.find_by_end(&york).len(), 1);
        assert_eq!(bag.find_by_end(&new)[0].as_key().unwrap().key, "new");
        assert!(bag.find_by_start(&york).is_empty());
        assert!(bag.has_start(&city));
        assert_eq!(bag.find(|m| m.as_key().is_some()).count(), 3);
    }

    #[test]
    fn test_with_matches_shares_arcs() {
        let seq = TokenSequence::new(StandardTokenizer.tokenize("a"));
        let a = seq.get(0).unwrap().clone();
        let mut bag = MatchBag::new(&seq);
        let m = bag.add(MatchBuilder::key("a").build(a.clone(), a));

        let copy = MatchBag::with_matches(&seq, bag.matches().iter().cloned());
        assert!(Arc::ptr_eq(&copy.matches()[0], &m));
    }
}
