use std::collections::HashSet;
use std::sync::Arc;
use crate::analysis::sequence::TokenSequence;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag, MatchBuilder};

pub type PhraseMerge = Arc<dyn Fn(&TokenSequence, &Arc<Match>, &Arc<Match>) -> Option<MatchBuilder> + Send + Sync>;

/// Merges adjacent matches of one kind into a longer match, e.g. the
/// words of a multi-word name recognized one token at a time.
///
/// Each candidate consumes the next word or number token that carries
/// matches; merging repeats while the result is still a candidate. The
/// merge function sets the score; `matched_tokens` is the sum of both parts.
#[derive(Clone)]
pub struct MergePhraseMatcher {
    candidate: Arc<dyn Fn(&Match) -> bool + Send + Sync>,
    merge: PhraseMerge,
}

impl MergePhraseMatcher {
    pub fn new<C, M>(candidate: C, merge: M) -> Self
    where
        C: Fn(&Match) -> bool + Send + Sync + 'static,
        M: Fn(&TokenSequence, &Arc<Match>, &Arc<Match>) -> Option<MatchBuilder> + Send + Sync + 'static,
    {
        MergePhraseMatcher {
            candidate: Arc::new(candidate),
            merge: Arc::new(merge),
        }
    }

    fn try_merge(&self, bag: &MatchBag, m: &Arc<Match>, processed: &mut HashSet<*const Match>) -> Option<Match> {
        let seq = bag.sequence();
        let end_idx = seq.index_of(m.end())?;

        let next_matches = seq.tokens()[end_idx + 1..]
            .iter()
            .filter(|t| t.token_type().is_word_or_number())
            .map(|t| bag.find_by_start(t))
            .find(|found| !found.is_empty())?;

        for next in &next_matches {
            if !(self.candidate)(next) {
                continue;
            }
            let Some(builder) = (self.merge)(seq, m, next) else {
                continue;
            };

            processed.insert(Arc::as_ptr(next));
            let merged = Arc::new(builder
                .matched_tokens(m.matched_tokens() + next.matched_tokens())
                .build(m.start().clone(), next.end().clone()));

            if (self.candidate)(&merged) {
                if let Some(longer) = self.try_merge(bag, &merged, processed) {
                    return Some(longer);
                }
            }
            return Some(Arc::unwrap_or_clone(merged));
        }

        None
    }
}

impl Matcher for MergePhraseMatcher {
    fn first_pass_only(&self) -> bool {
        false
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let seq = bag.sequence();
        let mut candidates: Vec<(usize, &Arc<Match>)> = bag.matches()
            .iter()
            .filter(|m| (self.candidate)(m))
            .filter_map(|m| seq.index_of(m.start()).map(|idx| (idx, m)))
            .collect();
        candidates.sort_by_key(|(idx, _)| *idx);

        let mut processed: HashSet<*const Match> = HashSet::new();
        let mut out = Vec::new();
        for (_, m) in candidates {
            if !processed.insert(Arc::as_ptr(m)) {
                continue;
            }
            out.extend(self.try_merge(bag, m, &mut processed));
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "merge_phrase"
    }
}
