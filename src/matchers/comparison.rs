use std::sync::Arc;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::{Token, TokenType};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matchers::operators::{
    match_comparison_symbol, match_phrase_backward, match_phrase_forward, OperatorHit, PhraseOperator,
};
use crate::matches::{ComparisonType, Match, MatchBag, MatchBuilder, SCORE_MAYBE};

pub type ComparisonMerge =
    Arc<dyn Fn(&Arc<Match>, ComparisonType, &Arc<Match>) -> Option<MatchBuilder> + Send + Sync>;

/// Joins `<left> <op> <right>` and `<op> <right> <left>` into one match.
///
/// Operators are symbols (`=`, `==`, `<`, `<=`, `>`, `>=`) or configured
/// word phrases ("greater than"). The merge function decides whether a pair
/// is accepted and what it becomes; unset scores default to the operand
/// average.
#[derive(Clone)]
pub struct ComparisonMatcher {
    left: Arc<dyn Fn(&Match) -> bool + Send + Sync>,
    merge: ComparisonMerge,
    pub phrases: Vec<PhraseOperator<ComparisonType>>,
    pub stop_words: Option<StopWordFilter>,   // Skippable inside phrases
}

impl ComparisonMatcher {
    pub fn new<L, M>(left: L, merge: M) -> Self
    where
        L: Fn(&Match) -> bool + Send + Sync + 'static,
        M: Fn(&Arc<Match>, ComparisonType, &Arc<Match>) -> Option<MatchBuilder> + Send + Sync + 'static,
    {
        ComparisonMatcher {
            left: Arc::new(left),
            merge: Arc::new(merge),
            phrases: Vec::new(),
            stop_words: None,
        }
    }

    /// Produces `Comparison` matches for every left operand accepted by `left`
    pub fn comparisons<L>(left: L) -> Self
    where
        L: Fn(&Match) -> bool + Send + Sync + 'static,
    {
        ComparisonMatcher::new(left, |l, op, r| {
            Some(MatchBuilder::comparison(Arc::clone(l), op, Arc::clone(r)))
        })
    }

    pub fn with_phrases(mut self, phrases: Vec<(Vec<String>, ComparisonType)>) -> Self {
        self.phrases = PhraseOperator::from_pairs(phrases);
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWordFilter) -> Self {
        self.stop_words = Some(stop_words);
        self
    }

    /// Operator phrases and stop words from `config`
    pub fn configured(self, config: &Config) -> Self {
        let with_phrases = self.with_phrases(config.operators.comparison_phrases());
        if config.stop_words.is_empty() {
            with_phrases
        } else {
            with_phrases.with_stop_words(StopWordFilter::new(config.stop_words.clone()))
        }
    }

    fn merged(
        &self,
        left: &Arc<Match>,
        op: OperatorHit<ComparisonType>,
        right: &Arc<Match>,
        span: (Token, Token),
        right_score: f32,
    ) -> Option<Match> {
        let builder = (self.merge)(left, op.op, right)?;
        let m = builder
            .matched_tokens(left.matched_tokens() + op.words + right.matched_tokens())
            .score_or((left.score() + right_score) / 2.0)
            .build(span.0, span.1);
        Some(m)
    }

    /// `<left> <op> <right>`
    fn forward(&self, bag: &MatchBag, left: &Arc<Match>, out: &mut Vec<Match>) {
        let seq = bag.sequence();
        let tokens = seq.tokens();
        let Some(end_idx) = seq.index_of(left.end()) else {
            return;
        };

        let mut op: Option<OperatorHit<ComparisonType>> = None;
        let mut i = end_idx + 1;
        // the operator can never be the last token
        while i + 1 < tokens.len() {
            let t = &tokens[i];
            match t.token_type() {
                TokenType::Separator => {
                    i += 1;
                    continue;
                }
                TokenType::Math => {
                    if let Some(hit) = match_comparison_symbol(tokens, i) {
                        i = hit.index + 1;
                        op = Some(hit);
                        continue;
                    }
                }
                TokenType::Word | TokenType::Number => match op {
                    Some(op) => {
                        let rights = bag.find_by_start(t);
                        for right in &rights {
                            let span = (left.start().clone(), right.end().clone());
                            out.extend(self.merged(left, op, right, span, right.score()));
                        }
                        if rights.is_empty() {
                            let stub = Arc::new(Match::stub(t.clone(), t.clone()));
                            let span = (left.start().clone(), t.clone());
                            out.extend(self.merged(left, op, &stub, span, SCORE_MAYBE));
                        }
                    }
                    None => {
                        if let Some(hit) = match_phrase_forward(tokens, i, &self.phrases, self.stop_words.as_ref()) {
                            i = hit.index;
                            op = Some(hit);
                            continue;
                        }
                    }
                },
                _ => {}
            }
            break;
        }
    }

    /// `<op> <right> <left>`, e.g. "more than 5 items"
    fn reverse(&self, bag: &MatchBag, left: &Arc<Match>, out: &mut Vec<Match>) {
        let seq = bag.sequence();
        let tokens = seq.tokens();
        let not_separator = |t: &Token| !t.is_separator();

        let Some(before_left) = seq.prev_matching(left.start(), not_separator) else {
            return;
        };

        for right in bag.find_by_end(before_left) {
            let Some(before_right) = seq.prev_matching(right.start(), not_separator) else {
                continue;
            };
            let Some(mut idx) = seq.index_of(before_right) else {
                continue;
            };

            let hit = match before_right.token_type() {
                TokenType::Math => {
                    while idx > 0 && tokens[idx - 1].is(TokenType::Math) {
                        idx -= 1;
                    }
                    match_comparison_symbol(tokens, idx).map(|hit| OperatorHit { index: idx, ..hit })
                }
                TokenType::Word | TokenType::Number => {
                    match_phrase_backward(tokens, idx, &self.phrases, self.stop_words.as_ref())
                }
                _ => None,
            };

            if let Some(hit) = hit {
                let span = (tokens[hit.index].clone(), left.end().clone());
                out.extend(self.merged(left, hit, &right, span, right.score()));
            }
        }
    }
}

impl Matcher for ComparisonMatcher {
    fn first_pass_only(&self) -> bool {
        false
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let mut out = Vec::new();

        for left in bag.matches() {
            if !(self.left)(left) {
                continue;
            }
            self.forward(bag, left, &mut out);
            self.reverse(bag, left, &mut out);
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "comparison"
    }
}
