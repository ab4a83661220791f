use std::sync::Arc;
use crate::analysis::token::TokenType;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag, MatchBuilder, SCORE_MAYBE};

pub type HintMerge = Arc<dyn Fn(&Arc<Match>, &Arc<Match>, bool) -> Option<MatchBuilder> + Send + Sync>;

const REVERSE_FACTOR: f32 = 0.9;
const REVERSE_FACTOR_CONTESTED: f32 = 0.5;

/// Attaches a value to a hint word: "city Paris", "city: Paris".
///
/// A `:` between hint and value forces the pairing; the value may then be
/// unrecognized text and the hint keeps its own score. Values in front of
/// the hint ("Paris city") pair at a reduced score, lower still when the
/// hint also took a value after it.
#[derive(Clone)]
pub struct HintMatcher {
    hint: Arc<dyn Fn(&Match) -> bool + Send + Sync>,
    merge: HintMerge,
}

impl HintMatcher {
    pub fn new<H, M>(hint: H, merge: M) -> Self
    where
        H: Fn(&Match) -> bool + Send + Sync + 'static,
        M: Fn(&Arc<Match>, &Arc<Match>, bool) -> Option<MatchBuilder> + Send + Sync + 'static,
    {
        HintMatcher {
            hint: Arc::new(hint),
            merge: Arc::new(merge),
        }
    }

    /// Produces `Hint` matches pairing hints accepted by `hint` with values accepted by `value`.
    /// Unrecognized values (stubs) are always accepted.
    pub fn hints<H, V>(hint: H, value: V) -> Self
    where
        H: Fn(&Match) -> bool + Send + Sync + 'static,
        V: Fn(&Match) -> bool + Send + Sync + 'static,
    {
        HintMatcher::new(hint, move |h, v, forced| {
            if !v.is_stub() && !value(v) {
                return None;
            }
            Some(MatchBuilder::hint(Arc::clone(h), Arc::clone(v), forced))
        })
    }

    /// `<hint> [:] <value>`; returns whether any pairing was produced
    fn forward(&self, bag: &MatchBag, hint: &Arc<Match>, out: &mut Vec<Match>) -> bool {
        let seq = bag.sequence();
        let tokens = seq.tokens();
        let Some(end_idx) = seq.index_of(hint.end()) else {
            return false;
        };

        let before = out.len();
        let mut forced = false;
        for t in &tokens[end_idx + 1..] {
            match t.token_type() {
                TokenType::Separator => continue,
                TokenType::Punctuation if t.text() == ":" && !forced => {
                    forced = true;
                    continue;
                }
                TokenType::Word | TokenType::Number => {
                    let values = bag.find_by_start(t);
                    for value in &values {
                        if let Some(builder) = (self.merge)(hint, value, forced) {
                            out.push(builder
                                .matched_tokens_or(hint.matched_tokens() + value.matched_tokens())
                                .score_or((hint.score() + value.score()) / 2.0)
                                .build(hint.start().clone(), value.end().clone()));
                        }
                    }

                    if values.is_empty() {
                        let stub = Arc::new(Match::stub(t.clone(), t.clone()));
                        if let Some(builder) = (self.merge)(hint, &stub, forced) {
                            let h = hint.score();
                            let score = if forced || h < SCORE_MAYBE { h } else { (h + SCORE_MAYBE) / 2.0 };
                            out.push(builder
                                .matched_tokens_or(hint.matched_tokens() + stub.matched_tokens())
                                .score_or(score)
                                .build(hint.start().clone(), t.clone()));
                        }
                    }
                }
                _ => {}
            }
            break;
        }

        out.len() > before
    }

    /// `<value> <hint>`
    fn reverse(&self, bag: &MatchBag, hint: &Arc<Match>, contested: bool, out: &mut Vec<Match>) {
        let seq = bag.sequence();
        let Some(before_hint) = seq.prev_matching(hint.start(), |t| !t.is_separator()) else {
            return;
        };

        let factor = if contested { REVERSE_FACTOR_CONTESTED } else { REVERSE_FACTOR };
        for value in bag.find_by_end(before_hint) {
            if value.is_stub() || Arc::ptr_eq(&value, hint) {
                continue;
            }
            if let Some(builder) = (self.merge)(hint, &value, false) {
                out.push(builder
                    .matched_tokens_or(hint.matched_tokens() + value.matched_tokens())
                    .score_or_else(|| (hint.score() + value.score()) / 2.0 * factor)
                    .build(value.start().clone(), hint.end().clone()));
            }
        }
    }
}

impl Matcher for HintMatcher {
    fn first_pass_only(&self) -> bool {
        false
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let mut out = Vec::new();

        for hint in bag.matches() {
            if !(self.hint)(hint) {
                continue;
            }
            let contested = self.forward(bag, hint, &mut out);
            self.reverse(bag, hint, contested, &mut out);
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "hint"
    }
}
