use std::sync::Arc;
use crate::analysis::token::TokenType;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matchers::operators::{match_group_symbol, match_phrase_forward, OperatorHit, PhraseOperator};
use crate::matches::{GroupMatch, GroupType, Match, MatchBag, MatchBuilder};

pub type GroupPredicate = Arc<dyn Fn(&Match, &MatchBag) -> bool + Send + Sync>;
pub type GroupMerge =
    Arc<dyn Fn(&Arc<Match>, GroupType, &Arc<Match>, &MatchBag) -> Option<MatchBuilder> + Send + Sync>;

/// Joins `<left> and <right>` / `<left> || <right>` into a group.
///
/// Returns at most one new group per call and never regroups a (left, right)
/// pair the bag already holds; the recognizer keeps calling it every
/// generation, so chains like "a or b or c" nest one level at a time until
/// nothing new can be formed.
#[derive(Clone)]
pub struct GroupMatcher {
    left: GroupPredicate,
    merge: GroupMerge,
    pub phrases: Vec<PhraseOperator<GroupType>>,
}

impl GroupMatcher {
    pub fn new<L, M>(left: L, merge: M) -> Self
    where
        L: Fn(&Match, &MatchBag) -> bool + Send + Sync + 'static,
        M: Fn(&Arc<Match>, GroupType, &Arc<Match>, &MatchBag) -> Option<MatchBuilder> + Send + Sync + 'static,
    {
        GroupMatcher {
            left: Arc::new(left),
            merge: Arc::new(merge),
            phrases: Vec::new(),
        }
    }

    /// Groups any two matches accepted by `accept`
    pub fn groups<P>(accept: P) -> Self
    where
        P: Fn(&Match) -> bool + Send + Sync + 'static,
    {
        let accept = Arc::new(accept);
        let accept_right = Arc::clone(&accept);
        GroupMatcher::new(
            move |m, _| accept(m),
            move |left, group, right, _| {
                accept_right(right)
                    .then(|| MatchBuilder::group(group, vec![Arc::clone(left), Arc::clone(right)]))
            },
        )
    }

    pub fn with_phrases(mut self, phrases: Vec<(Vec<String>, GroupType)>) -> Self {
        self.phrases = PhraseOperator::from_pairs(phrases);
        self
    }

    /// AND/OR phrases from `config`
    pub fn configured(self, config: &Config) -> Self {
        self.with_phrases(config.operators.group_phrases())
    }

    fn merged(&self, bag: &MatchBag, left: &Arc<Match>, op: OperatorHit<GroupType>, right: &Arc<Match>) -> Option<Match> {
        let builder = (self.merge)(left, op.op, right, bag)?;
        let m = builder
            .matched_tokens_or(left.matched_tokens() + op.words + right.matched_tokens())
            .score_or((left.score() + right.score()) / 2.0)
            .build(left.start().clone(), right.end().clone());
        Some(m)
    }

    fn first_group(&self, bag: &MatchBag, left: &Arc<Match>) -> Option<Match> {
        let seq = bag.sequence();
        let tokens = seq.tokens();
        let end_idx = seq.index_of(left.end())?;

        let mut op: Option<OperatorHit<GroupType>> = None;
        let mut i = end_idx + 1;
        while i + 1 < tokens.len() {
            let t = &tokens[i];
            match t.token_type() {
                TokenType::Separator => {
                    i += 1;
                    continue;
                }
                TokenType::Math => {
                    if let Some(hit) = match_group_symbol(tokens, i) {
                        i = hit.index + 1;
                        op = Some(hit);
                        continue;
                    }
                }
                TokenType::Word | TokenType::Number => match op {
                    Some(op) => {
                        return bag.find_by_start(t)
                            .iter()
                            .filter(|right| !GroupMatch::is_already_grouped(bag, left, right))
                            .find_map(|right| self.merged(bag, left, op, right));
                    }
                    None => {
                        if let Some(hit) = match_phrase_forward(tokens, i, &self.phrases, None) {
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

        None
    }
}

impl Matcher for GroupMatcher {
    fn first_pass_only(&self) -> bool {
        false
    }

    fn recursive(&self) -> bool {
        true
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let group = bag.matches()
            .iter()
            .filter(|m| (self.left)(m, bag))
            .find_map(|left| self.first_group(bag, left));

        Ok(group.into_iter().collect())
    }

    fn name(&self) -> &str {
        "group"
    }
}
