use std::sync::Arc;
use crate::analysis::token::{Token, TokenType};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{ContainsType, Match, MatchBag, MatchBuilder, MatchKind};

/// Builds the match payload for a token found inside `values[index]`
pub type ContainsFactory = Arc<dyn Fn(ContainsType, usize, &str) -> MatchKind + Send + Sync>;

/// Finds tokens contained in a list of values, e.g. city names.
///
/// Every word or number token is tested against every value. A token that
/// hits many values only yields its first `max_score_filter_threshold`
/// matches plus any later match that beats its best score so far; the rest
/// are kept only for values that matched more than one token.
#[derive(Clone)]
pub struct ListContainsMatcher {
    values: Vec<String>,
    lower_values: Vec<String>,
    factory: ContainsFactory,
    pub max_score_filter_threshold: usize,
}

impl ListContainsMatcher {
    pub fn new<F>(values: Vec<String>, factory: F) -> Self
    where
        F: Fn(ContainsType, usize, &str) -> MatchKind + Send + Sync + 'static,
    {
        let lower_values = values.iter().map(|v| v.to_lowercase()).collect();
        ListContainsMatcher {
            values,
            lower_values,
            factory: Arc::new(factory),
            max_score_filter_threshold: 10,
        }
    }

    /// Tags every hit with the matched value as a `Key`
    pub fn keyed(values: Vec<String>) -> Self {
        ListContainsMatcher::new(values, |_, _, value| MatchKind::key(value))
    }

    pub fn threshold(mut self, threshold: usize) -> Self {
        self.max_score_filter_threshold = threshold;
        self
    }

    pub fn configured(self, config: &Config) -> Self {
        self.threshold(config.list_contains_threshold)
    }

    /// Containment type and score of `token` inside value `i`
    fn score(&self, i: usize, token: &Token) -> Option<(ContainsType, f32)> {
        let value = &self.lower_values[i];
        let text = token.lowercase();
        let at = value.find(text)?;

        let value_chars = value.chars().count();
        let token_chars = text.chars().count();
        let contains = if at > 0 {
            ContainsType::Contains
        } else if value_chars == token_chars {
            ContainsType::Exact
        } else {
            ContainsType::StartsWith
        };

        let before = value[..at].chars().next_back();
        let after = value[at + text.len()..].chars().next();
        let is_boundary = |c: Option<char>| c.is_none_or(|c| !c.is_alphanumeric());

        let mut score = token_chars as f32 / value_chars as f32;
        if token.is(TokenType::Number) {
            if !is_boundary(before) {
                score /= 2.0;
            }
            if !is_boundary(after) {
                score /= 2.0;
            }
        } else if !is_boundary(before) {
            score /= 2.0;
        }

        Some((contains, score))
    }
}

impl Matcher for ListContainsMatcher {
    fn first_pass_only(&self) -> bool {
        true
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let tokens: Vec<&Token> = bag.sequence().tokens().iter()
            .filter(|t| t.token_type().is_word_or_number())
            .collect();

        let mut token_hits = vec![0usize; tokens.len()];
        let mut token_best = vec![0f32; tokens.len()];
        let mut out = Vec::new();

        for (i, value) in self.values.iter().enumerate() {
            let mut value_hits = 0;
            let mut deferred = Vec::new();

            for (t_idx, token) in tokens.iter().enumerate() {
                let Some((contains, score)) = self.score(i, token) else {
                    continue;
                };

                let m = MatchBuilder::new((self.factory)(contains, i, value.as_str()))
                    .score(score)
                    .build((*token).clone(), (*token).clone());

                value_hits += 1;
                token_hits[t_idx] += 1;
                let is_new_best = score > token_best[t_idx];
                if is_new_best {
                    token_best[t_idx] = score;
                }

                if token_hits[t_idx] <= self.max_score_filter_threshold || is_new_best {
                    out.push(m);
                } else {
                    deferred.push(m);
                }
            }

            if value_hits > 1 {
                out.append(&mut deferred);
            }
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "list_contains"
    }
}
