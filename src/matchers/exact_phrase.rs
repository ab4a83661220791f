use crate::analysis::token::{Token, TokenType};
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matchers::state::{run_state_machine, MatchState, Transition};
use crate::matches::{Match, MatchBag, MatchBuilder, SCORE_CERTAIN};

/// Matches a fixed word sequence, case-insensitively, e.g. "last month"
#[derive(Debug, Clone)]
pub struct ExactPhraseMatcher {
    pub words: Vec<String>,
    pub template: MatchBuilder,    // Cloned for every hit
    pub allow_separators: bool,    // Whitespace allowed between words
}

impl ExactPhraseMatcher {
    pub fn new(words: Vec<String>, template: impl Into<MatchBuilder>) -> Self {
        ExactPhraseMatcher {
            words,
            template: template.into(),
            allow_separators: true,
        }
    }

    /// Splits `phrase` on whitespace
    pub fn phrase(phrase: &str, template: impl Into<MatchBuilder>) -> Self {
        ExactPhraseMatcher::new(phrase.split_whitespace().map(String::from).collect(), template)
    }

    pub fn allow_separators(mut self, allow: bool) -> Self {
        self.allow_separators = allow;
        self
    }

    fn hit(&self, start: Token, end: Token) -> Match {
        self.template.clone()
            .score(SCORE_CERTAIN)
            .matched_tokens_or(self.words.len())
            .build(start, end)
    }

    fn word_at(&self, idx: usize, token: &Token) -> bool {
        !token.is_empty() && token.eq_ignore_case(&self.words[idx])
    }
}

impl Matcher for ExactPhraseMatcher {
    fn first_pass_only(&self) -> bool {
        true
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let tokens = bag.sequence().tokens();

        match self.words.len() {
            0 => Ok(Vec::new()),
            1 => Ok(tokens.iter()
                .filter(|t| self.word_at(0, t))
                .map(|t| self.hit(t.clone(), t.clone()))
                .collect()),
            _ => run_state_machine(tokens, PhraseState { matcher: self, start: None, end: None, next_word: 0 }),
        }
    }

    fn name(&self) -> &str {
        "exact_phrase"
    }
}

#[derive(Clone)]
struct PhraseState<'m> {
    matcher: &'m ExactPhraseMatcher,
    start: Option<Token>,
    end: Option<Token>,
    next_word: usize,
}

impl MatchState for PhraseState<'_> {
    fn advance(mut self, token: &Token) -> Result<Transition<Self>> {
        let mut transition = Transition::new();
        let words = self.matcher.words.len();

        if self.start.is_none() {
            transition.push(self.clone());
            if self.matcher.word_at(0, token) {
                transition.push(PhraseState {
                    matcher: self.matcher,
                    start: Some(token.clone()),
                    end: Some(token.clone()),
                    next_word: 1,
                });
            }
            return Ok(transition);
        }

        if self.matcher.word_at(self.next_word, token) {
            self.end = Some(token.clone());
            self.next_word += 1;
            if self.next_word < words {
                transition.push(self);
            } else if let (Some(start), Some(end)) = (self.start, self.end) {
                transition.result = Some(self.matcher.hit(start, end));
            }
        } else if token.is(TokenType::Separator) && self.matcher.allow_separators {
            transition.push(self);
        }

        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::test_util::{run, seq};
    use crate::matches::{DateOffsetMatch, MatchKind};

    #[test]
    fn test_single_word() {
        let m = ExactPhraseMatcher::phrase("yesterday", MatchKind::DateOffset(DateOffsetMatch::days(-1)));
        let matches = run(&m, &seq("sales Yesterday and yesterday"));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].to_string(), "DateOffset[Y:0 M:0 D:-1]");
        assert_eq!(matches[0].score(), SCORE_CERTAIN);
    }

    #[test]
    fn test_multi_word_with_separators() {
        let m = ExactPhraseMatcher::phrase("last month", MatchKind::DateOffset(DateOffsetMatch::months(-1)));
        let matches = run(&m, &seq("orders last   month, last year"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start().text(), "last");
        assert_eq!(matches[0].end().text(), "month");
        assert_eq!(matches[0].matched_tokens(), 2);
    }

    #[test]
    fn test_separators_disallowed() {
        let m = ExactPhraseMatcher::new(
            vec!["e".to_string(), "-".to_string(), "mail".to_string()],
            MatchBuilder::key("email"),
        ).allow_separators(false);
        assert_eq!(run(&m, &seq("send e-mail")).len(), 1);
        assert!(run(&m, &seq("send e - mail")).is_empty());
    }

    #[test]
    fn test_words_in_order_only() {
        let m = ExactPhraseMatcher::phrase("new york", MatchBuilder::key("ny"));
        assert!(run(&m, &seq("york new")).is_empty());
        assert_eq!(run(&m, &seq("NEW YORK")).len(), 1);
    }
}
