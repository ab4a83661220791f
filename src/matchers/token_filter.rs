use crate::analysis::filter::TokenFilter;
use crate::analysis::sequence::TokenSequence;
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag};

/// Runs a matcher over a filtered view of the token sequence.
///
/// The inner matcher sees only the tokens the filter keeps, together with
/// every existing match. Tokens keep their offsets, so its matches remain
/// valid against the unfiltered sequence.
pub struct TokenFilterMatcher {
    matcher: Box<dyn Matcher>,
    filter: Box<dyn TokenFilter>,
}

impl TokenFilterMatcher {
    pub fn new(matcher: impl Matcher + 'static, filter: impl TokenFilter + 'static) -> Self {
        TokenFilterMatcher {
            matcher: Box::new(matcher),
            filter: Box::new(filter),
        }
    }
}

impl Matcher for TokenFilterMatcher {
    fn first_pass_only(&self) -> bool {
        self.matcher.first_pass_only()
    }

    fn recursive(&self) -> bool {
        self.matcher.recursive()
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let tokens = self.filter.filter(bag.sequence().tokens().to_vec());
        let filtered = TokenSequence::new(tokens);
        let view = MatchBag::with_matches(&filtered, bag.matches().iter().cloned());
        self.matcher.get_matches(&view)
    }

    fn name(&self) -> &str {
        self.matcher.name()
    }
}
