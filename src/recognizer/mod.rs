pub mod combinations;

use std::sync::Arc;
use tracing::{debug, trace, warn};
use crate::analysis::sequence::TokenSequence;
use crate::core::config::{Config, RecognizerConfig};
use crate::core::error::{Error, Result};
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag};
use combinations::CombinationSearch;

/// Runs matchers over a token sequence and enumerates the combinations of
/// non-overlapping matches they produce.
///
/// Matchers are split into two queues on construction: first-pass matchers
/// run once against an empty bag, the rest run in generations until a
/// generation adds nothing.
pub struct Recognizer {
    first_pass: Vec<Box<dyn Matcher>>,
    fixed_point: Vec<Box<dyn Matcher>>,
    pub config: RecognizerConfig,
}

impl Recognizer {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Recognizer::with_config(matchers, RecognizerConfig::default())
    }

    pub fn with_config(matchers: Vec<Box<dyn Matcher>>, config: RecognizerConfig) -> Self {
        let (first_pass, fixed_point) = matchers.into_iter().partition(|m| m.first_pass_only());
        Recognizer {
            first_pass,
            fixed_point,
            config,
        }
    }

    pub fn from_config(matchers: Vec<Box<dyn Matcher>>, config: &Config) -> Self {
        Recognizer::with_config(matchers, config.recognizer.clone())
    }

    pub fn include_zero_matches(mut self, include: bool) -> Self {
        self.config.include_zero_matches = include;
        self
    }

    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Number of matchers in both queues
    pub fn matcher_count(&self) -> usize {
        self.first_pass.len() + self.fixed_point.len()
    }

    /// Runs every matcher to a fixed point and returns the filled bag
    pub fn collect_matches<'a>(&self, sequence: &'a TokenSequence) -> Result<MatchBag<'a>> {
        let mut bag = MatchBag::new(sequence);

        // first-pass matchers all see the empty bag
        let mut first = Vec::new();
        for matcher in &self.first_pass {
            let found = matcher.get_matches(&bag)?;
            trace!(matcher = matcher.name(), matches = found.len(), "first pass");
            first.extend(found);
        }
        for m in first {
            bag.add(m);
        }

        self.run_to_fixed_point(&mut bag)?;
        debug!(tokens = sequence.len(), matches = bag.len(), "matching finished");
        Ok(bag)
    }

    fn run_to_fixed_point(&self, bag: &mut MatchBag) -> Result<()> {
        let mut queue: Vec<&dyn Matcher> = self.fixed_point.iter().map(|m| m.as_ref()).collect();

        for generation in 0..self.config.max_passes {
            let mut produced = 0;
            let mut next = Vec::with_capacity(queue.len());

            for matcher in queue {
                let found = matcher.get_matches(bag)?;
                if found.is_empty() || matcher.recursive() {
                    next.push(matcher);
                }
                produced += found.len();
                for m in found {
                    bag.add(m);
                }
            }

            trace!(generation, produced, queued = next.len(), "generation done");
            if produced == 0 {
                return Ok(());
            }
            queue = next;
        }

        warn!(max_passes = self.config.max_passes, matches = bag.len(), "matchers did not converge");
        Err(Error::pass_limit(self.config.max_passes))
    }

    /// Calls `handler` with every combination, left to right, until it returns `false`
    pub fn recognize<H>(&self, sequence: &TokenSequence, handler: H) -> Result<()>
    where
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        self.recognize_with(sequence, None, handler)
    }

    /// As `recognize`, considering only matches accepted by `filter`
    pub fn recognize_filtered<P, H>(&self, sequence: &TokenSequence, filter: P, handler: H) -> Result<()>
    where
        P: Fn(&Match) -> bool,
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        self.recognize_with(sequence, Some(&filter), handler)
    }

    /// Collects every combination
    pub fn combinations(&self, sequence: &TokenSequence) -> Result<Vec<Vec<Arc<Match>>>> {
        let mut all = Vec::new();
        self.recognize(sequence, |combination| {
            all.push(combination.to_vec());
            true
        })?;
        Ok(all)
    }

    fn recognize_with<H>(
        &self,
        sequence: &TokenSequence,
        filter: Option<&dyn Fn(&Match) -> bool>,
        mut handler: H,
    ) -> Result<()>
    where
        H: FnMut(&[Arc<Match>]) -> bool,
    {
        let bag = self.collect_matches(sequence)?;
        let matches = bag.matches()
            .iter()
            .filter(|m| filter.is_none_or(|f| f(m)))
            .cloned();

        let search = CombinationSearch::new(sequence, matches, self.config.include_zero_matches);
        let completed = search.run(&mut handler);
        debug!(completed, "combination search finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
    use crate::core::error::ErrorKind;
    use crate::matchers::{ComparisonMatcher, ExactPhraseMatcher, GroupMatcher, NumberMatcher};
    use crate::matches::MatchBuilder;

    fn seq(text: &str) -> TokenSequence {
        TokenSequence::new(StandardTokenizer.tokenize(text))
    }

    fn describe(combination: &[Arc<Match>]) -> String {
        combination.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(",")
    }

    fn simple() -> Recognizer {
        Recognizer::new(vec![
            Box::new(ExactPhraseMatcher::phrase("sales", MatchBuilder::key("sales"))),
            Box::new(NumberMatcher),
        ])
    }

    /// Re-emits a copy of the first match forever
    struct Echo;

    impl Matcher for Echo {
        fn first_pass_only(&self) -> bool {
            false
        }

        fn recursive(&self) -> bool {
            true
        }

        fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
            Ok(bag.matches().first().map(|m| (**m).clone()).into_iter().collect())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_queues_split_by_first_pass() {
        let r = Recognizer::new(vec![
            Box::new(NumberMatcher),
            Box::new(ComparisonMatcher::comparisons(|_| true)),
        ]);
        assert_eq!(r.first_pass.len(), 1);
        assert_eq!(r.fixed_point.len(), 1);
        assert_eq!(r.matcher_count(), 2);
    }

    #[test]
    fn test_single_combination_for_unambiguous_input() {
        let all = simple().combinations(&seq("sales 100")).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(describe(&all[0]), "Key[sales],Number[100]");
    }

    #[test]
    fn test_no_matches_yields_one_empty_combination() {
        let all = simple().combinations(&seq("nothing here")).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_empty());
    }

    #[test]
    fn test_zero_matches_fill_gaps() {
        let r = simple().include_zero_matches(true);
        let all = r.combinations(&seq("show sales for 2017 now")).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            describe(&all[0]),
            "StubMatch[show],Key[sales],StubMatch[for],Number[2017],StubMatch[now]"
        );
    }

    #[test]
    fn test_cancellation_stops_enumeration() {
        let r = Recognizer::new(vec![Box::new(NumberMatcher)]);
        let s = seq("1.5 2.5");
        assert!(r.combinations(&s).unwrap().len() > 1);

        let mut calls = 0;
        r.recognize(&s, |_| {
            calls += 1;
            false
        }).unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_filter_excludes_matches() {
        let mut seen = Vec::new();
        simple().recognize_filtered(&seq("sales 100"), |m| m.as_number().is_none(), |c| {
            seen.push(describe(c));
            true
        }).unwrap();
        assert_eq!(seen, vec!["Key[sales]".to_string()]);
    }

    #[test]
    fn test_fixed_point_adds_derived_matches() {
        let r = Recognizer::new(vec![
            Box::new(ExactPhraseMatcher::phrase("price", MatchBuilder::key("price"))),
            Box::new(NumberMatcher),
            Box::new(ComparisonMatcher::comparisons(|m| m.as_key().is_some())
                .configured(&Config::default())),
        ]);
        let s = seq("price over 10");
        let bag = r.collect_matches(&s).unwrap();
        assert_eq!(bag.len(), 3);

        let all = r.combinations(&s).unwrap();
        assert_eq!(describe(&all[0]), "Comparison[Key[price] GreaterThan Number[10]]");
        assert!(all.iter().any(|c| describe(c) == "Key[price],Number[10]"));
    }

    #[test]
    fn test_cyclic_matcher_hits_pass_limit() {
        let r = Recognizer::new(vec![Box::new(NumberMatcher), Box::new(Echo)]).max_passes(5);
        let err = r.recognize(&seq("1"), |_| true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PassLimitExceeded);
    }

    #[test]
    fn test_recursive_matcher_without_output_terminates() {
        let r = Recognizer::new(vec![Box::new(Echo)]);
        assert_eq!(r.combinations(&seq("abc")).unwrap().len(), 1);
    }

    #[test]
    fn test_custom_group_merge_converges() {
        let always = GroupMatcher::new(
            |_, _| true,
            |left, group, right, _| Some(MatchBuilder::group(group, vec![Arc::clone(left), Arc::clone(right)])),
        ).configured(&Config::default());
        let r = Recognizer::new(vec![Box::new(NumberMatcher), Box::new(always)]);
        let s = seq("1 or 2");

        let bag = r.collect_matches(&s).unwrap();
        let groups: Vec<String> = bag.matches().iter()
            .filter(|m| m.as_group().is_some())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(groups, vec!["Group[Or:Number[1];Number[2]]".to_string()]);

        let all = r.combinations(&s).unwrap();
        assert_eq!(describe(&all[0]), "Group[Or:Number[1];Number[2]]");
    }
}
