use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag};

/// Runs several matchers as one and concatenates their output.
///
/// The composite is first-pass-only when every child is, and recursive when
/// any child is.
pub struct CompositeMatcher {
    matchers: Vec<Box<dyn Matcher>>,
    name: String,
}

impl CompositeMatcher {
    pub fn new(name: &str) -> Self {
        CompositeMatcher {
            matchers: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn with(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn add(&mut self, matcher: Box<dyn Matcher>) {
        self.matchers.push(matcher);
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for CompositeMatcher {
    fn first_pass_only(&self) -> bool {
        !self.matchers.is_empty() && self.matchers.iter().all(|m| m.first_pass_only())
    }

    fn recursive(&self) -> bool {
        self.matchers.iter().any(|m| m.recursive())
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let mut out = Vec::new();
        for matcher in &self.matchers {
            out.extend(matcher.get_matches(bag)?);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
