pub mod comparison;
pub mod composite;
pub mod date;
pub mod exact_phrase;
pub mod group;
pub mod hint;
pub mod like_phrase;
pub mod list_contains;
pub mod merge_phrase;
pub mod number;
pub mod operators;
pub mod state;
pub mod token_filter;

use crate::core::error::Result;
use crate::matches::{Match, MatchBag};

pub use comparison::ComparisonMatcher;
pub use composite::CompositeMatcher;
pub use date::DateMatcher;
pub use exact_phrase::ExactPhraseMatcher;
pub use group::GroupMatcher;
pub use hint::HintMatcher;
pub use like_phrase::LikePhraseMatcher;
pub use list_contains::ListContainsMatcher;
pub use merge_phrase::MergePhraseMatcher;
pub use number::NumberMatcher;
pub use token_filter::TokenFilterMatcher;

/// Derives new matches from the current state of a `MatchBag`.
///
/// Implementations keep no state between calls, so one instance can serve
/// any number of concurrent recognitions.
pub trait Matcher: Send + Sync {
    /// Run once, before any other matcher
    fn first_pass_only(&self) -> bool;

    /// Keep running every generation, even after producing matches
    fn recursive(&self) -> bool;

    /// New matches for the bag's current contents
    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>>;

    fn name(&self) -> &str;
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn first_pass_only(&self) -> bool {
        (**self).first_pass_only()
    }

    fn recursive(&self) -> bool {
        (**self).recursive()
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        (**self).get_matches(bag)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
