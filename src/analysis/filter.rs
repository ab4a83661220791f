use std::sync::Arc;
use crate::analysis::token::Token;

pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn TokenFilter>;
}

/// Keeps the tokens accepted by a predicate
#[derive(Clone)]
pub struct PredicateFilter {
    pub predicate: Arc<dyn Fn(&Token) -> bool + Send + Sync>,
    pub name: String,
}

impl PredicateFilter {
    pub fn new<P>(name: &str, predicate: P) -> Self
    where
        P: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        PredicateFilter {
            predicate: Arc::new(predicate),
            name: name.to_string(),
        }
    }
}

impl TokenFilter for PredicateFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .filter(|t| (self.predicate)(t))
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(self.clone())
    }
}
