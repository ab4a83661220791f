pub mod analyzer;
pub mod filter;
pub mod filters;
pub mod ngram;
pub mod sequence;
pub mod token;
pub mod tokenizer;
