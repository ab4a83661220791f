pub mod core;
pub mod analysis;
pub mod matches;
pub mod matchers;
pub mod recognizer;
pub mod search;

pub use crate::analysis::analyzer::Analyzer;
pub use crate::analysis::sequence::TokenSequence;
pub use crate::analysis::token::{Token, TokenType};
pub use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
pub use crate::core::config::{Config, RecognizerConfig};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::matchers::Matcher;
pub use crate::matches::{Match, MatchBag, MatchBuilder, MatchKind};
pub use crate::recognizer::Recognizer;
pub use crate::search::{ScoredCombination, TopSet};

/*
┌──────────────────────────────────────────────────────────────────────────────────┐
│                          NLQ RECOGNIZER ARCHITECTURE                             │
└──────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── ANALYSIS LAYER ──────────────────────────────────┐
│                                                                                  │
│  text ──► StandardTokenizer ──► parse_quoted_constants ──► TokenFilters          │
│                                                               │                  │
│  ┌─────────────────────┐  ┌──────────────────────────┐       ▼                  │
│  │ struct Token        │  │ struct TokenSequence     │◄── Analyzer::analyze     │
│  │ • text / lowercase  │  │ • tokens: Vec<Token>     │                          │
│  │ • offset (bytes)    │  │ • index: token ► idx     │                          │
│  │ • token_type        │  └──────────────────────────┘                          │
│  └─────────────────────┘                                                         │
└──────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────── MATCH LAYER ────────────────────────────────────┐
│                                                                                  │
│  ┌──────────────────────────┐  ┌──────────────────────────────────────────┐     │
│  │ struct Match (immutable) │  │ struct MatchBag<'a>                      │     │
│  │ • score: f32             │  │ • sequence: &TokenSequence               │     │
│  │ • start / end: Token     │  │ • matches: Vec<Arc<Match>>  (append-only)│     │
│  │ • matched_tokens         │  │ • by_start / by_end: Token ► [idx]       │     │
│  │ • kind: MatchKind        │  └──────────────────────────────────────────┘     │
│  └──────────────────────────┘                                                    │
│  MatchKind: Number | Date | DateOffset | Key | Comparison | Group | Hint | Stub  │
└──────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── MATCHER LAYER ───────────────────────────────────┐
│                                                                                  │
│  trait Matcher { first_pass_only, recursive, get_matches(&MatchBag) }           │
│                                                                                  │
│  first pass:  Number  Date  ExactPhrase  LikePhrase  ListContains                │
│  fixed point: Comparison  Group (recursive)  Hint  MergePhrase                   │
│  wrappers:    Composite  TokenFilter                                             │
│                                                                                  │
│  state machines: MatchState::advance(token) ──► Transition { next, result }     │
└──────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── RECOGNIZER LAYER ─────────────────────────────────┐
│                                                                                  │
│  Recognizer                                                                      │
│  ├─ Phase A: first-pass queue, once, against the empty bag                       │
│  ├─ Phase B: fixed-point queue, generations until nothing new (max_passes)       │
│  └─ Phase C: CombinationSearch, DFS over start tokens ──► handler(&[Arc<Match>])│
│                                                                                  │
│  TopSet<T, C> / ScoredCombination: bounded ranking for callers                   │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
