use std::collections::HashSet;
use std::sync::Arc;
use crate::analysis::filters::stemmer::Stemmer;
use crate::analysis::token::{Token, TokenType};
use crate::core::error::Result;
use crate::matchers::Matcher;
use crate::matches::{Match, MatchBag, MatchBuilder};

const BOOST_PREFIX: char = '@';
const BOOST_FACTOR: f32 = 1.5;

/// Fuzzy phrase matcher: some of the phrase words, in any order, possibly
/// partial ("sale" for "sales").
///
/// A word prefixed with `@` is a boost word. It only hits on an exact
/// (case-insensitive) token and scores 1.5 times a full word hit.
#[derive(Clone)]
pub struct LikePhraseMatcher {
    words: Vec<PhraseWord>,
    template: MatchBuilder,
    total_length: usize,       // Characters in regular words
    phrase_words: usize,       // Regular words, plus one if any boost word exists
    pub weight_by_total_length: bool,
    pub stemmer: Option<Arc<dyn Stemmer>>,
}

#[derive(Debug, Clone)]
struct PhraseWord {
    text: String,        // Lower case, boost prefix kept
    chars: usize,
    boost: bool,
}

struct Hit {
    word: usize,
    score: f32,
}

impl LikePhraseMatcher {
    pub fn new(words: Vec<String>, template: impl Into<MatchBuilder>) -> Self {
        let words: Vec<PhraseWord> = words.into_iter()
            .map(|w| {
                let text = w.to_lowercase();
                PhraseWord {
                    chars: text.chars().count(),
                    boost: text.starts_with(BOOST_PREFIX),
                    text,
                }
            })
            .collect();

        let regular: Vec<&PhraseWord> = words.iter().filter(|w| !w.boost && w.chars > 0).collect();
        let total_length = regular.iter().map(|w| w.chars).sum();
        let has_boost = words.iter().any(|w| w.boost);
        let phrase_words = regular.len() + usize::from(has_boost);

        LikePhraseMatcher {
            words,
            template: template.into(),
            total_length,
            phrase_words,
            weight_by_total_length: false,
            stemmer: None,
        }
    }

    pub fn with_stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    pub fn weight_by_total_length(mut self, enabled: bool) -> Self {
        self.weight_by_total_length = enabled;
        self
    }

    fn word_score(&self, word: usize, matched_chars: usize, at: usize) -> f32 {
        let mut score = if self.weight_by_total_length {
            matched_chars as f32 / self.total_length.max(1) as f32
        } else {
            let word_score = matched_chars as f32 / self.words[word].chars.max(1) as f32;
            word_score / self.phrase_words.max(1) as f32
        };
        if at > 0 {
            score /= 2.0;
        }
        score
    }

    /// First phrase word the token hits, with its score
    fn like(&self, token: &Token) -> Option<Hit> {
        let text = token.lowercase();

        for (i, word) in self.words.iter().enumerate() {
            if word.boost {
                if word.text[BOOST_PREFIX.len_utf8()..] == *text {
                    return Some(Hit { word: i, score: self.word_score(i, word.chars, 0) * BOOST_FACTOR });
                }
                continue;
            }

            if let Some(at) = word.text.find(text) {
                return Some(Hit { word: i, score: self.word_score(i, text.chars().count(), at) });
            }

            if let Some(stemmer) = &self.stemmer {
                let stem = stemmer.stem(text);
                if stem != text {
                    if let Some(at) = stemmer.stem(&word.text).find(&stem) {
                        return Some(Hit { word: i, score: self.word_score(i, stem.chars().count(), at) });
                    }
                }
            }
        }

        None
    }
}

struct Run {
    start: Option<Token>,
    end: Option<Token>,
    score: f32,
    words: HashSet<usize>,
}

impl Run {
    fn new() -> Self {
        Run { start: None, end: None, score: 0.0, words: HashSet::new() }
    }

    fn flush(&mut self, template: &MatchBuilder, out: &mut Vec<Match>) {
        let run = std::mem::replace(self, Run::new());
        if let (Some(start), Some(end)) = (run.start, run.end) {
            out.push(template.clone()
                .score(run.score)
                .matched_tokens(run.words.len())
                .build(start, end));
        }
    }
}

impl Matcher for LikePhraseMatcher {
    fn first_pass_only(&self) -> bool {
        true
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let mut out = Vec::new();
        let mut run = Run::new();

        for token in bag.sequence().tokens() {
            match token.token_type() {
                TokenType::Separator => continue,
                TokenType::Word | TokenType::Number => match self.like(token) {
                    Some(hit) => {
                        if run.words.contains(&hit.word) {
                            run.flush(&self.template, &mut out);
                        }
                        run.words.insert(hit.word);
                        run.start.get_or_insert_with(|| token.clone());
                        run.end = Some(token.clone());
                        run.score += hit.score;
                    }
                    None => run.flush(&self.template, &mut out),
                },
                _ => run.flush(&self.template, &mut out),
            }
        }
        run.flush(&self.template, &mut out);

        Ok(out)
    }

    fn name(&self) -> &str {
        "like_phrase"
    }
}
