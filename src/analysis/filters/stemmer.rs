use rust_stemmers::Algorithm;

/// Reduces a word to its stem
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Snowball stemmer backed by `rust_stemmers`
#[derive(Clone, Copy)]
pub struct SnowballStemmer {
    pub algorithm: Algorithm,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        SnowballStemmer { algorithm }
    }

    pub fn english() -> Self {
        SnowballStemmer::new(Algorithm::English)
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        let stemmer = rust_stemmers::Stemmer::create(self.algorithm);
        stemmer.stem(&word.to_lowercase()).into_owned()
    }
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }
}
