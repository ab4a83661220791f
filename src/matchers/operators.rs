use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::matches::{ComparisonType, GroupType};

/// An operator written as words, e.g. `["greater", "than"]`
#[derive(Debug, Clone)]
pub struct PhraseOperator<T> {
    pub words: Vec<String>,
    pub op: T,
}

impl<T: Copy> PhraseOperator<T> {
    pub fn new(words: Vec<String>, op: T) -> Self {
        PhraseOperator { words, op }
    }

    pub fn from_pairs(pairs: Vec<(Vec<String>, T)>) -> Vec<Self> {
        pairs.into_iter()
            .filter(|(words, _)| !words.is_empty())
            .map(|(words, op)| PhraseOperator::new(words, op))
            .collect()
    }
}

/// A recognized operator and where it ends or starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorHit<T> {
    pub op: T,
    pub index: usize,   // Forward: first token after the operator. Backward: first operator token
    pub words: usize,   // Phrase words consumed, 0 for symbols
}

/// Tries each phrase in order, reading forward from `idx`.
///
/// Separators between words are skipped; a stop word that is not the expected
/// phrase word is skipped too.
pub fn match_phrase_forward<T: Copy>(
    tokens: &[Token],
    idx: usize,
    phrases: &[PhraseOperator<T>],
    stop_words: Option<&StopWordFilter>,
) -> Option<OperatorHit<T>> {
    phrases.iter().find_map(|phrase| {
        let mut pos = idx;
        let mut word = 0;

        while word < phrase.words.len() {
            while pos < tokens.len() && tokens[pos].is_separator() {
                pos += 1;
            }
            let token = tokens.get(pos)?;
            if token.eq_ignore_case(&phrase.words[word]) {
                word += 1;
            } else if !is_stop_word(stop_words, token) {
                return None;
            }
            pos += 1;
        }

        Some(OperatorHit { op: phrase.op, index: pos, words: phrase.words.len() })
    })
}

/// Tries each phrase in order, reading backward from `idx` (the phrase's last word)
pub fn match_phrase_backward<T: Copy>(
    tokens: &[Token],
    idx: usize,
    phrases: &[PhraseOperator<T>],
    stop_words: Option<&StopWordFilter>,
) -> Option<OperatorHit<T>> {
    phrases.iter().find_map(|phrase| {
        let mut pos = Some(idx);
        let mut first = idx;
        let mut remaining = phrase.words.len();

        while remaining > 0 {
            while let Some(p) = pos.filter(|&p| tokens[p].is_separator()) {
                pos = p.checked_sub(1);
            }
            let p = pos?;
            let token = &tokens[p];
            if token.eq_ignore_case(&phrase.words[remaining - 1]) {
                remaining -= 1;
                first = p;
            } else if !is_stop_word(stop_words, token) {
                return None;
            }
            pos = p.checked_sub(1);
        }

        Some(OperatorHit { op: phrase.op, index: first, words: phrase.words.len() })
    })
}

fn is_stop_word(stop_words: Option<&StopWordFilter>, token: &Token) -> bool {
    stop_words.is_some_and(|f| f.is_stop_word(token.text()))
}

/// Reads `=`, `==`, `<`, `<=`, `>` or `>=` at `idx`; `index` is the last symbol token
pub fn match_comparison_symbol(tokens: &[Token], idx: usize) -> Option<OperatorHit<ComparisonType>> {
    let followed_by_eq = tokens.get(idx + 1).is_some_and(|t| t.text() == "=");
    let (op, index) = match tokens.get(idx)?.text() {
        "=" if followed_by_eq => (ComparisonType::Equal, idx + 1),
        "=" => (ComparisonType::Equal, idx),
        ">" if followed_by_eq => (ComparisonType::GreaterThanOrEqual, idx + 1),
        ">" => (ComparisonType::GreaterThan, idx),
        "<" if followed_by_eq => (ComparisonType::LessThanOrEqual, idx + 1),
        "<" => (ComparisonType::LessThan, idx),
        _ => return None,
    };
    Some(OperatorHit { op, index, words: 0 })
}

/// Reads `&&` or `||` at `idx`; `index` is the second symbol token
pub fn match_group_symbol(tokens: &[Token], idx: usize) -> Option<OperatorHit<GroupType>> {
    let first = tokens.get(idx)?.text();
    let second = tokens.get(idx + 1)?.text();
    let op = match (first, second) {
        ("&", "&") => GroupType::And,
        ("|", "|") => GroupType::Or,
        _ => return None,
    };
    Some(OperatorHit { op, index: idx + 1, words: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

    fn phrases() -> Vec<PhraseOperator<ComparisonType>> {
        PhraseOperator::from_pairs(vec![
            (vec!["less".to_string(), "than".to_string()], ComparisonType::LessThan),
            (vec!["less".to_string()], ComparisonType::LessThan),
            (vec!["over".to_string()], ComparisonType::GreaterThan),
        ])
    }

    #[test]
    fn test_forward_phrase() {
        let tokens = StandardTokenizer.tokenize("x less than 5");
        let hit = match_phrase_forward(&tokens, 1, &phrases(), None).unwrap();
        assert_eq!(hit.op, ComparisonType::LessThan);
        assert_eq!(hit.words, 2);
        assert_eq!(tokens[hit.index].text(), " ");
    }

    #[test]
    fn test_forward_skips_stop_words() {
        let tokens = StandardTokenizer.tokenize("x is over 5");
        let stop = StopWordFilter::new(vec!["is".to_string()]);
        assert!(match_phrase_forward(&tokens, 1, &phrases(), None).is_none());
        let hit = match_phrase_forward(&tokens, 1, &phrases(), Some(&stop)).unwrap();
        assert_eq!(hit.op, ComparisonType::GreaterThan);
    }

    #[test]
    fn test_backward_phrase_at_start() {
        let tokens = StandardTokenizer.tokenize("less than 5 items");
        let hit = match_phrase_backward(&tokens, 2, &phrases(), None).unwrap();
        assert_eq!(hit.op, ComparisonType::LessThan);
        assert_eq!(hit.index, 0);
        assert_eq!(hit.words, 2);
    }

    #[test]
    fn test_symbols() {
        let tokens = StandardTokenizer.tokenize("a>=1&&b||c");
        let cmp = match_comparison_symbol(&tokens, 1).unwrap();
        assert_eq!(cmp.op, ComparisonType::GreaterThanOrEqual);
        assert_eq!(cmp.index, 2);
        assert_eq!(match_group_symbol(&tokens, 4).unwrap().op, GroupType::And);
        assert_eq!(match_group_symbol(&tokens, 7).unwrap().op, GroupType::Or);
        assert!(match_group_symbol(&tokens, 5).is_none());
    }
}
