pub mod bag;

use std::fmt;
use std::sync::Arc;
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};
use crate::analysis::token::Token;

pub use bag::MatchBag;

/// No evidence either way
pub const SCORE_MAYBE: f32 = 0.5;
/// Unambiguous hit
pub const SCORE_CERTAIN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonType {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupType {
    And,
    Or,
}

/// How a token sits inside a dictionary value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainsType {
    Contains,
    StartsWith,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberMatch {
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateMatch {
    pub year: Option<i32>,
    pub month: Option<u32>,   // 1-12
    pub day: Option<u32>,     // 1-31
}

impl DateMatch {
    pub fn filled_slots(&self) -> usize {
        [self.year.is_some(), self.month.is_some(), self.day.is_some()]
            .iter()
            .filter(|s| **s)
            .count()
    }
}

/// Date relative to a base date, e.g. "last month" is `months: -1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOffsetMatch {
    pub years: Option<i32>,
    pub months: Option<i32>,
    pub days: Option<i32>,
}

impl DateOffsetMatch {
    pub fn years(years: i32) -> Self {
        DateOffsetMatch { years: Some(years), months: None, days: None }
    }

    pub fn months(months: i32) -> Self {
        DateOffsetMatch { years: Some(0), months: Some(months), days: None }
    }

    pub fn days(days: i32) -> Self {
        DateOffsetMatch { years: Some(0), months: Some(0), days: Some(days) }
    }

    /// Applies the offset to `base`.
    ///
    /// Precision follows the finest offset present: a day offset yields a full
    /// date, a month offset yields year and month, a year offset only the year.
    /// Returns `None` when the arithmetic leaves chrono's date range.
    pub fn resolve(&self, base: NaiveDate) -> Option<DateMatch> {
        let mut date = base;

        if let Some(years) = self.years {
            date = shift_months(date, years.checked_mul(12)?)?;
        }
        if let Some(months) = self.months {
            date = shift_months(date, months)?;
        }
        if let Some(days) = self.days {
            let delta = Days::new(u64::from(days.unsigned_abs()));
            date = if days >= 0 { date.checked_add_days(delta)? } else { date.checked_sub_days(delta)? };
        }

        let with_month = self.months.is_some() || self.days.is_some();
        Some(DateMatch {
            year: (self.years.is_some() || with_month).then(|| date.year()),
            month: with_month.then(|| date.month()),
            day: self.days.is_some().then(|| date.day()),
        })
    }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

/// Generic tagged match; the key is chosen by whoever configured the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMatch {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMatch {
    pub left: Arc<Match>,
    pub op: ComparisonType,
    pub right: Arc<Match>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupMatch {
    pub group: GroupType,
    pub matches: Vec<Arc<Match>>,
}

impl GroupMatch {
    /// True when `bag` already holds a two-member group of exactly `left` and `right`
    pub fn is_already_grouped(bag: &MatchBag, left: &Arc<Match>, right: &Arc<Match>) -> bool {
        bag.matches().iter().any(|m| match m.as_group() {
            Some(g) => {
                g.matches.len() == 2
                    && Arc::ptr_eq(&g.matches[0], left)
                    && Arc::ptr_eq(&g.matches[1], right)
            }
            None => false,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HintMatch {
    pub hint: Arc<Match>,
    pub value: Arc<Match>,
    pub forced: bool,   // Hint and value were separated by ':'
}

#[derive(Debug, Clone, Serialize)]
pub enum MatchKind {
    Number(NumberMatch),
    Date(DateMatch),
    DateOffset(DateOffsetMatch),
    Key(KeyMatch),
    Comparison(ComparisonMatch),
    Group(GroupMatch),
    Hint(HintMatch),
    Stub,
}

impl MatchKind {
    pub fn key(key: impl Into<String>) -> Self {
        MatchKind::Key(KeyMatch { key: key.into() })
    }

    /// Same variant, ignoring payloads
    pub fn same_variant(&self, other: &MatchKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A scored hypothesis that a token span is a recognized entity.
///
/// Built once through `MatchBuilder` and never mutated afterwards; derived
/// matches hold `Arc` references to the matches they were built from.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    score: f32,
    start: Token,
    end: Token,
    matched_tokens: usize,  // Content tokens consumed
    kind: MatchKind,
}

impl Match {
    pub fn stub(start: Token, end: Token) -> Self {
        Match {
            score: 0.0,
            start,
            end,
            matched_tokens: 1,
            kind: MatchKind::Stub,
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn start(&self) -> &Token {
        &self.start
    }

    pub fn end(&self) -> &Token {
        &self.end
    }

    pub fn matched_tokens(&self) -> usize {
        self.matched_tokens
    }

    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    /// Covered characters in the source text, in bytes
    pub fn span_len(&self) -> usize {
        (self.end.offset() + self.end.len()).saturating_sub(self.start.offset())
    }

    pub fn as_number(&self) -> Option<&NumberMatch> {
        match &self.kind {
            MatchKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateMatch> {
        match &self.kind {
            MatchKind::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_date_offset(&self) -> Option<&DateOffsetMatch> {
        match &self.kind {
            MatchKind::DateOffset(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&KeyMatch> {
        match &self.kind {
            MatchKind::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_comparison(&self) -> Option<&ComparisonMatch> {
        match &self.kind {
            MatchKind::Comparison(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupMatch> {
        match &self.kind {
            MatchKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_hint(&self) -> Option<&HintMatch> {
        match &self.kind {
            MatchKind::Hint(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.kind, MatchKind::Stub)
    }

    /// Resolves a `DateOffset` match into a `Date` match over the same span
    pub fn resolve_offset(&self, base: NaiveDate) -> Option<Match> {
        let date = self.as_date_offset()?.resolve(base)?;
        Some(Match {
            kind: MatchKind::Date(date),
            ..self.clone()
        })
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            MatchKind::Number(n) => write!(f, "Number[{}]", n.value),
            MatchKind::Date(d) => write!(f, "Date[{}]", format_ymd(d.year, d.month.map(|m| m as i32), d.day.map(|d| d as i32))),
            MatchKind::DateOffset(d) => write!(f, "DateOffset[{}]", format_ymd(d.years, d.months, d.days)),
            MatchKind::Key(k) => write!(f, "Key[{}]", k.key),
            MatchKind::Comparison(c) => write!(f, "Comparison[{} {:?} {}]", c.left, c.op, c.right),
            MatchKind::Group(g) => {
                write!(f, "Group[{:?}:", g.group)?;
                for (i, m) in g.matches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}", m)?;
                }
                f.write_str("]")
            }
            MatchKind::Hint(h) => write!(f, "Hint[{}:{}]", h.hint, h.value),
            MatchKind::Stub => {
                if self.start == self.end {
                    write!(f, "StubMatch[{}]", self.start)
                } else {
                    write!(f, "StubMatch[{}..{}]", self.start, self.end)
                }
            }
        }
    }
}

fn format_ymd(year: Option<i32>, month: Option<i32>, day: Option<i32>) -> String {
    [("Y", year), ("M", month), ("D", day)]
        .iter()
        .filter_map(|(label, v)| v.map(|v| format!("{}:{}", label, v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects the parts of a `Match` until its span is known.
///
/// Score and matched-token count stay unset until a matcher or merge
/// function decides them, so the matcher can fill in its defaults.
#[derive(Debug, Clone)]
pub struct MatchBuilder {
    kind: MatchKind,
    score: Option<f32>,
    matched_tokens: Option<usize>,
}

impl MatchBuilder {
    pub fn new(kind: MatchKind) -> Self {
        MatchBuilder {
            kind,
            score: None,
            matched_tokens: None,
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        MatchBuilder::new(MatchKind::key(key))
    }

    pub fn comparison(left: Arc<Match>, op: ComparisonType, right: Arc<Match>) -> Self {
        MatchBuilder::new(MatchKind::Comparison(ComparisonMatch { left, op, right }))
    }

    pub fn group(group: GroupType, matches: Vec<Arc<Match>>) -> Self {
        MatchBuilder::new(MatchKind::Group(GroupMatch { group, matches }))
    }

    pub fn hint(hint: Arc<Match>, value: Arc<Match>, forced: bool) -> Self {
        MatchBuilder::new(MatchKind::Hint(HintMatch { hint, value, forced }))
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Sets the score unless one was already chosen
    pub fn score_or(mut self, score: f32) -> Self {
        self.score.get_or_insert(score);
        self
    }

    pub fn score_or_else<F: FnOnce() -> f32>(mut self, score: F) -> Self {
        self.score.get_or_insert_with(score);
        self
    }

    pub fn matched_tokens(mut self, count: usize) -> Self {
        self.matched_tokens = Some(count);
        self
    }

    pub fn matched_tokens_or(mut self, count: usize) -> Self {
        self.matched_tokens.get_or_insert(count);
        self
    }

    pub fn has_score(&self) -> bool {
        self.score.is_some()
    }

    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    pub fn build(self, start: Token, end: Token) -> Match {
        Match {
            score: self.score.unwrap_or(0.0),
            start,
            end,
            matched_tokens: self.matched_tokens.unwrap_or(1),
            kind: self.kind,
        }
    }
}

impl From<MatchKind> for MatchBuilder {
    fn from(kind: MatchKind) -> Self {
        MatchBuilder::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::TokenType;

    fn word(offset: usize, text: &str) -> Token {
        Token::new(TokenType::Word, offset, text)
    }

    #[test]
    fn test_builder_defaults() {
        let m = MatchBuilder::key("city").build(word(0, "city"), word(0, "city"));
        assert_eq!(m.score(), 0.0);
        assert_eq!(m.matched_tokens(), 1);
        assert_eq!(m.to_string(), "Key[city]");
    }

    #[test]
    fn test_score_or_keeps_explicit_score() {
        let b = MatchBuilder::key("x").score(0.7).score_or(0.2);
        assert!(b.has_score());
        let m = b.build(word(0, "x"), word(0, "x"));
        assert_eq!(m.score(), 0.7);
    }

    #[test]
    fn test_display_formats() {
        let t = word(0, "a");
        let date = MatchBuilder::new(MatchKind::Date(DateMatch { year: Some(2018), month: Some(3), day: Some(19) }))
            .build(t.clone(), t.clone());
        assert_eq!(date.to_string(), "Date[Y:2018 M:3 D:19]");

        let partial = MatchBuilder::new(MatchKind::Date(DateMatch { year: None, month: Some(9), day: Some(20) }))
            .build(t.clone(), t.clone());
        assert_eq!(partial.to_string(), "Date[M:9 D:20]");

        let stub = Match::stub(word(0, "a"), word(2, "b"));
        assert_eq!(stub.to_string(), "StubMatch[a..b]");

        let left = Arc::new(MatchBuilder::key("a").build(t.clone(), t.clone()));
        let right = Arc::new(MatchBuilder::key("b").build(t.clone(), t.clone()));
        let group = MatchBuilder::group(GroupType::Or, vec![left, right]).build(t.clone(), t);
        assert_eq!(group.to_string(), "Group[Or:Key[a];Key[b]]");
    }

    #[test]
    fn test_span_len() {
        let m = MatchBuilder::key("x").build(word(3, "New"), word(7, "York"));
        assert_eq!(m.span_len(), 8);
    }

    #[test]
    fn test_resolve_day_offset() {
        let base = NaiveDate::from_ymd_opt(2018, 3, 1).unwrap();
        let date = DateOffsetMatch::days(-1).resolve(base).unwrap();
        assert_eq!(date, DateMatch { year: Some(2018), month: Some(2), day: Some(28) });
    }

    #[test]
    fn test_resolve_month_and_year_offsets() {
        let base = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
        let prev_month = DateOffsetMatch::months(-1).resolve(base).unwrap();
        assert_eq!(prev_month, DateMatch { year: Some(2017), month: Some(12), day: None });

        let next_year = DateOffsetMatch::years(1).resolve(base).unwrap();
        assert_eq!(next_year, DateMatch { year: Some(2019), month: None, day: None });
    }

    #[test]
    fn test_resolve_offset_keeps_span() {
        let t = word(0, "yesterday");
        let m = MatchBuilder::new(MatchKind::DateOffset(DateOffsetMatch::days(-1)))
            .score(SCORE_CERTAIN)
            .build(t.clone(), t.clone());
        let resolved = m.resolve_offset(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(resolved.to_string(), "Date[Y:2019 M:12 D:31]");
        assert_eq!(resolved.start(), &t);
        assert_eq!(resolved.score(), SCORE_CERTAIN);
    }
}
