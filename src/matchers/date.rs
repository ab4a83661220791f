use chrono::{Datelike, Local, Month, NaiveDate};
use crate::analysis::token::{Token, TokenType};
use crate::core::config::DateConfig;
use crate::core::error::Result;
use crate::matchers::{CompositeMatcher, ExactPhraseMatcher, Matcher};
use crate::matchers::state::{run_state_machine, MatchState, Transition};
use crate::matches::{DateMatch, Match, MatchBag, MatchBuilder, MatchKind, SCORE_CERTAIN, SCORE_MAYBE};

/// Recognizes absolute dates written with numbers and month names.
///
/// Year, month and day slots are filled in any order, so "19 march 2018",
/// "2018-03-19" and "March 19, 2018" all resolve to the same date. Ambiguous
/// numbers are tracked as parallel hypotheses.
#[derive(Debug, Clone)]
pub struct DateMatcher {
    pub month_names: Vec<String>,
    pub abbreviated_month_names: Vec<String>,
    pub boost_year_window: i32,
    pub reference_year: Option<i32>,
}

impl Default for DateMatcher {
    fn default() -> Self {
        DateMatcher::from_config(&DateConfig::default())
    }
}

impl DateMatcher {
    pub fn new() -> Self {
        DateMatcher::default()
    }

    pub fn from_config(config: &DateConfig) -> Self {
        let english: Vec<&'static str> = (1u8..=12)
            .filter_map(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .collect();

        let month_names = config.month_names.clone()
            .unwrap_or_else(|| english.iter().map(|n| n.to_string()).collect());
        let abbreviated_month_names = config.abbreviated_month_names.clone()
            .unwrap_or_else(|| month_names.iter().map(|n| n.chars().take(3).collect()).collect());

        DateMatcher {
            month_names,
            abbreviated_month_names,
            boost_year_window: config.boost_year_window,
            reference_year: config.reference_year,
        }
    }

    /// Exact phrases for relative dates ("yesterday", "last month") as `DateOffset` matches
    pub fn relative_phrases(config: &DateConfig) -> CompositeMatcher {
        config.relative.offsets()
            .into_iter()
            .fold(CompositeMatcher::new("relative_dates"), |composite, (phrase, offset)| {
                composite.with(ExactPhraseMatcher::phrase(phrase, MatchKind::DateOffset(offset)))
            })
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Month number (1-12) for a full or abbreviated name
    pub fn month_from_name(&self, name: &str) -> Option<u32> {
        let name = name.to_lowercase();
        [&self.month_names, &self.abbreviated_month_names]
            .iter()
            .find_map(|names| names.iter().position(|n| n.to_lowercase() == name))
            .map(|idx| idx as u32 + 1)
    }

    /// Year score: certain for the reference year, falling off linearly
    /// to 0.75 at `boost_year_window` years away
    fn year_score(&self, year: i32, reference: i32) -> f32 {
        if self.boost_year_window <= 0 {
            return SCORE_CERTAIN;
        }
        let distance = year.abs_diff(reference).min(self.boost_year_window as u32);
        SCORE_CERTAIN - (distance as f32 / self.boost_year_window as f32) / 4.0
    }

    fn is_valid(&self, state: &DateState) -> bool {
        let d = &state.date;
        match (d.year, d.month, d.day) {
            (Some(y), Some(m), Some(day)) => NaiveDate::from_ymd_opt(y, m, day).is_some(),
            (Some(_), None, Some(_)) => false,
            (Some(_), _, None) => true,
            (None, _, _) => state.score > SCORE_MAYBE,
        }
    }
}

impl Matcher for DateMatcher {
    fn first_pass_only(&self) -> bool {
        true
    }

    fn recursive(&self) -> bool {
        false
    }

    fn get_matches(&self, bag: &MatchBag) -> Result<Vec<Match>> {
        let reference_year = self.reference_year.unwrap_or_else(|| Local::now().year());
        let start = DateState {
            matcher: self,
            reference_year,
            date: DateMatch::default(),
            score: 0.0,
            start: None,
            end: None,
            prev_punctuation: false,
        };
        run_state_machine(bag.sequence().tokens(), start)
    }

    fn name(&self) -> &str {
        "date"
    }
}

#[derive(Clone)]
struct DateState<'m> {
    matcher: &'m DateMatcher,
    reference_year: i32,
    date: DateMatch,
    score: f32,                // Average over filled slots
    start: Option<Token>,
    end: Option<Token>,
    prev_punctuation: bool,    // One punctuation mark allowed between parts
}

impl<'m> DateState<'m> {
    /// New hypothesis with `token` filling one more slot
    fn extend<F>(&self, token: &Token, slot_score: f32, fill: F) -> DateState<'m>
    where
        F: FnOnce(&mut DateMatch),
    {
        let filled = self.date.filled_slots();
        let mut next = self.clone();
        next.start.get_or_insert_with(|| token.clone());
        next.end = Some(token.clone());
        next.score = (self.score * filled as f32 + slot_score) / (filled as f32 + 1.0);
        next.prev_punctuation = false;
        fill(&mut next.date);
        next
    }

    fn to_match(&self) -> Option<Match> {
        let (start, end) = (self.start.clone()?, self.end.clone()?);
        let d = &self.date;
        let score = if d.year.is_some() && d.month.is_some() && d.day.is_some() {
            SCORE_CERTAIN
        } else {
            self.score
        };

        let m = MatchBuilder::new(MatchKind::Date(self.date.clone()))
            .score(score)
            .matched_tokens(d.filled_slots())
            .build(start, end);
        Some(m)
    }
}

impl MatchState for DateState<'_> {
    fn advance(self, token: &Token) -> Result<Transition<Self>> {
        let mut transition = Transition::new();
        let started = self.start.is_some();

        if !started {
            transition.push(self.clone());
        }
        let carried = transition.successors();

        match token.token_type() {
            TokenType::Separator => {
                if started {
                    transition.push(self.clone());
                }
            }
            TokenType::Math | TokenType::Punctuation => {
                let typical = matches!(token.text(), "/" | "." | "-");
                if started && !self.prev_punctuation && (typical || token.text() == ",") {
                    let mut next = self.clone();
                    next.prev_punctuation = true;
                    if typical && next.score <= SCORE_MAYBE {
                        next.score += 0.1;
                    }
                    transition.push(next);
                }
            }
            TokenType::Word => {
                if self.date.month.is_none() {
                    if let Some(month) = self.matcher.month_from_name(token.text()) {
                        transition.push(self.extend(token, SCORE_CERTAIN, |d| d.month = Some(month)));
                    }
                }
            }
            TokenType::Number => {
                if let Ok(num) = token.text().parse::<i32>() {
                    if self.date.year.is_none() && token.len() == 4 {
                        let score = self.matcher.year_score(num, self.reference_year);
                        transition.push(self.extend(token, score, |d| d.year = Some(num)));
                    }
                    if self.date.month.is_none() && (1..=12).contains(&num) {
                        transition.push(self.extend(token, SCORE_MAYBE, |d| d.month = Some(num as u32)));
                    }
                    if self.date.day.is_none() && (1..=31).contains(&num) {
                        transition.push(self.extend(token, SCORE_MAYBE, |d| d.day = Some(num as u32)));
                    }
                }
            }
            _ => {}
        }

        let continued = transition.successors() > carried;
        if started && !continued && self.matcher.is_valid(&self) {
            transition.result = self.to_match();
        }

        Ok(transition)
    }
}
