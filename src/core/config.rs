use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::matches::{ComparisonType, DateOffsetMatch, GroupType};

/// Options consumed by `Recognizer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub include_zero_matches: bool,   // Fill gaps between matches with stubs
    pub max_passes: usize,            // Fixed-point generations before giving up
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        RecognizerConfig {
            include_zero_matches: false,
            max_passes: 100,
        }
    }
}

/// Date recognition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    pub month_names: Option<Vec<String>>,             // 12 full names, English when absent
    pub abbreviated_month_names: Option<Vec<String>>, // 12 short names, English when absent
    pub boost_year_window: i32,                       // Years over which the year score falls off
    pub reference_year: Option<i32>,                  // Current year when absent
    pub relative: RelativeDatePhrases,
}

impl Default for DateConfig {
    fn default() -> Self {
        DateConfig {
            month_names: None,
            abbreviated_month_names: None,
            boost_year_window: 100,
            reference_year: None,
            relative: RelativeDatePhrases::default(),
        }
    }
}

/// Phrases recognized as dates relative to "now"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeDatePhrases {
    pub yesterday: Vec<String>,
    pub today: Vec<String>,
    pub tomorrow: Vec<String>,
    pub prev_month: Vec<String>,
    pub this_month: Vec<String>,
    pub next_month: Vec<String>,
    pub prev_year: Vec<String>,
    pub this_year: Vec<String>,
    pub next_year: Vec<String>,
}

impl Default for RelativeDatePhrases {
    fn default() -> Self {
        RelativeDatePhrases {
            yesterday: strings(&["yesterday"]),
            today: strings(&["today"]),
            tomorrow: strings(&["tomorrow"]),
            prev_month: strings(&["prev month", "previous month", "last month"]),
            this_month: strings(&["this month", "current month"]),
            next_month: strings(&["next month"]),
            prev_year: strings(&["prev year", "previous year", "last year"]),
            this_year: strings(&["this year", "current year"]),
            next_year: strings(&["next year"]),
        }
    }
}

impl RelativeDatePhrases {
    /// Every configured phrase paired with the offset it stands for
    pub fn offsets(&self) -> Vec<(&str, DateOffsetMatch)> {
        let table: [(&Vec<String>, DateOffsetMatch); 9] = [
            (&self.yesterday, DateOffsetMatch::days(-1)),
            (&self.today, DateOffsetMatch::days(0)),
            (&self.tomorrow, DateOffsetMatch::days(1)),
            (&self.prev_month, DateOffsetMatch::months(-1)),
            (&self.this_month, DateOffsetMatch::months(0)),
            (&self.next_month, DateOffsetMatch::months(1)),
            (&self.prev_year, DateOffsetMatch::years(-1)),
            (&self.this_year, DateOffsetMatch::years(0)),
            (&self.next_year, DateOffsetMatch::years(1)),
        ];

        table.iter()
            .flat_map(|(phrases, offset)| {
                phrases.iter().map(move |p| (p.as_str(), offset.clone()))
            })
            .collect()
    }
}

/// A word phrase standing for a comparison operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorPhrase {
    pub phrase: String,
    pub op: ComparisonType,
}

/// Operator vocabulary for comparison and group matchers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub comparison: Vec<OperatorPhrase>,  // Order matters: longer phrases first
    pub and_phrases: Vec<String>,
    pub or_phrases: Vec<String>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        use ComparisonType::*;

        let comparison = [
            ("equal", Equal),
            ("equals", Equal),
            ("not equals", NotEqual),
            ("not equal", NotEqual),
            ("before", LessThan),
            ("below", LessThan),
            ("less than", LessThan),
            ("less", LessThan),
            ("smaller than", LessThan),
            ("fewer", LessThan),
            ("under", LessThan),
            ("ending with", LessThanOrEqual),
            ("after", GreaterThan),
            ("above", GreaterThan),
            ("greater than", GreaterThan),
            ("greater", GreaterThan),
            ("more than", GreaterThan),
            ("more", GreaterThan),
            ("larger", GreaterThan),
            ("over", GreaterThan),
            ("starting with", GreaterThanOrEqual),
        ].into_iter()
            .map(|(phrase, op)| OperatorPhrase { phrase: phrase.to_string(), op })
            .collect();

        OperatorConfig {
            comparison,
            and_phrases: strings(&["and"]),
            or_phrases: strings(&["or"]),
        }
    }
}

impl OperatorConfig {
    /// Comparison phrases split into words
    pub fn comparison_phrases(&self) -> Vec<(Vec<String>, ComparisonType)> {
        self.comparison.iter()
            .map(|entry| (split_words(&entry.phrase), entry.op))
            .filter(|(words, _)| !words.is_empty())
            .collect()
    }

    /// AND/OR phrases split into words
    pub fn group_phrases(&self) -> Vec<(Vec<String>, GroupType)> {
        let and = self.and_phrases.iter().map(|p| (split_words(p), GroupType::And));
        let or = self.or_phrases.iter().map(|p| (split_words(p), GroupType::Or));

        and.chain(or)
            .filter(|(words, _)| !words.is_empty())
            .collect()
    }
}

/// Top-level configuration, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recognizer: RecognizerConfig,
    pub dates: DateConfig,
    pub operators: OperatorConfig,
    pub stop_words: Vec<String>,           // Skippable inside operator phrases
    pub list_contains_threshold: usize,    // Same-token matches emitted before deferring
}

impl Default for Config {
    fn default() -> Self {
        Config {
            recognizer: RecognizerConfig::default(),
            dates: DateConfig::default(),
            operators: OperatorConfig::default(),
            stop_words: strings(&["a", "an", "the", "to", "is", "are", "of"]),
            list_contains_threshold: 10,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Config::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recognizer.max_passes == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "recognizer.max_passes must be at least 1".to_string(),
            ));
        }

        for names in [&self.dates.month_names, &self.dates.abbreviated_month_names].into_iter().flatten() {
            if names.len() != 12 {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    format!("expected 12 month names, got {}", names.len()),
                ));
            }
        }

        if self.dates.boost_year_window < 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "dates.boost_year_window cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn split_words(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(String::from).collect()
}
