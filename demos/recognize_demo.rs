/// Recognizer walkthrough
///
/// Builds a small "sales" vocabulary by hand, recognizes a few queries and
/// prints the best-ranked interpretations of each:
/// - numbers, dates and relative dates
/// - column names, list values and comparisons
/// - OR groups and hints
///
/// Run with `RUST_LOG=nlq_recognizer=trace` to see the matcher generations.

use std::sync::Arc;
use nlq_recognizer::analysis::filters::stemmer::SnowballStemmer;
use nlq_recognizer::matchers::{
    ComparisonMatcher, DateMatcher, ExactPhraseMatcher, GroupMatcher, HintMatcher, LikePhraseMatcher,
    ListContainsMatcher, NumberMatcher,
};
use nlq_recognizer::{Analyzer, Config, Match, MatchBuilder, Matcher, Recognizer, ScoredCombination, TopSet};
use tracing_subscriber::EnvFilter;

fn is_column(m: &Match) -> bool {
    m.as_key().is_some_and(|k| k.key.starts_with("column:"))
}

fn build_matchers(config: &Config) -> Vec<Box<dyn Matcher>> {
    let countries = vec!["Italy", "France", "United States", "Canada"]
        .into_iter()
        .map(String::from)
        .collect();
    let stemmer = Arc::new(SnowballStemmer::english());

    vec![
        Box::new(NumberMatcher),
        Box::new(DateMatcher::from_config(&config.dates)),
        Box::new(DateMatcher::relative_phrases(&config.dates)),
        Box::new(LikePhraseMatcher::new(vec!["total".to_string(), "sales".to_string()], MatchBuilder::key("column:sales"))
            .with_stemmer(stemmer.clone())),
        Box::new(LikePhraseMatcher::new(vec!["unit".to_string(), "price".to_string()], MatchBuilder::key("column:price"))
            .with_stemmer(stemmer)),
        Box::new(ExactPhraseMatcher::phrase("country", MatchBuilder::key("hint:country"))),
        Box::new(ListContainsMatcher::new(countries, |contains, _, value| {
            nlq_recognizer::MatchKind::key(format!("country {:?} '{}'", contains, value))
        }).configured(config)),
        Box::new(ComparisonMatcher::comparisons(is_column).configured(config)),
        Box::new(GroupMatcher::groups(|m| m.as_comparison().is_some() || m.as_group().is_some())
            .configured(config)),
        Box::new(HintMatcher::hints(
            |m| m.as_key().is_some_and(|k| k.key == "hint:country"),
            |m| m.as_key().is_some_and(|k| k.key.starts_with("country")),
        )),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   NLQ Recognizer - Demo                       ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let config = Config::default();
    config.validate()?;
    let recognizer = Recognizer::from_config(build_matchers(&config), &config);
    let analyzer = Analyzer::standard();

    let queries = [
        "total sales over 1000 in Italy last month",
        "unit price < 5 or unit price > 100",
        "country: France sales since March 2018",
        "sales for \"United States\" yesterday",
    ];

    for query in queries {
        println!("Query: {}", query);
        let sequence = analyzer.analyze(query);

        let mut top = TopSet::natural(3);
        let mut total = 0;
        recognizer.recognize(&sequence, |combination| {
            total += 1;
            top.add(ScoredCombination::weighted(combination));
            true
        })?;

        println!("  {} combinations, best {}:", total, top.len());
        for ranked in top.into_sorted_vec() {
            let parts: Vec<String> = ranked.matches.iter().map(|m| m.to_string()).collect();
            println!("  {:>6.3}  {}", ranked.score, parts.join(" | "));
        }

        let bag = recognizer.collect_matches(&sequence)?;
        println!("  as JSON: {} matches, {} bytes\n", bag.len(), serde_json::to_string(bag.matches())?.len());
    }

    Ok(())
}
