use std::sync::Arc;
use nlq_recognizer::matchers::{
    ComparisonMatcher, DateMatcher, ExactPhraseMatcher, GroupMatcher, HintMatcher, LikePhraseMatcher,
    ListContainsMatcher, NumberMatcher,
};
use nlq_recognizer::matches::{DateMatch, SCORE_CERTAIN};
use nlq_recognizer::{
    Analyzer, Config, ErrorKind, Match, MatchBuilder, Matcher, Recognizer, ScoredCombination, StandardTokenizer,
    TokenSequence, Tokenizer, TopSet,
};
use rayon::prelude::*;

fn seq(text: &str) -> TokenSequence {
    TokenSequence::new(StandardTokenizer.tokenize(text))
}

fn describe(combination: &[Arc<Match>]) -> String {
    combination.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn names_and_films() -> Recognizer {
    Recognizer::new(vec![
        Box::new(DateMatcher::new()),
        Box::new(NumberMatcher),
        Box::new(LikePhraseMatcher::new(words(&["John", "Smith"]), MatchBuilder::key("name"))),
        Box::new(LikePhraseMatcher::new(words(&["Johnny", "Mmnemonic"]), MatchBuilder::key("film"))),
    ])
}

fn sales_schema(config: &Config) -> Vec<Box<dyn Matcher>> {
    let is_column = |m: &Match| m.as_key().is_some_and(|k| k.key == "sales" || k.key == "price");
    let is_condition = |m: &Match| m.as_comparison().is_some() || m.as_group().is_some();

    vec![
        Box::new(ExactPhraseMatcher::phrase("sales", MatchBuilder::key("sales"))),
        Box::new(ExactPhraseMatcher::phrase("price", MatchBuilder::key("price"))),
        Box::new(NumberMatcher),
        Box::new(DateMatcher::from_config(&config.dates)),
        Box::new(DateMatcher::relative_phrases(&config.dates)),
        Box::new(ListContainsMatcher::keyed(words(&["Europe", "Asia"])).configured(config)),
        Box::new(ComparisonMatcher::comparisons(is_column).configured(config)),
        Box::new(GroupMatcher::groups(is_condition).configured(config)),
    ]
}

#[test]
fn test_every_combination_is_enumerated() {
    let mut count = 0;
    let mut as_name = false;
    let mut as_film = false;

    names_and_films().recognize(&seq("show John tasks from 08.2017"), |combination| {
        let s = describe(combination);
        as_name |= s == "Key[name] Date[Y:2017 M:8]";
        as_film |= s == "Key[film] Date[Y:2017 M:8]";
        count += 1;
        true
    }).unwrap();

    assert!(as_name);
    assert!(as_film);
    assert_eq!(count, 8);
}

#[test]
fn test_cancel_after_first() {
    let mut count = 0;
    names_and_films().recognize(&seq("show John tasks from 08.2017"), |_| {
        count += 1;
        false
    }).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_sentence_with_comparison_and_relative_date() {
    let config = Config::default();
    let recognizer = Recognizer::from_config(sales_schema(&config), &config);
    let all = recognizer.combinations(&seq("sales over 1000 in Europe last month")).unwrap();

    assert_eq!(
        describe(&all[0]),
        "Comparison[Key[sales] GreaterThan Number[1000]] Key[Europe] DateOffset[Y:0 M:-1]"
    );
    assert!(all.iter().any(|c| describe(c) == "Key[sales] Number[1000] Key[Europe] DateOffset[Y:0 M:-1]"));
}

#[test]
fn test_or_group_of_comparisons() {
    let config = Config::default();
    let recognizer = Recognizer::from_config(sales_schema(&config), &config);
    let all = recognizer.combinations(&seq("price > 5 or price < 2")).unwrap();

    assert_eq!(
        describe(&all[0]),
        "Group[Or:Comparison[Key[price] GreaterThan Number[5]];Comparison[Key[price] LessThan Number[2]]]"
    );
}

#[test]
fn test_hint_value_pairs() {
    let recognizer = Recognizer::new(vec![
        Box::new(ExactPhraseMatcher::phrase("city", MatchBuilder::key("city"))),
        Box::new(ListContainsMatcher::keyed(words(&["Paris", "London"]))),
        Box::new(HintMatcher::hints(
            |m| m.as_key().is_some_and(|k| k.key == "city"),
            |m| m.as_key().is_some_and(|k| k.key != "city"),
        )),
    ]);
    let all = recognizer.combinations(&seq("city: Lyon")).unwrap();
    assert_eq!(describe(&all[0]), "Hint[Key[city]:StubMatch[Lyon]]");

    let all = recognizer.combinations(&seq("city London")).unwrap();
    assert_eq!(describe(&all[0]), "Hint[Key[city]:Key[London]]");
}

#[test]
fn test_zero_matches_with_analyzer() {
    let recognizer = Recognizer::new(vec![Box::new(NumberMatcher)]).include_zero_matches(true);
    let sequence = Analyzer::standard().analyze(r#"top 5 "big deals""#);
    let all = recognizer.combinations(&sequence).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(describe(&all[0]), "StubMatch[top] Number[5] StubMatch[big deals]");
}

#[test]
fn test_scenario_full_date() {
    let matcher = DateMatcher::new();
    let s = seq("19 march 2018");
    let found = matcher.get_matches(&nlq_recognizer::MatchBag::new(&s)).unwrap();
    let full = found.iter()
        .find(|m| m.as_date() == Some(&DateMatch { year: Some(2018), month: Some(3), day: Some(19) }))
        .unwrap();
    assert_eq!(full.score(), SCORE_CERTAIN);
}

#[test]
fn test_scenario_list_and_like_phrase() {
    let s = seq("sales in Paris and New York");
    let list = ListContainsMatcher::keyed(words(&["Paris", "New York"]));
    assert_eq!(list.get_matches(&nlq_recognizer::MatchBag::new(&s)).unwrap().len(), 3);

    let s = seq("show sum of sale as table");
    let like = LikePhraseMatcher::new(words(&["sum", "of", "sales"]), MatchBuilder::key("sum_of_sales"));
    let found = like.get_matches(&nlq_recognizer::MatchBag::new(&s)).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].start().text(), "sum");
    assert_eq!(found[0].end().text(), "sale");
}

#[test]
fn test_pass_limit_from_config() {
    struct Again;

    impl Matcher for Again {
        fn first_pass_only(&self) -> bool {
            false
        }

        fn recursive(&self) -> bool {
            true
        }

        fn get_matches(&self, bag: &nlq_recognizer::MatchBag) -> nlq_recognizer::Result<Vec<Match>> {
            Ok(bag.matches().iter().take(1).map(|m| (**m).clone()).collect())
        }

        fn name(&self) -> &str {
            "again"
        }
    }

    let config = Config::from_json(r#"{"recognizer": {"max_passes": 3}}"#).unwrap();
    let recognizer = Recognizer::from_config(vec![Box::new(NumberMatcher), Box::new(Again)], &config);
    let err = recognizer.recognize(&seq("7"), |_| true).unwrap_err();
    assert_eq!(err.kind, ErrorKind::PassLimitExceeded);
    assert!(err.to_string().starts_with("PassLimitExceeded"));
}

#[test]
fn test_shared_recognizer_across_threads() {
    let config = Config::default();
    let recognizer = Recognizer::from_config(sales_schema(&config), &config);
    let inputs = vec![
        "sales over 1000 in Europe last month",
        "price > 5 or price < 2",
        "sales in Asia this year",
        "price under 20",
        "nothing to see",
    ];

    let sequential: Vec<Vec<String>> = inputs.iter()
        .map(|text| recognizer.combinations(&seq(text)).unwrap().iter().map(|c| describe(c)).collect())
        .collect();

    let parallel: Vec<Vec<String>> = inputs.par_iter()
        .map(|text| recognizer.combinations(&seq(text)).unwrap().iter().map(|c| describe(c)).collect())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_rank_combinations_with_top_set() {
    let mut top = TopSet::natural(3);
    names_and_films().recognize(&seq("show John tasks from 08.2017"), |combination| {
        top.add(ScoredCombination::weighted(combination));
        true
    }).unwrap();

    assert_eq!(top.len(), 3);
    let ranked = top.into_sorted_vec();
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_or_chain_of_stub_comparisons() {
    let config = Config::default();
    let is_key = |m: &Match| m.as_key().is_some();
    let recognizer = Recognizer::from_config(vec![
        Box::new(ListContainsMatcher::keyed(words(&["city", "country", "population"]))),
        Box::new(NumberMatcher),
        Box::new(ComparisonMatcher::comparisons(is_key).configured(&config)),
        Box::new(GroupMatcher::groups(|m| m.as_key().is_some() || m.as_comparison().is_some())
            .configured(&config)),
    ], &config);
    let s = seq("city=Kiev or city =Berlin or city bla");

    let bag = recognizer.collect_matches(&s).unwrap();
    let groups: Vec<String> = bag.matches().iter()
        .filter(|m| m.as_group().is_some())
        .map(|m| m.to_string())
        .collect();
    assert_eq!(groups, vec![
        "Group[Or:Comparison[Key[city] Equal StubMatch[Kiev]];Key[city]]",
        "Group[Or:Comparison[Key[city] Equal StubMatch[Kiev]];Comparison[Key[city] Equal StubMatch[Berlin]]]",
        "Group[Or:Comparison[Key[city] Equal StubMatch[Berlin]];Key[city]]",
    ]);

    let all = recognizer.combinations(&s).unwrap();
    assert_eq!(
        describe(&all[0]),
        "Group[Or:Comparison[Key[city] Equal StubMatch[Kiev]];Comparison[Key[city] Equal StubMatch[Berlin]]] Key[city]"
    );
}
