use crate::api::DateResolutionMode;
use crate::catalog::Catalog;
use crate::engine::{Classifier, Pass};
use crate::pattern::PatternType;

fn classify_in(input: &str, tag: &str, mode: DateResolutionMode) -> Option<String> {
    let catalog = Catalog::new();
    let facts = catalog.locale_facts(&crate::locale::Locale::parse(tag), false);
    Classifier::new(&facts, &catalog, mode, true).classify(input)
}

#[test]
fn classification_examples_en_us() {
    // Array of (expected_pattern, input_string)
    let cases: Vec<(&str, &str)> = vec![
        ("yyyyMMdd", "20080112"),
        ("yyyy-MM-dd", "2012-07-02"),
        ("yyyy/MM/dd", "2012/07/02"),
        ("yyyy-MM-dd HH:mm", "2012-07-02 10:11"),
        ("yyyy-MM-dd HH:mm:ss", "2012-07-02 10:11:12"),
        ("yyyy-MM-dd'T'HH:mm:ss", "2012-07-02T10:11:12"),
        ("yyyy-MM-dd'T'HH:mm:ss'Z'", "2012-07-02T10:11:12Z"),
        ("yyyy-MM-dd'T'HH:mm:ss.SSS'Z'", "2017-10-12T16:45:30.403Z"),
        ("yyyy-MM-dd'T'HH:mm:ssxxx", "2012-07-02T10:11:12+02:00"),
        ("yyyy-MM-dd HH:mm:ss xx", "2012-07-02 10:11:12 +0200"),
        ("dd MMM yyyy", "02 Aug 2012"),
        ("d MMMM yyyy", "2 August 2012"),
        ("MMM dd, yyyy", "Aug 02, 2012"),
        ("dd-MMM-yyyy", "02-Aug-2012"),
        ("EEE, dd MMM yyyy HH:mm:ss z", "Tue, 02 Aug 2012 10:11:12 GMT"),
        ("MMM ppd HH:mm:ss", "Jan  5 10:11:12"),
        ("d/M/yyyy HH:mm:ss", "19/7/2012 17:49:53"),
        ("?/?/yyyy", "2/7/2012"),
        ("MM/dd/yyyy hh:mm a", "12/25/2012 10:30 PM"),
        ("HH:mm:ss", "10:11:12"),
        ("yyyy年M月d日", "2012年8月5日"),
    ];

    for (expected, input) in cases {
        let got = classify_in(input, "en-US", DateResolutionMode::None);
        assert_eq!(got.as_deref(), Some(expected), "input: {input:?}");
    }
}

#[test]
fn classification_rejects() {
    let cases = ["hello", "2012-13-45", "32/12/2012", "12:61", "2012-02-30", "---- -- --", "Foo 12, 2012"];
    for input in cases {
        assert_eq!(classify_in(input, "en-US", DateResolutionMode::None), None, "input: {input:?}");
    }
}

#[test]
fn classification_examples_with_resolution_mode() {
    let cases: Vec<(&str, &str, &str, DateResolutionMode)> = vec![
        ("dd/MM/yyyy", "02/07/2012", "en-US", DateResolutionMode::DayFirst),
        ("MM/dd/yyyy", "02/07/2012", "en-US", DateResolutionMode::MonthFirst),
        ("MM/dd/yyyy", "02/07/2012", "en-US", DateResolutionMode::Auto),
        ("dd/MM/yyyy", "02/07/2012", "en-GB", DateResolutionMode::Auto),
        ("??/??/yyyy", "02/07/2012", "en-GB", DateResolutionMode::None),
        // Magnitude beats the mode.
        ("MM/dd/yyyy", "02/27/2012", "en-GB", DateResolutionMode::DayFirst),
    ];

    for (expected, input, tag, mode) in cases {
        let got = classify_in(input, tag, mode);
        assert_eq!(got.as_deref(), Some(expected), "input: {input:?} locale: {tag} mode: {mode:?}");
    }
}

#[test]
fn classification_examples_other_locales() {
    let cases: Vec<(&str, &str, &str)> = vec![
        ("dd MMMM yyyy", "02 janvier 2012", "fr-FR"),
        ("dd. MMMM yyyy", "02. Januar 2012", "de-DE"),
        ("dd/MM/yyyy", "25/12/2012", "it-IT"),
        ("yyyy年M月d日", "2012年8月5日", "zh-CN"),
        ("yyyy年MM月dd日", "2012年08月05日", "ja-JP"),
        ("yyyy년 M월 d일", "2012년 8월 5일", "ko-KR"),
        ("yyyy-MM-dd", "2012-07-02", "ru-RU"),
    ];

    for (expected, input, tag) in cases {
        let got = classify_in(input, tag, DateResolutionMode::None);
        assert_eq!(got.as_deref(), Some(expected), "input: {input:?} locale: {tag}");
    }
}

#[test]
fn zulu_timestamp_is_an_offset_date_time() {
    let catalog = Catalog::new();
    let facts = catalog.locale_facts(&crate::locale::Locale::default(), false);
    let pattern = Classifier::new(&facts, &catalog, DateResolutionMode::None, true)
        .classify("2017-10-12T16:45:30.403Z")
        .unwrap();
    let resolved = catalog.resolved(&pattern, &facts, true).unwrap();
    assert_eq!(resolved.pattern_type(), PatternType::OffsetDateTime);
    assert!(resolved.is_valid("2020-01-31T00:00:00.000Z"));
    assert!(!resolved.is_valid("2020-01-31T00:00:00.000"));
}

#[test]
fn every_classified_pattern_regex_accepts_its_sample() {
    let samples = [
        "2012-07-02T10:11:12+02:00",
        "Tue, 02 Aug 2012 10:11:12 GMT",
        "Jan  5 10:11:12",
        "12/25/2012 10:30 PM",
        "2/7/2012",
        "2012年8月5日",
    ];
    let catalog = Catalog::new();
    let facts = catalog.locale_facts(&crate::locale::Locale::default(), false);
    let classifier = Classifier::new(&facts, &catalog, DateResolutionMode::None, true);

    for sample in samples {
        let pattern = classifier.classify(sample).unwrap();
        let resolved = catalog.resolved(&pattern, &facts, true).unwrap();
        let matcher = resolved.matcher().unwrap();
        assert!(matcher.is_match(sample), "{pattern} / {} should match {sample:?}", resolved.regexp());
    }
}

#[test]
fn winning_pass_per_shape_family() {
    let catalog = Catalog::new();
    let facts = catalog.locale_facts(&crate::locale::Locale::default(), false);
    let classifier = Classifier::new(&facts, &catalog, DateResolutionMode::None, true);

    let cases = [
        (Pass::KnownShape, "2012-07-02"),
        (Pass::Scanner, "19/7/2012 17:49:53"),
        (Pass::Elimination, "2012年8月5日"),
        (Pass::Elimination, "Tuesday, August 05, 2012"),
    ];
    for (pass, input) in cases {
        assert_eq!(classifier.classify_verbose(input).winner, Some(pass), "input: {input:?}");
    }
}

#[test]
fn numeric_only_locales_reject_words() {
    assert_eq!(classify_in("02 января 2012", "ru-RU", DateResolutionMode::None), None);
    assert_eq!(classify_in("02 Aug 2012", "ru-RU", DateResolutionMode::None), None);
}
