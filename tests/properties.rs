use datesniff::{Config, DateResolutionMode, FormatInferrer, determine_format_string, tokenize};
use proptest::prelude::*;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

const POOL: &[&str] = &[
    "2/7/2012 06:24:47",
    "2/7/2012 09:44:04",
    "1/7/2012 23:16:14",
    "19/7/2012 17:49:53",
    "2012-07-02",
    "02 Aug 2012",
    "not a date",
    "",
];

#[derive(Debug, Clone)]
struct Stamp {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

fn stamp() -> impl Strategy<Value = Stamp> {
    (1900u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(year, month, day, hour, minute, second)| Stamp { year, month, day, hour, minute, second })
}

fn render(stamp: &Stamp, template: usize) -> String {
    let Stamp { year, month, day, hour, minute, second } = stamp.clone();
    match template {
        0 => format!("{year:04}-{month:02}-{day:02}"),
        1 => format!("{year:04}{month:02}{day:02}"),
        2 => format!("{day}/{month}/{year:04} {hour:02}:{minute:02}:{second:02}"),
        3 => format!("{day:02} {} {year:04}", MONTHS[month as usize - 1]),
        4 => format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z"),
        _ => format!("{month:02}/{day:02}/{year:04} {hour:02}:{minute:02}"),
    }
}

fn trained(samples: &[&str]) -> FormatInferrer {
    let mut inferrer = FormatInferrer::new(Config::default()).unwrap();
    for sample in samples {
        inferrer.train(Some(sample));
    }
    inferrer
}

fn samples() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(POOL.to_vec()), 0..8)
}

proptest! {
    #[test]
    fn classified_patterns_render_back_to_themselves(stamp in stamp(), template in 0usize..6) {
        let input = render(&stamp, template);
        let pattern = determine_format_string(&input, DateResolutionMode::None);
        prop_assert!(pattern.is_some(), "no pattern for {:?}", input);
        let pattern = pattern.unwrap();
        let sequence = tokenize(&pattern).unwrap();
        prop_assert_eq!(sequence.render(), pattern);
    }

    #[test]
    fn regex_accepts_every_value_the_pattern_parses(stamp in stamp(), template in 0usize..6) {
        let input = render(&stamp, template);
        let mut inferrer = FormatInferrer::new(Config::default()).unwrap();
        prop_assert!(inferrer.train(Some(&input)).is_some());
        let result = inferrer.result().unwrap();
        prop_assert!(result.is_valid(&input));
        prop_assert!(result.matcher().unwrap().is_match(&input), "{} vs {:?}", result.regexp(), input);
    }

    #[test]
    fn merge_is_commutative(a in samples(), b in samples()) {
        let (a, b) = (trained(&a), trained(&b));
        let ab = FormatInferrer::merged(&a, &b).unwrap();
        let ba = FormatInferrer::merged(&b, &a).unwrap();
        prop_assert_eq!(ab.state(), ba.state());
        prop_assert_eq!(ab.result().map(|r| r.format_string().to_string()), ba.result().map(|r| r.format_string().to_string()));
    }

    #[test]
    fn merge_is_associative(a in samples(), b in samples(), c in samples()) {
        let (a, b, c) = (trained(&a), trained(&b), trained(&c));
        let left = FormatInferrer::merged(&FormatInferrer::merged(&a, &b).unwrap(), &c).unwrap();
        let right = FormatInferrer::merged(&a, &FormatInferrer::merged(&b, &c).unwrap()).unwrap();
        prop_assert_eq!(left.state(), right.state());
    }

    #[test]
    fn results_are_deterministic(a in samples()) {
        let config = Config::default().resolution_mode(DateResolutionMode::DayFirst);
        let run = || {
            let mut inferrer = FormatInferrer::new(config.clone()).unwrap();
            for sample in &a {
                inferrer.train(Some(sample));
            }
            inferrer.result().map(|r| r.format_string().to_string())
        };
        prop_assert_eq!(run(), run());
    }
}
