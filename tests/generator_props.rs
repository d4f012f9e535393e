//! Property tests for problem generation and seeded sets

use chrono::NaiveDate;
use proptest::prelude::*;

use mathswipe::generator::{
    MAX_TIER, QuestionType, SeededRandom, build_daily, build_from_token, generate,
};

fn kind_strategy() -> impl Strategy<Value = QuestionType> {
    prop::sample::select(vec![
        QuestionType::Add,
        QuestionType::Subtract,
        QuestionType::Multiply,
        QuestionType::Divide,
        QuestionType::Square,
        QuestionType::Sqrt,
        QuestionType::Fraction,
        QuestionType::Decimal,
        QuestionType::Percent,
        QuestionType::Linear,
        QuestionType::MixBasic,
        QuestionType::MixAll,
    ])
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_options_well_formed(
        seed in any::<u64>(),
        kind in kind_strategy(),
        difficulty in 1u32..=MAX_TIER,
        hard in any::<bool>()
    ) {
        let mut rng = SeededRandom::new(seed);
        let p = generate(difficulty, kind, hard, &mut rng);
        prop_assert!(p.correct_index < 3);
        prop_assert_eq!(p.options[p.correct_index], p.answer);
        prop_assert!(p.options[0] != p.options[1]);
        prop_assert!(p.options[1] != p.options[2]);
        prop_assert!(p.options[0] != p.options[2]);
        prop_assert!(p.options.iter().all(|o| o.is_finite()));
        if let Some(labels) = &p.option_labels {
            prop_assert!(labels[0] != labels[1] && labels[1] != labels[2] && labels[0] != labels[2]);
        }
    }

    #[test]
    fn test_subtraction_never_negative(
        seed in any::<u64>(),
        difficulty in 1u32..=MAX_TIER,
        hard in any::<bool>()
    ) {
        let mut rng = SeededRandom::new(seed);
        let p = generate(difficulty, QuestionType::Subtract, hard, &mut rng);
        prop_assert!(p.answer >= 0.0, "{} = {}", p.expression, p.answer);
    }

    #[test]
    fn test_division_exact(
        seed in any::<u64>(),
        difficulty in 1u32..=MAX_TIER,
        hard in any::<bool>()
    ) {
        let mut rng = SeededRandom::new(seed);
        let p = generate(difficulty, QuestionType::Divide, hard, &mut rng);
        prop_assert_eq!(p.answer.fract(), 0.0);
        let (dividend, divisor) = p.expression.split_once(" ÷ ").unwrap();
        let dividend: i64 = dividend.parse().unwrap();
        let divisor: i64 = divisor.parse().unwrap();
        prop_assert!(divisor != 0);
        prop_assert_eq!(dividend % divisor, 0);
        prop_assert_eq!((dividend / divisor) as f64, p.answer);
    }

    #[test]
    fn test_daily_deterministic(date in date_strategy()) {
        let a = build_daily(date);
        let b = build_daily(date);
        prop_assert_eq!(a.seed, b.seed);
        prop_assert_eq!(a.problems, b.problems);
    }

    #[test]
    fn test_token_deterministic(token in "[0-9a-z]{1,12}") {
        let a = build_from_token(&token);
        let b = build_from_token(&token);
        prop_assert_eq!(a.len(), 10);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_abc123_reproducible() {
    let first = build_from_token("abc123");
    for _ in 0..5 {
        assert_eq!(build_from_token("abc123"), first);
    }
}
