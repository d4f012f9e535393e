//! Property tests for the streak and timed-mode laws

use chrono::NaiveDate;
use proptest::prelude::*;

use mathswipe::consts::{TIME_LIMIT_MS, WRONG_DELAY_MS};
use mathswipe::generator::{QuestionType, SeededRandom};
use mathswipe::session::{Direction, FixedLevel, SessionConfig, SessionDriver};

fn config(timed: bool) -> SessionConfig {
    let mut config =
        SessionConfig::new(QuestionType::MixBasic, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    config.timed_mode = timed;
    config
}

fn driver(seed: u64, timed: bool) -> SessionDriver<FixedLevel> {
    SessionDriver::with_random(config(timed), FixedLevel(2), 0.0, Box::new(SeededRandom::new(seed)))
}

fn pick(d: &SessionDriver<FixedLevel>, correct: bool) -> Direction {
    let index = d.game().current().unwrap().correct_index;
    let index = if correct { index } else { (index + 1) % 3 };
    Direction::for_option(index).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_streak_law(
        seed in any::<u64>(),
        answers in prop::collection::vec(any::<bool>(), 1..30)
    ) {
        let mut d = driver(seed, false);
        let mut now = 0.0;
        for correct in answers {
            now += 2_000.0;
            let before = d.game().state().clone();
            let dir = pick(&d, correct);
            d.swipe(dir, now);
            let after = d.game().state();

            if correct {
                prop_assert_eq!(after.streak, before.streak + 1);
                prop_assert_eq!(after.total_answered, before.total_answered + 1);
            } else if before.total_answered == 0 && !before.tutorial_used {
                // First miss of the session: forgiven once
                prop_assert_eq!(after.streak, before.streak);
                prop_assert_eq!(after.total_answered, 0);
                prop_assert!(after.tutorial_used);
            } else {
                prop_assert_eq!(after.streak, 0);
                prop_assert_eq!(after.total_answered, before.total_answered + 1);
                prop_assert_eq!(after.answer_history.back(), Some(&false));
            }
            now += 1_000.0;
            d.advance_to(now);
        }
    }

    #[test]
    fn test_timeout_is_a_miss(seed in any::<u64>(), warmup in 0usize..4) {
        let mut d = driver(seed, true);
        let mut now = 0.0;
        for _ in 0..warmup {
            now += 1_000.0;
            let dir = pick(&d, true);
            d.swipe(dir, now);
            now += 1_000.0;
            d.advance_to(now);
        }
        // Stamped when the resume timer fired, not when it was polled
        let start = d.game().current().unwrap().start_time.unwrap();
        let id = d.game().current().unwrap().id;
        let answered = d.game().state().total_answered;

        d.advance_to(start + TIME_LIMIT_MS - 1.0);
        prop_assert_eq!(d.game().state().total_answered, answered);

        d.advance_to(start + TIME_LIMIT_MS);
        let state = d.game().state();
        prop_assert_eq!(state.streak, 0);
        prop_assert_eq!(state.total_answered, answered + 1);
        prop_assert_eq!(state.answer_history.back(), Some(&false));
        prop_assert!(state.frozen);

        d.advance_to(start + TIME_LIMIT_MS + WRONG_DELAY_MS);
        prop_assert!(d.game().current().unwrap().id != id);
        prop_assert!(!d.game().state().frozen);
    }
}

#[test]
fn test_tutorial_then_real_miss() {
    let mut d = driver(7, false);
    let dir = pick(&d, false);
    d.swipe(dir, 1_000.0);
    assert_eq!(d.game().state().total_answered, 0);
    assert_eq!(d.game().state().wrong_streak, 0);

    d.advance_to(2_000.0);
    let dir = pick(&d, false);
    d.swipe(dir, 3_000.0);
    assert_eq!(d.game().state().total_answered, 1);
    assert_eq!(d.game().state().wrong_streak, 1);
    assert_eq!(d.game().state().streak, 0);
}

#[test]
fn test_tutorial_retry_near_time_limit() {
    let mut d = driver(11, true);
    let dir = pick(&d, false);
    d.swipe(dir, 9_800.0);
    assert_eq!(d.game().state().total_answered, 0);

    // Retry is live after the shake, with a fresh countdown
    d.advance_to(10_300.0);
    assert_eq!(d.game().state().total_answered, 0);
    assert!(!d.game().state().frozen);

    let dir = pick(&d, true);
    d.swipe(dir, 11_000.0);
    let state = d.game().state();
    assert_eq!(state.total_answered, 1);
    assert_eq!(state.total_correct, 1);
    assert_eq!(state.answer_history.back(), Some(&true));
}
