//! Per-type problem generators
//!
//! All generators share one signature ([`GeneratorFn`]) and are looked up
//! through [`generator_for`]. Difficulty is an ordinal tier (1 = easiest,
//! clamped to [`MAX_TIER`]); hard mode replaces the tier range with a fixed
//! wide one.

use super::distractor::{self, Frac};
use super::problem::{Problem, QuestionType};
use super::rng::{RandomSource, pick};

/// Highest difficulty tier with its own ranges
pub const MAX_TIER: u32 = 5;

/// Signature shared by every concrete generator
pub type GeneratorFn = fn(u32, bool, &mut dyn RandomSource) -> Problem;

/// Generator for a concrete tag; `None` for meta tags
pub fn generator_for(kind: QuestionType) -> Option<GeneratorFn> {
    let f: GeneratorFn = match kind {
        QuestionType::Add => gen_add,
        QuestionType::Subtract => gen_subtract,
        QuestionType::Multiply => gen_multiply,
        QuestionType::Divide => gen_divide,
        QuestionType::Square => gen_square,
        QuestionType::Sqrt => gen_sqrt,
        QuestionType::Fraction => gen_fraction,
        QuestionType::Decimal => gen_decimal,
        QuestionType::Percent => gen_percent,
        QuestionType::Linear => gen_linear,
        QuestionType::MixBasic
        | QuestionType::MixAll
        | QuestionType::Daily
        | QuestionType::Challenge => return None,
    };
    Some(f)
}

/// Generate one problem. Meta tags pick a concrete type from their pool
/// (pools hold only concrete tags, so this recurses at most once).
pub fn generate(
    difficulty: u32,
    kind: QuestionType,
    hard_mode: bool,
    rng: &mut dyn RandomSource,
) -> Problem {
    let Some(generator) = generator_for(kind) else {
        let pool = kind.resolution_pool().unwrap_or(QuestionType::CONCRETE);
        let resolved = *pick(rng, pool);
        return generate(difficulty, resolved, hard_mode, rng);
    };
    generator(difficulty.clamp(1, MAX_TIER), hard_mode, rng)
}

fn int_problem(
    kind: QuestionType,
    expression: String,
    latex: Option<String>,
    answer: i64,
    distractors: [i64; 2],
    rng: &mut dyn RandomSource,
) -> Problem {
    Problem::package(
        kind,
        expression,
        latex,
        answer as f64,
        [distractors[0] as f64, distractors[1] as f64],
        None,
        rng,
    )
}

// ---------------------------------------------------------------------------
// Addition / subtraction

fn additive_range(tier: u32, hard: bool) -> (i64, i64) {
    if hard {
        return (100, 999);
    }
    match tier {
        1 => (1, 10),
        2 => (5, 25),
        3 => (10, 50),
        4 => (20, 100),
        _ => (50, 200),
    }
}

fn gen_add(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (lo, hi) = additive_range(tier, hard);
    let a = rng.int_in(lo, hi);
    let b = rng.int_in(lo, hi);
    let answer = a + b;
    let distractors = distractor::near(answer, rng);
    int_problem(QuestionType::Add, format!("{a} + {b}"), None, answer, distractors, rng)
}

fn gen_subtract(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (lo, hi) = additive_range(tier, hard);
    let x = rng.int_in(lo, hi);
    let y = rng.int_in(lo, hi);
    // Larger operand first: never a negative result
    let (a, b) = if x >= y { (x, y) } else { (y, x) };
    let answer = a - b;
    let distractors = distractor::near(answer, rng);
    int_problem(QuestionType::Subtract, format!("{a} - {b}"), None, answer, distractors, rng)
}

// ---------------------------------------------------------------------------
// Multiplication / division

/// Separate bounds for the first and second operand
fn product_ranges(tier: u32, hard: bool) -> ((i64, i64), (i64, i64)) {
    if hard {
        return ((12, 30), (6, 25));
    }
    match tier {
        1 => ((2, 5), (2, 5)),
        2 => ((2, 9), (2, 9)),
        3 => ((2, 12), (2, 10)),
        4 => ((3, 15), (3, 12)),
        _ => ((6, 20), (3, 15)),
    }
}

fn gen_multiply(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let ((a_lo, a_hi), (b_lo, b_hi)) = product_ranges(tier, hard);
    let a = rng.int_in(a_lo, a_hi);
    let b = rng.int_in(b_lo, b_hi);
    let answer = a * b;
    let distractors = distractor::multiplicative(a, b, rng);
    int_problem(
        QuestionType::Multiply,
        format!("{a} × {b}"),
        Some(format!("{a} \\times {b}")),
        answer,
        distractors,
        rng,
    )
}

/// Quotient and divisor are drawn first and multiplied up, so the division
/// is always exact and the divisor is at least 2.
fn gen_divide(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let ((q_lo, q_hi), (d_lo, d_hi)) = product_ranges(tier, hard);
    let quotient = rng.int_in(q_lo, q_hi);
    let divisor = rng.int_in(d_lo.max(2), d_hi);
    let dividend = quotient * divisor;
    let distractors = distractor::near(quotient, rng);
    int_problem(
        QuestionType::Divide,
        format!("{dividend} ÷ {divisor}"),
        Some(format!("{dividend} \\div {divisor}")),
        quotient,
        distractors,
        rng,
    )
}

// ---------------------------------------------------------------------------
// Powers

fn base_range(tier: u32, hard: bool) -> (i64, i64) {
    if hard {
        return (12, 30);
    }
    match tier {
        1 => (2, 5),
        2 => (2, 9),
        3 => (4, 12),
        4 => (6, 15),
        _ => (10, 20),
    }
}

fn gen_square(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (lo, hi) = base_range(tier, hard);
    let n = rng.int_in(lo, hi);
    let distractors = distractor::multiplicative(n, n, rng);
    int_problem(
        QuestionType::Square,
        format!("{n}²"),
        Some(format!("{n}^{{2}}")),
        n * n,
        distractors,
        rng,
    )
}

fn gen_sqrt(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (lo, hi) = base_range(tier, hard);
    let n = rng.int_in(lo, hi);
    let square = n * n;
    let distractors = distractor::near(n, rng);
    int_problem(
        QuestionType::Sqrt,
        format!("√{square}"),
        Some(format!("\\sqrt{{{square}}}")),
        n,
        distractors,
        rng,
    )
}

// ---------------------------------------------------------------------------
// Fractions

const EASY_DENOMINATORS: &[(i64, i64)] =
    &[(2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (2, 4), (3, 6), (4, 8)];
const MID_DENOMINATORS: &[(i64, i64)] =
    &[(2, 3), (2, 4), (2, 6), (3, 4), (3, 6), (4, 8), (2, 5), (4, 6)];
const UPPER_DENOMINATORS: &[(i64, i64)] = &[
    (2, 3),
    (3, 4),
    (2, 5),
    (4, 6),
    (3, 5),
    (4, 5),
    (5, 6),
    (3, 8),
    (6, 8),
    (5, 10),
];

/// Coprime pairs
const HARD_DENOMINATORS: &[(i64, i64)] = &[
    (3, 7),
    (5, 7),
    (4, 9),
    (7, 8),
    (5, 9),
    (7, 9),
    (8, 9),
    (5, 8),
    (7, 10),
];

fn denominator_pool(tier: u32, hard: bool) -> &'static [(i64, i64)] {
    if hard {
        return HARD_DENOMINATORS;
    }
    match tier {
        1 => EASY_DENOMINATORS,
        2 | 3 => MID_DENOMINATORS,
        _ => UPPER_DENOMINATORS,
    }
}

fn addition_bias(tier: u32, hard: bool) -> f64 {
    if hard {
        return 0.5;
    }
    match tier {
        1 => 0.8,
        2 | 3 => 0.65,
        _ => 0.5,
    }
}

/// Fraction operands and the operation actually used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionTerms {
    pub n1: i64,
    pub d1: i64,
    pub n2: i64,
    pub d2: i64,
    pub add: bool,
}

impl FractionTerms {
    /// Reduced result. A subtraction that would be zero or negative is
    /// re-derived once as the addition of the same operands; this never
    /// calls back into generation.
    pub fn resolve(self) -> (Self, Frac) {
        let den = self.d1 * self.d2;
        if !self.add {
            let num = self.n1 * self.d2 - self.n2 * self.d1;
            if num > 0 {
                return (self, Frac::new(num, den));
            }
            log::debug!(
                "fraction {}/{} - {}/{} not positive, using addition",
                self.n1,
                self.d1,
                self.n2,
                self.d2
            );
        }
        let terms = Self { add: true, ..self };
        (terms, Frac::new(self.n1 * self.d2 + self.n2 * self.d1, den))
    }
}

fn gen_fraction(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (d1, d2) = *pick(rng, denominator_pool(tier, hard));
    let n1 = rng.int_in(1, d1 - 1);
    let n2 = rng.int_in(1, d2 - 1);
    let add = rng.chance(addition_bias(tier, hard));

    let (terms, result) = FractionTerms { n1, d1, n2, d2, add }.resolve();
    let op = if terms.add { "+" } else { "-" };
    let expression = format!("{n1}/{d1} {op} {n2}/{d2}");
    let latex = format!(
        "{} {op} {}",
        Frac { num: n1, den: d1 }.latex(),
        Frac { num: n2, den: d2 }.latex()
    );

    let [x, y] = distractor::fraction(result, rng);
    Problem::package(
        QuestionType::Fraction,
        expression,
        Some(latex),
        result.value(),
        [x.value(), y.value()],
        Some((result.label(), [x.label(), y.label()])),
        rng,
    )
}

// ---------------------------------------------------------------------------
// Decimals

/// Rounds to one decimal place
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn tenths(t: i64) -> f64 {
    round1(t as f64 / 10.0)
}

fn tenths_label(t: i64) -> String {
    format!("{:.1}", tenths(t))
}

fn tenths_range(tier: u32, hard: bool) -> (i64, i64) {
    if hard {
        return (100, 999);
    }
    match tier {
        1 => (1, 50),
        2 => (5, 100),
        3 => (10, 200),
        _ => (10, 500),
    }
}

/// Operands carry one decimal place. The multiplication form scales a
/// decimal by a whole number so the exact product stays on the one-decimal
/// grid.
fn gen_decimal(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (lo, hi) = tenths_range(tier, hard);
    let a = rng.int_in(lo, hi);

    let (expression, latex, answer) = if rng.chance(0.5) {
        let b = rng.int_in(lo, hi);
        let e = format!("{} + {}", tenths_label(a), tenths_label(b));
        (e, None, a + b)
    } else {
        let k = rng.int_in(2, if hard { 12 } else { 9 });
        let e = format!("{} × {k}", tenths_label(a));
        let l = format!("{} \\times {k}", tenths_label(a));
        (e, Some(l), a * k)
    };

    let [x, y] = distractor::decimal(answer, rng);
    Problem::package(
        QuestionType::Decimal,
        expression,
        latex,
        tenths(answer),
        [tenths(x), tenths(y)],
        Some((tenths_label(answer), [tenths_label(x), tenths_label(y)])),
        rng,
    )
}

// ---------------------------------------------------------------------------
// Percentages

const ROUND_PERCENTS: &[i64] = &[10, 25, 50];
const ALL_PERCENTS: &[i64] = &[5, 10, 15, 20, 25, 30, 40, 50, 60, 75, 80, 90];

// Every base is a multiple of 20, so any multiple-of-5 percentage is exact
const EASY_BASES: &[i64] = &[20, 40, 60, 80, 100];
const MID_BASES: &[i64] = &[20, 40, 60, 80, 100, 120, 200];
const UPPER_BASES: &[i64] = &[40, 60, 80, 100, 120, 160, 200, 240, 300, 400];
const HARD_BASES: &[i64] = &[120, 160, 240, 360, 480, 600, 840];

fn gen_percent(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (bases, round_bias): (&[i64], f64) = if hard {
        (HARD_BASES, 0.2)
    } else {
        match tier {
            1 => (EASY_BASES, 0.8),
            2 => (MID_BASES, 0.7),
            _ => (UPPER_BASES, 0.4),
        }
    };
    let pct = if rng.chance(round_bias) {
        *pick(rng, ROUND_PERCENTS)
    } else {
        *pick(rng, ALL_PERCENTS)
    };
    let base = *pick(rng, bases);
    let answer = pct * base / 100;
    let distractors = distractor::near(answer, rng);
    int_problem(
        QuestionType::Percent,
        format!("{pct}% of {base}"),
        Some(format!("{pct}\\% \\text{{ of }} {base}")),
        answer,
        distractors,
        rng,
    )
}

// ---------------------------------------------------------------------------
// Linear equations

/// Builds `a·x + b = c` from a, x and b, so x is always a whole solution
fn gen_linear(tier: u32, hard: bool, rng: &mut dyn RandomSource) -> Problem {
    let (a_hi, x_hi, negative_bias) = if hard {
        (15, 20, 0.4)
    } else {
        match tier {
            1 | 2 => (5, 10, 0.0),
            3 => (9, 10, 0.25),
            _ => (12, 12, 0.35),
        }
    };
    let a = rng.int_in(2, a_hi);
    let x = rng.int_in(1, x_hi);
    let magnitude = rng.int_in(1, 20);
    let b = if rng.chance(negative_bias) { -magnitude } else { magnitude };
    let c = a * x + b;

    let op = if b < 0 { "-" } else { "+" };
    let expression = format!("{a}x {op} {} = {c}", b.abs());
    let distractors = distractor::near(x, rng);
    int_problem(QuestionType::Linear, expression, None, x, distractors, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::problem::ProblemId;
    use crate::generator::rng::{ReplayRandom, SeededRandom};

    #[test]
    fn test_golden_add() {
        // a = 1 + floor(0.35 * 10) = 4, b = 1 + floor(0.62 * 10) = 7
        // near(11): +1 -> 12, -2 -> 9; answer slot floor(0.8 * 3) = 2
        let mut rng = ReplayRandom::new(vec![0.35, 0.62, 0.1, 0.7, 0.5, 0.2, 0.8]);
        let p = generate(1, QuestionType::Add, false, &mut rng);
        assert_eq!(
            p,
            Problem {
                id: ProblemId::Pending,
                kind: QuestionType::Add,
                expression: "4 + 7".into(),
                latex: None,
                answer: 11.0,
                options: [12.0, 9.0, 11.0],
                option_labels: None,
                correct_index: 2,
                start_time: None,
            }
        );
        assert_eq!(rng.draws(), 7);
    }

    #[test]
    fn test_dispatch_covers_concrete_types() {
        for &kind in QuestionType::CONCRETE {
            assert!(generator_for(kind).is_some(), "{kind} has no generator");
        }
    }

    #[test]
    fn test_meta_resolves_to_concrete() {
        for seed in 0..200 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(3, QuestionType::MixAll, false, &mut rng);
            assert!(!p.kind.is_meta());
            let p = generate(3, QuestionType::MixBasic, false, &mut rng);
            assert!(QuestionType::BASIC_POOL.contains(&p.kind));
            let p = generate(3, QuestionType::Daily, false, &mut rng);
            assert!(QuestionType::CHALLENGE_POOL.contains(&p.kind));
        }
    }

    #[test]
    fn test_well_formed_every_type_and_tier() {
        for &kind in QuestionType::CONCRETE {
            for tier in 1..=6 {
                for hard in [false, true] {
                    for seed in 0..60 {
                        let mut rng = SeededRandom::new(seed * 31 + tier as u64);
                        let p = generate(tier, kind, hard, &mut rng);
                        assert!(p.is_well_formed(), "{kind} t{tier} h{hard}: {p:?}");
                        assert_eq!(p.kind, kind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_subtract_never_negative() {
        for seed in 0..1000 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(1 + (seed % 5) as u32, QuestionType::Subtract, seed % 7 == 0, &mut rng);
            assert!(p.answer >= 0.0);
        }
    }

    #[test]
    fn test_divide_exact() {
        for seed in 0..1000 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(1 + (seed % 5) as u32, QuestionType::Divide, seed % 3 == 0, &mut rng);
            let (dividend, divisor) = p
                .expression
                .split_once(" ÷ ")
                .map(|(a, b)| (a.parse::<i64>().unwrap(), b.parse::<i64>().unwrap()))
                .unwrap();
            assert_ne!(divisor, 0);
            assert_eq!(dividend % divisor, 0);
            assert_eq!(p.answer, (dividend / divisor) as f64);
            assert_eq!(p.answer.fract(), 0.0);
        }
    }

    #[test]
    fn test_sqrt_inverts_square() {
        let mut rng = SeededRandom::new(9);
        let p = generate(2, QuestionType::Sqrt, false, &mut rng);
        let square: i64 = p.expression.trim_start_matches('√').parse().unwrap();
        assert_eq!((p.answer * p.answer) as i64, square);
    }

    #[test]
    fn test_fraction_subtraction_falls_back_once() {
        // 1/4 - 2/4 goes negative; 1/4 - 1/4 is zero
        for (n2, expected) in [(2, Frac::new(3, 4)), (1, Frac::new(1, 2))] {
            let terms = FractionTerms { n1: 1, d1: 4, n2, d2: 4, add: false };
            let (used, result) = terms.resolve();
            assert!(used.add);
            assert_eq!(result, expected);
            // The fallback form is an addition and resolves to itself
            assert_eq!(used.resolve(), (used, result));
        }
    }

    #[test]
    fn test_fraction_positive_subtraction_kept() {
        let terms = FractionTerms { n1: 2, d1: 3, n2: 1, d2: 6, add: false };
        let (used, result) = terms.resolve();
        assert!(!used.add);
        assert_eq!(result, Frac::new(1, 2));
    }

    #[test]
    fn test_fraction_has_labels() {
        let mut rng = SeededRandom::new(5);
        let p = generate(2, QuestionType::Fraction, false, &mut rng);
        let labels = p.option_labels.clone().expect("fraction labels");
        assert!(labels[p.correct_index].chars().all(|c| c.is_ascii_digit() || c == '/'));
        assert!(p.answer > 0.0);
    }

    #[test]
    fn test_decimal_one_place() {
        for seed in 0..300 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(3, QuestionType::Decimal, false, &mut rng);
            for v in p.options {
                assert_eq!(round1(v), v);
                assert!(v > 0.0);
            }
        }
    }

    #[test]
    fn test_percent_exact() {
        for seed in 0..300 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(3, QuestionType::Percent, seed % 2 == 0, &mut rng);
            let (pct, base) = p.expression.split_once("% of ").unwrap();
            let (pct, base): (i64, i64) = (pct.parse().unwrap(), base.parse().unwrap());
            assert_eq!(pct * base % 100, 0);
            assert_eq!(p.answer, (pct * base / 100) as f64);
        }
    }

    #[test]
    fn test_linear_solution() {
        for seed in 0..300 {
            let mut rng = SeededRandom::new(seed);
            let p = generate(4, QuestionType::Linear, false, &mut rng);
            let (lhs, c) = p.expression.split_once(" = ").unwrap();
            let c: i64 = c.parse().unwrap();
            let parts: Vec<&str> = lhs.split(' ').collect();
            let a: i64 = parts[0].trim_end_matches('x').parse().unwrap();
            let b: i64 = parts[2].parse().unwrap();
            let b = if parts[1] == "-" { -b } else { b };
            assert_eq!(a * p.answer as i64 + b, c);
        }
    }
}
