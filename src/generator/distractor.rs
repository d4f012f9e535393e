//! Distractor synthesis
//!
//! Each family runs a bounded search for two distinct wrong answers and
//! falls back to plain arithmetic (`answer + k`) when the budget runs out,
//! so every path returns exactly two values that differ from each other and
//! from the answer.

use serde::{Deserialize, Serialize};

use super::rng::{RandomSource, pick};

/// Attempt budget for every distractor search
pub const MAX_ATTEMPTS: usize = 24;

/// Fill `found` up to two entries with `answer + k` for k = 1, 2, ...
///
/// Terminates after at most three steps: `found` never holds more than two
/// values, so at most two `k` can collide.
fn fallback_fill(answer: i64, found: &mut Vec<i64>, family: &str) {
    if found.len() < 2 {
        log::warn!(
            "{family} distractor search exhausted for {answer}, using fallback"
        );
    }
    let mut k = 1;
    while found.len() < 2 {
        let candidate = answer + k;
        if !found.contains(&candidate) {
            found.push(candidate);
        }
        k += 1;
    }
}

fn into_pair(found: Vec<i64>) -> [i64; 2] {
    [found[0], found[1]]
}

/// Random offset scaled to the answer's magnitude.
///
/// Negative candidates are discarded, so answers of 0 or above only ever get
/// non-negative distractors.
pub fn near(answer: i64, rng: &mut dyn RandomSource) -> [i64; 2] {
    let spread = ((answer.abs() as f64 * 0.2).ceil() as i64).max(3);
    let mut found = Vec::with_capacity(2);

    for _ in 0..MAX_ATTEMPTS {
        if found.len() == 2 {
            break;
        }
        let magnitude = rng.int_in(1, spread);
        let offset = if rng.chance(0.5) { -magnitude } else { magnitude };
        let candidate = answer + offset;
        if candidate < 0 || candidate == answer || found.contains(&candidate) {
            continue;
        }
        found.push(candidate);
    }

    fallback_fill(answer, &mut found, "near");
    into_pair(found)
}

/// Ways to perturb a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStrategy {
    /// (a ± 1) × b
    AlterFirst,
    /// a × (b ± 1)
    AlterSecond,
    /// a × b ± a, or a × b ± b
    OperandOffset,
    /// a × b ± 1..=3
    SmallOffset,
}

const PRODUCT_STRATEGIES: &[ProductStrategy] = &[
    ProductStrategy::AlterFirst,
    ProductStrategy::AlterSecond,
    ProductStrategy::OperandOffset,
    ProductStrategy::SmallOffset,
];

/// Plausible slips for `a × b`: off-by-one operands, an extra row, or a
/// small miscount. Non-positive candidates are discarded.
pub fn multiplicative(a: i64, b: i64, rng: &mut dyn RandomSource) -> [i64; 2] {
    let product = a * b;
    let mut found = Vec::with_capacity(2);

    for _ in 0..MAX_ATTEMPTS {
        if found.len() == 2 {
            break;
        }
        let strategy = *pick(rng, PRODUCT_STRATEGIES);
        let sign = if rng.chance(0.5) { 1 } else { -1 };
        let candidate = match strategy {
            ProductStrategy::AlterFirst => (a + sign) * b,
            ProductStrategy::AlterSecond => a * (b + sign),
            ProductStrategy::OperandOffset => {
                let operand = if rng.chance(0.5) { a } else { b };
                product + sign * operand
            }
            ProductStrategy::SmallOffset => product + sign * rng.int_in(1, 3),
        };
        if candidate <= 0 || candidate == product || found.contains(&candidate) {
            continue;
        }
        found.push(candidate);
    }

    fallback_fill(product, &mut found, "multiplicative");
    into_pair(found)
}

/// Offsets tried by the decimal family, in tenths
const TENTH_STEPS: &[i64] = &[1, 2, 3, 5, 10];

/// Distractors for a one-decimal-place answer, all values in tenths.
///
/// Working in integer tenths keeps every candidate on the one-decimal grid
/// with no float drift.
pub fn decimal(answer_tenths: i64, rng: &mut dyn RandomSource) -> [i64; 2] {
    let mut found = Vec::with_capacity(2);

    for _ in 0..MAX_ATTEMPTS {
        if found.len() == 2 {
            break;
        }
        let step = *pick(rng, TENTH_STEPS);
        let candidate = if rng.chance(0.5) {
            answer_tenths + step
        } else {
            answer_tenths - step
        };
        if candidate <= 0 || candidate == answer_tenths || found.contains(&candidate) {
            continue;
        }
        found.push(candidate);
    }

    fallback_fill(answer_tenths, &mut found, "decimal");
    into_pair(found)
}

/// Reduced positive-denominator fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frac {
    pub num: i64,
    pub den: i64,
}

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Frac {
    /// Build and reduce. `den` must be non-zero.
    pub fn new(num: i64, den: i64) -> Self {
        let g = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Self {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    pub fn value(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn is_positive(&self) -> bool {
        self.num > 0 && self.den > 0
    }

    /// `3/4`, or `2` for whole numbers
    pub fn label(&self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }

    pub fn latex(&self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("\\frac{{{}}}{{{}}}", self.num, self.den)
        }
    }
}

/// Numerator/denominator slips: ±1 on either part, or +1 on both.
/// Candidates are compared after reduction.
pub fn fraction(answer: Frac, rng: &mut dyn RandomSource) -> [Frac; 2] {
    let Frac { num, den } = answer;
    let mut found: Vec<Frac> = Vec::with_capacity(2);

    for _ in 0..MAX_ATTEMPTS {
        if found.len() == 2 {
            break;
        }
        let (n, d) = match rng.index(5) {
            0 => (num + 1, den),
            1 => (num - 1, den),
            2 => (num, den + 1),
            3 => (num, den - 1),
            _ => (num + 1, den + 1),
        };
        if n <= 0 || d <= 0 {
            continue;
        }
        let candidate = Frac::new(n, d);
        if candidate == answer
            || candidate.value() == answer.value()
            || found.iter().any(|f| f.value() == candidate.value())
        {
            continue;
        }
        found.push(candidate);
    }

    if found.len() < 2 {
        log::warn!("fraction distractor search exhausted for {}, using fallback", answer.label());
    }
    let mut k = 1;
    while found.len() < 2 {
        let candidate = Frac::new(num + k * den, den);
        if !found.iter().any(|f| f.value() == candidate.value()) {
            found.push(candidate);
        }
        k += 1;
    }
    [found[0], found[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::rng::{ReplayRandom, SeededRandom};

    fn distinct(answer: i64, pair: [i64; 2]) -> bool {
        pair[0] != pair[1] && pair[0] != answer && pair[1] != answer
    }

    #[test]
    fn test_near_distinct_over_many_seeds() {
        for seed in 0..500 {
            let mut rng = SeededRandom::new(seed);
            let answer = rng.int_in(0, 300);
            let pair = near(answer, &mut rng);
            assert!(distinct(answer, pair), "{answer} -> {pair:?}");
            assert!(pair.iter().all(|&v| v >= 0));
        }
    }

    #[test]
    fn test_near_fallback_terminates() {
        // A constant draw produces the same candidate every attempt, so the
        // search can find at most one value and must fall back.
        let mut rng = ReplayRandom::new(vec![0.0]);
        let pair = near(10, &mut rng);
        assert!(distinct(10, pair));
        assert!(rng.draws() <= 2 * MAX_ATTEMPTS);
    }

    #[test]
    fn test_near_zero_answer() {
        let mut rng = ReplayRandom::new(vec![0.0]);
        // Every draw gives -1 which is rejected: pure fallback
        let pair = near(0, &mut rng);
        assert_eq!(pair, [1, 2]);
    }

    #[test]
    fn test_multiplicative_positive_and_distinct() {
        for seed in 0..500 {
            let mut rng = SeededRandom::new(seed);
            let a = rng.int_in(1, 20);
            let b = rng.int_in(1, 20);
            let pair = multiplicative(a, b, &mut rng);
            assert!(distinct(a * b, pair), "{a}x{b} -> {pair:?}");
            assert!(pair.iter().all(|&v| v > 0));
        }
    }

    #[test]
    fn test_multiplicative_one_by_one() {
        // 1 x 1 rejects most slips (0 is non-positive); fallback still works
        let mut rng = ReplayRandom::new(vec![0.9]);
        let pair = multiplicative(1, 1, &mut rng);
        assert!(distinct(1, pair));
    }

    #[test]
    fn test_decimal_stays_positive() {
        for seed in 0..300 {
            let mut rng = SeededRandom::new(seed);
            let pair = decimal(1, &mut rng);
            assert!(distinct(1, pair));
            assert!(pair.iter().all(|&v| v > 0));
        }
    }

    #[test]
    fn test_frac_reduces() {
        assert_eq!(Frac::new(6, 8), Frac { num: 3, den: 4 });
        assert_eq!(Frac::new(4, 2).label(), "2");
        assert_eq!(Frac::new(1, -2), Frac { num: -1, den: 2 });
        assert_eq!(Frac::new(3, 4).latex(), "\\frac{3}{4}");
    }

    #[test]
    fn test_fraction_distractors_distinct_values() {
        for seed in 0..300 {
            let mut rng = SeededRandom::new(seed);
            let answer = Frac::new(rng.int_in(1, 11), rng.int_in(2, 12));
            let [x, y] = fraction(answer, &mut rng);
            assert!(x.is_positive() && y.is_positive());
            assert_ne!(x.value(), y.value());
            assert_ne!(x.value(), answer.value());
            assert_ne!(y.value(), answer.value());
        }
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(-4, 6), 2);
    }
}
