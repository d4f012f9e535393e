//! Problem model and question-type tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rng::RandomSource;

/// Number of answer options on every problem
pub const OPTION_COUNT: usize = 3;

/// Error parsing a tag from outside the core (settings, links, CLI)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown question type `{0}`")]
    UnknownQuestionType(String),
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
}

/// Question-type tag.
///
/// The last four are meta tags: they resolve to a concrete type at
/// generation time and are never generated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Add,
    Subtract,
    Multiply,
    Divide,
    Square,
    Sqrt,
    Fraction,
    Decimal,
    Percent,
    Linear,
    #[default]
    MixBasic,
    MixAll,
    Daily,
    Challenge,
}

impl QuestionType {
    /// Every concrete (directly generated) type
    pub const CONCRETE: &'static [QuestionType] = &[
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
    ];

    /// Pool for `mix-basic`
    pub const BASIC_POOL: &'static [QuestionType] = &[
        QuestionType::Add,
        QuestionType::Subtract,
        QuestionType::Multiply,
        QuestionType::Divide,
    ];

    /// Pool for `daily` / `challenge` (basic arithmetic + powers)
    pub const CHALLENGE_POOL: &'static [QuestionType] = &[
        QuestionType::Add,
        QuestionType::Subtract,
        QuestionType::Multiply,
        QuestionType::Divide,
        QuestionType::Square,
        QuestionType::Sqrt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Add => "add",
            QuestionType::Subtract => "subtract",
            QuestionType::Multiply => "multiply",
            QuestionType::Divide => "divide",
            QuestionType::Square => "square",
            QuestionType::Sqrt => "sqrt",
            QuestionType::Fraction => "fraction",
            QuestionType::Decimal => "decimal",
            QuestionType::Percent => "percent",
            QuestionType::Linear => "linear",
            QuestionType::MixBasic => "mix-basic",
            QuestionType::MixAll => "mix-all",
            QuestionType::Daily => "daily",
            QuestionType::Challenge => "challenge",
        }
    }

    /// Lenient lookup (case-insensitive, a few aliases)
    pub fn from_tag(s: &str) -> Option<Self> {
        let t = match s.trim().to_lowercase().as_str() {
            "add" | "addition" | "+" => QuestionType::Add,
            "subtract" | "sub" | "subtraction" | "-" => QuestionType::Subtract,
            "multiply" | "mul" | "multiplication" | "x" | "*" => QuestionType::Multiply,
            "divide" | "div" | "division" | "/" => QuestionType::Divide,
            "square" | "squares" => QuestionType::Square,
            "sqrt" | "root" => QuestionType::Sqrt,
            "fraction" | "fractions" => QuestionType::Fraction,
            "decimal" | "decimals" => QuestionType::Decimal,
            "percent" | "percentage" | "%" => QuestionType::Percent,
            "linear" | "algebra" => QuestionType::Linear,
            "mix-basic" | "mix" => QuestionType::MixBasic,
            "mix-all" => QuestionType::MixAll,
            "daily" => QuestionType::Daily,
            "challenge" => QuestionType::Challenge,
            _ => return None,
        };
        Some(t)
    }

    /// True for tags that resolve to another type before generation
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            QuestionType::MixBasic
                | QuestionType::MixAll
                | QuestionType::Daily
                | QuestionType::Challenge
        )
    }

    /// Candidate pool for a meta tag (`None` for concrete tags)
    pub fn resolution_pool(&self) -> Option<&'static [QuestionType]> {
        match self {
            QuestionType::MixBasic => Some(Self::BASIC_POOL),
            QuestionType::MixAll => Some(Self::CONCRETE),
            QuestionType::Daily | QuestionType::Challenge => Some(Self::CHALLENGE_POOL),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseError::UnknownQuestionType(s.to_string()))
    }
}

/// Stable identifier of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProblemId {
    /// Fresh from the generator, not yet stamped by an owner
    #[default]
    Pending,
    /// Position in a session's rolling stream
    Sequence(u32),
    /// Position in a seeded challenge set
    Seeded { seed: u64, index: u32 },
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemId::Pending => f.write_str("pending"),
            ProblemId::Sequence(n) => write!(f, "p{n}"),
            ProblemId::Seeded { seed, index } => write!(f, "{seed}-{index}"),
        }
    }
}

/// A single multiple-choice arithmetic problem.
///
/// Invariant: `options` are pairwise distinct and
/// `options[correct_index] == answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    /// Concrete type this problem was generated as
    pub kind: QuestionType,
    /// Plain-text question
    pub expression: String,
    /// Markup form; renderers prefer it when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    pub answer: f64,
    pub options: [f64; OPTION_COUNT],
    /// Display strings aligned with `options` (fractions, decimals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_labels: Option<[String; OPTION_COUNT]>,
    pub correct_index: usize,
    /// Wall-clock ms when the problem became current
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

impl Problem {
    /// Assemble a problem, placing the answer in a uniformly random slot and
    /// the two distractors in the remaining slots in order.
    pub fn package(
        kind: QuestionType,
        expression: String,
        latex: Option<String>,
        answer: f64,
        distractors: [f64; 2],
        labels: Option<(String, [String; 2])>,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let correct_index = rng.index(OPTION_COUNT);

        let mut options = [0.0; OPTION_COUNT];
        let mut rest = distractors.iter();
        for (slot, option) in options.iter_mut().enumerate() {
            *option = if slot == correct_index {
                answer
            } else {
                rest.next().copied().unwrap_or(answer)
            };
        }

        let option_labels = labels.map(|(answer_label, distractor_labels)| {
            let mut rest = distractor_labels.into_iter();
            std::array::from_fn(|slot| {
                if slot == correct_index {
                    answer_label.clone()
                } else {
                    rest.next().unwrap_or_default()
                }
            })
        });

        Self {
            id: ProblemId::Pending,
            kind,
            expression,
            latex,
            answer,
            options,
            option_labels,
            correct_index,
            start_time: None,
        }
    }

    /// Label shown for option `i`
    pub fn label(&self, i: usize) -> String {
        match &self.option_labels {
            Some(labels) => labels[i].clone(),
            None => format_number(self.options[i]),
        }
    }

    /// Whether `index` picks the correct option
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// Checks the option-set invariant
    pub fn is_well_formed(&self) -> bool {
        let [a, b, c] = self.options;
        self.correct_index < OPTION_COUNT
            && self.options[self.correct_index] == self.answer
            && a != b
            && b != c
            && a != c
    }
}

/// Integers without a trailing `.0`, everything else as given
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::rng::ReplayRandom;

    #[test]
    fn test_tag_round_trip() {
        for &t in QuestionType::CONCRETE {
            assert_eq!(QuestionType::from_tag(t.as_str()), Some(t));
        }
        assert_eq!("mix-all".parse::<QuestionType>(), Ok(QuestionType::MixAll));
        assert_eq!(
            "bogus".parse::<QuestionType>(),
            Err(ParseError::UnknownQuestionType("bogus".into()))
        );
    }

    #[test]
    fn test_meta_tags_have_pools() {
        for t in [
            QuestionType::MixBasic,
            QuestionType::MixAll,
            QuestionType::Daily,
            QuestionType::Challenge,
        ] {
            assert!(t.is_meta());
            let pool = t.resolution_pool().unwrap();
            assert!(pool.iter().all(|p| !p.is_meta()));
        }
        assert!(QuestionType::Add.resolution_pool().is_none());
    }

    #[test]
    fn test_package_places_answer() {
        // 0.5 * 3 = 1.5 -> slot 1
        let mut rng = ReplayRandom::new(vec![0.5]);
        let p = Problem::package(
            QuestionType::Add,
            "2 + 2".into(),
            None,
            4.0,
            [5.0, 3.0],
            None,
            &mut rng,
        );
        assert_eq!(p.correct_index, 1);
        assert_eq!(p.options, [5.0, 4.0, 3.0]);
        assert!(p.is_well_formed());
    }

    #[test]
    fn test_package_labels_follow_options() {
        let mut rng = ReplayRandom::new(vec![0.0]);
        let p = Problem::package(
            QuestionType::Fraction,
            "1/2 + 1/4".into(),
            None,
            0.75,
            [0.5, 1.0],
            Some(("3/4".into(), ["1/2".into(), "1".into()])),
            &mut rng,
        );
        assert_eq!(p.correct_index, 0);
        assert_eq!(p.label(0), "3/4");
        assert_eq!(p.label(1), "1/2");
        assert_eq!(p.label(2), "1");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_problem_id_display() {
        assert_eq!(ProblemId::Sequence(4).to_string(), "p4");
        assert_eq!(
            ProblemId::Seeded {
                seed: 20261017,
                index: 3
            }
            .to_string(),
            "20261017-3"
        );
    }
}
