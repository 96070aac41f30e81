use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Letter returned for any percentage outside every bracket.
pub const FAILING_GRADE: &str = "F";

/// Inclusive integer range mapped to one letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub letter: String,
    pub low: i32,
    pub high: i32,
}

/// Default 5-point brackets.
///
/// | Range   | Grade |
/// |---------|-------|
/// | 96–100  | A     |
/// | 91–95   | A-    |
/// | 86–90   | B+    |
/// | 81–85   | B     |
/// | 76–80   | B-    |
/// | 71–75   | C+    |
/// | 66–70   | C     |
/// | 61–65   | C-    |
/// | 56–60   | D+    |
/// | 51–55   | D     |
/// | < 51    | F     |
static DEFAULT_BRACKETS: &[(&str, i32, i32)] = &[
    ("A", 96, 100),
    ("A-", 91, 95),
    ("B+", 86, 90),
    ("B", 81, 85),
    ("B-", 76, 80),
    ("C+", 71, 75),
    ("C", 66, 70),
    ("C-", 61, 65),
    ("D+", 56, 60),
    ("D", 51, 55),
];

/// Ordered, validated list of non-overlapping letter brackets ending at 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeScale {
    brackets: Vec<Bracket>,
}

impl GradeScale {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGradeScale`] when the brackets are empty,
    /// inverted, overlapping, leave a gap, or do not top out at 100.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self> {
        let invalid = |msg: String| Err(EngineError::InvalidGradeScale(msg));

        if brackets.is_empty() {
            return invalid("no brackets".into());
        }
        for b in &brackets {
            if b.letter.trim().is_empty() {
                return invalid(format!("bracket {}..{} has no letter", b.low, b.high));
            }
            if b.low > b.high {
                return invalid(format!("{} has low {} above high {}", b.letter, b.low, b.high));
            }
        }

        let mut sorted: Vec<&Bracket> = brackets.iter().collect();
        sorted.sort_by_key(|b| b.low);
        for pair in sorted.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if upper.low <= lower.high {
                return invalid(format!("{} overlaps {}", lower.letter, upper.letter));
            }
            if upper.low != lower.high + 1 {
                return invalid(format!(
                    "gap between {} and {}",
                    lower.letter, upper.letter
                ));
            }
        }
        if let Some(top) = sorted.last() {
            if top.high != 100 {
                return invalid(format!("highest bracket ends at {}, not 100", top.high));
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Lowest percentage that still earns a passing letter.
    pub fn lowest_passing(&self) -> i32 {
        self.brackets.iter().map(|b| b.low).min().unwrap_or(0)
    }

    /// Letter for `percent`, rounded half away from zero before lookup.
    ///
    /// Anything outside every bracket, NaN included, is [`FAILING_GRADE`].
    pub fn letter_grade(&self, percent: f64) -> &str {
        let rounded = round_percent(percent);
        self.brackets
            .iter()
            .find(|b| f64::from(b.low) <= rounded && rounded <= f64::from(b.high))
            .map(|b| b.letter.as_str())
            .unwrap_or(FAILING_GRADE)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            brackets: DEFAULT_BRACKETS
                .iter()
                .map(|&(letter, low, high)| Bracket {
                    letter: letter.to_string(),
                    low,
                    high,
                })
                .collect(),
        }
    }
}

/// Nearest integer, with x.5 rounded up for non-negative percentages.
pub fn round_percent(percent: f64) -> f64 {
    percent.round()
}
