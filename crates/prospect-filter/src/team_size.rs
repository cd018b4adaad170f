use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// The one token whose meaning is not its digits: a bare `"5"` has always
/// meant "five or more" in saved directory URLs. Kept as-is so those URLs
/// keep selecting the same companies; not generalized to other numbers.
pub const FIVE_OR_MORE_TOKEN: &str = "5";

/// Inclusive team-size interval. `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSizeRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl TeamSizeRange {
    /// Parses a filter token into a numeric range.
    ///
    /// Tokens containing `1,000+` (with or without the comma) map to the
    /// open-ended top bucket. Otherwise commas are stripped and digit runs
    /// decide: none gives (0, 0), a single `n` gives (n, n), and the first
    /// two of several give (first, second).
    pub fn parse(token: &str) -> Self {
        if token.contains("1,000+") || token.contains("1000+") {
            return Self {
                min: 1000,
                max: None,
            };
        }

        let cleaned = token.replace(',', "");
        let numbers: Vec<u32> = DIGIT_RUNS
            .find_iter(&cleaned)
            .map(|m| m.as_str().parse().unwrap_or(u32::MAX))
            .collect();

        match numbers[..] {
            [] => Self {
                min: 0,
                max: Some(0),
            },
            [n] => Self {
                min: n,
                max: Some(n),
            },
            [min, max, ..] => Self {
                min,
                max: Some(max),
            },
        }
    }

    pub fn contains(&self, size: u32) -> bool {
        size >= self.min && self.max.map_or(true, |max| size <= max)
    }
}

/// True when `size` falls in a range parsed from any of `tokens`, or when
/// `tokens` is empty. The literal [`FIVE_OR_MORE_TOKEN`] also matches any
/// size of five or more.
pub fn matches_team_size(size: u32, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    for token in tokens {
        if TeamSizeRange::parse(token).contains(size) {
            return true;
        }
        if token == FIVE_OR_MORE_TOKEN && size >= 5 {
            return true;
        }
    }
    false
}
