//! Result Parser: best-effort extraction of a score and job title from free text.
//!
//! Layers run in a fixed order and later layers are intentionally coarser:
//! 1. `Overall Score: N/100`
//! 2. `Score: N/100`
//! 3. bare `N/100` (not preceded by a digit or minus sign)
//! 4. sentiment keywords
//! 5. default
//!
//! Nothing in here returns an error. A missing pattern degrades to the next layer.

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_SCORE: u8 = 70;
pub const DEFAULT_JOB_TITLE: &str = "Analyzed Position";

const TITLE_SCAN_LINES: usize = 5;
const TITLE_MAX_CHARS: usize = 100;
const ROLE_KEYWORDS: [&str; 5] = ["engineer", "developer", "analyst", "manager", "specialist"];

/// Sentiment tiers, checked top to bottom.
const SENTIMENT_TIERS: [(&[&str], u8); 4] = [
    (&["excellent", "outstanding", "perfect"], 85),
    (&["good", "strong", "solid"], 75),
    (&["average", "fair", "adequate"], 65),
    (&["poor", "weak", "terrible", "bad"], 45),
];

static SCORE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Overall Score:\s*(\d{1,3})/100",
        r"(?i)Score:\s*(\d{1,3})/100",
        r"(?i)(?:^|[^\d-])(\d{1,3})/100",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Extracts a 0..=100 score from a model response. Total over all inputs.
pub fn extract_score(response: &str) -> u8 {
    if let Some(score) = pattern_score(response) {
        return score;
    }
    sentiment_score(response)
}

fn pattern_score(response: &str) -> Option<u8> {
    SCORE_PATTERNS.iter().find_map(|re| {
        let digits = re.captures(response)?.get(1)?.as_str();
        // \d{1,3} always fits; the clamp handles 101..=999.
        let value = digits.parse::<u16>().ok()?;
        Some(value.min(100) as u8)
    })
}

fn sentiment_score(response: &str) -> u8 {
    let lowered = response.to_lowercase();
    SENTIMENT_TIERS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_SCORE)
}

/// Picks the first short line among the first five non-empty lines that names a role.
pub fn extract_job_title(job_description: &str) -> String {
    job_description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(TITLE_SCAN_LINES)
        .find(|line| line.chars().count() < TITLE_MAX_CHARS && mentions_role(line))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string())
}

fn mentions_role(line: &str) -> bool {
    let lowered = line.to_lowercase();
    ROLE_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Coarse label shown next to an ATS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    StrongMatch,
    GoodMatch,
    FairMatch,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::StrongMatch,
            70..=79 => ScoreBand::GoodMatch,
            60..=69 => ScoreBand::FairMatch,
            _ => ScoreBand::NeedsImprovement,
        }
    }
}
