use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four analysis modes offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    AtsScore,
    PersonalityAnalysis,
    MissingKeywords,
    ResumeOptimization,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::AtsScore,
        AnalysisMode::PersonalityAnalysis,
        AnalysisMode::MissingKeywords,
        AnalysisMode::ResumeOptimization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::AtsScore => "ats_score",
            AnalysisMode::PersonalityAnalysis => "personality_analysis",
            AnalysisMode::MissingKeywords => "missing_keywords",
            AnalysisMode::ResumeOptimization => "resume_optimization",
        }
    }

    /// Only ATS analyses produce a numeric score.
    pub fn is_scored(self) -> bool {
        matches!(self, AnalysisMode::AtsScore)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown analysis mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for AnalysisMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AnalysisMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMode(wanted.to_string()))
    }
}
