#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::mode::AnalysisMode;

/// Characters of the raw model response kept on a record.
pub const DETAILS_MAX_CHARS: usize = 300;

/// One completed analysis. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    id: Uuid,
    timestamp: DateTime<Utc>,
    job_title: String,
    /// Present only for `ats_score` analyses; always within 0..=100.
    score: Option<u8>,
    analysis_type: AnalysisMode,
    details: String,
}

impl AnalysisRecord {
    pub fn new(
        job_title: impl Into<String>,
        score: Option<u8>,
        analysis_type: AnalysisMode,
        raw_response: &str,
    ) -> Self {
        Self::at(Utc::now(), job_title, score, analysis_type, raw_response)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        job_title: impl Into<String>,
        score: Option<u8>,
        analysis_type: AnalysisMode,
        raw_response: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            job_title: job_title.into(),
            score: score.map(|s| s.min(100)),
            analysis_type,
            details: raw_response.chars().take(DETAILS_MAX_CHARS).collect(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn analysis_type(&self) -> AnalysisMode {
        self.analysis_type
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}
