//! Session history: an append-only, size-capped log of completed analyses.
//!
//! One `SessionHistory` is created at startup and dropped at shutdown; it is
//! injected through `AppState`, never reached through a global.
//! Statistics are derived on demand from the scored (`ats_score`) records.

pub mod handlers;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::models::analysis::AnalysisRecord;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Scores at or above this count as a success.
pub const SUCCESS_THRESHOLD: u8 = 70;
/// Number of records averaged at each end when computing the trend.
const TREND_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    /// Number of scored records the statistics are computed over.
    pub count: usize,
    /// All records, scored or not.
    pub total_records: usize,
    pub average: f64,
    pub best: u8,
    /// Percentage of scored records with score >= 70.
    pub success_rate: f64,
    /// Percentage change of the latest scores' mean over the earliest scores' mean.
    pub trend: f64,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    records: VecDeque<AnalysisRecord>,
    limit: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            records: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Appends a record, evicting the oldest ones once the cap is exceeded.
    pub fn append(&mut self, record: AnalysisRecord) {
        self.records.push_back(record);
        while self.records.len() > self.limit {
            self.records.pop_front();
        }
    }

    /// Oldest to newest.
    pub fn all(&self) -> Vec<AnalysisRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn stats(&self) -> HistoryStats {
        let scores: Vec<u8> = self.records.iter().filter_map(|r| r.score()).collect();
        let total_records = self.records.len();

        if scores.is_empty() {
            return HistoryStats {
                count: 0,
                total_records,
                average: 0.0,
                best: 0,
                success_rate: 0.0,
                trend: 0.0,
            };
        }

        let count = scores.len();
        let successes = scores.iter().filter(|&&s| s >= SUCCESS_THRESHOLD).count();

        HistoryStats {
            count,
            total_records,
            average: mean(&scores),
            best: scores.iter().copied().max().unwrap_or(0),
            success_rate: successes as f64 / count as f64 * 100.0,
            trend: trend(&scores),
        }
    }
}

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// 0 with fewer than two scores or a zero baseline.
fn trend(scores: &[u8]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let window = TREND_WINDOW.min(scores.len());
    let older = mean(&scores[..window]);
    let recent = mean(&scores[scores.len() - window..]);
    if older <= 0.0 {
        return 0.0;
    }
    (recent - older) / older * 100.0
}

/// The session's history behind a lock, shared across handlers.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    inner: Arc<Mutex<HistoryStore>>,
}

impl SessionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryStore::new(limit))),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut HistoryStore) -> T) -> T {
        let mut store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn append(&self, record: AnalysisRecord) {
        self.with(|store| store.append(record));
    }

    pub fn all(&self) -> Vec<AnalysisRecord> {
        self.with(|store| store.all())
    }

    pub fn stats(&self) -> HistoryStats {
        self.with(|store| store.stats())
    }

    pub fn clear(&self) {
        self.with(HistoryStore::clear);
    }

    pub fn limit(&self) -> usize {
        self.with(|store| store.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mode::AnalysisMode;

    fn scored(title: &str, score: u8) -> AnalysisRecord {
        AnalysisRecord::new(title, Some(score), AnalysisMode::AtsScore, "details")
    }

    fn store_with(scores: &[u8]) -> HistoryStore {
        let mut store = HistoryStore::default();
        for (i, &s) in scores.iter().enumerate() {
            store.append(scored(&format!("Role {i}"), s));
        }
        store
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let store = store_with(&[60, 70, 80]);
        let titles: Vec<_> = store.all().iter().map(|r| r.job_title().to_string()).collect();
        assert_eq!(titles, vec!["Role 0", "Role 1", "Role 2"]);
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut store = HistoryStore::new(50);
        for i in 1..=51 {
            store.append(scored(&format!("Record {i}"), 75));
        }
        let all = store.all();
        assert_eq!(all.len(), 50);
        assert!(all.iter().all(|r| r.job_title() != "Record 1"));
        assert_eq!(all.first().unwrap().job_title(), "Record 2");
        assert_eq!(all.last().unwrap().job_title(), "Record 51");
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        let mut store = HistoryStore::new(0);
        store.append(scored("a", 1));
        store.append(scored("b", 2));
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].job_title(), "b");
    }

    #[test]
    fn test_stats_on_empty_store_are_zero() {
        let stats = HistoryStore::default().stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.best, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.trend, 0.0);
    }

    #[test]
    fn test_trend_zero_with_single_record() {
        assert_eq!(store_with(&[90]).stats().trend, 0.0);
    }

    #[test]
    fn test_stats_values() {
        let stats = store_with(&[50, 60, 70, 80, 90]).stats();
        assert_eq!(stats.count, 5);
        assert!((stats.average - 70.0).abs() < 1e-9);
        assert_eq!(stats.best, 90);
        assert!((stats.success_rate - 60.0).abs() < 1e-9);
        // recent mean 80, older mean 60
        assert!((stats.trend - (20.0 / 60.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_trend_with_two_records_uses_overlapping_windows() {
        // both windows cover both scores
        assert_eq!(store_with(&[40, 80]).stats().trend, 0.0);
    }

    #[test]
    fn test_trend_zero_when_baseline_is_zero() {
        assert_eq!(store_with(&[0, 0, 0, 90]).stats().trend, 0.0);
    }

    #[test]
    fn test_unscored_records_excluded_from_stats() {
        let mut store = store_with(&[80]);
        store.append(AnalysisRecord::new(
            "Analyst",
            None,
            AnalysisMode::PersonalityAnalysis,
            "traits",
        ));
        let stats = store.stats();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.best, 80);
    }

    #[test]
    fn test_session_history_shares_one_store() {
        let history = SessionHistory::new(2);
        let handle = history.clone();
        handle.append(scored("a", 10));
        handle.append(scored("b", 20));
        handle.append(scored("c", 30));
        assert_eq!(history.all().len(), 2);
        assert_eq!(history.limit(), 2);
        history.clear();
        assert!(handle.all().is_empty());
    }
}
