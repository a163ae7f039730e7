use chrono::{DateTime, TimeZone};

/// `resume_analysis_YYYYMMDD_HHMM.txt`, stamped with the given time.
pub fn export_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("resume_analysis_{}.txt", at.format("%Y%m%d_%H%M"))
}
