// LogDeck - core/stats.rs
//
// Aggregate figures over a view, for the --stats summary.

use crate::core::model::{LogRecord, StatusClass, Traffic};
use chrono::{DateTime, Duration, DurationRound, Utc};
use std::collections::BTreeMap;

/// Counts over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub total_records: usize,
    pub total_bytes: u64,
    pub by_status: BTreeMap<StatusClass, usize>,
    /// Records whose code falls in no status bucket.
    pub other_status: usize,
    pub by_method: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub bots: usize,
    pub humans: usize,
    /// Requests per UTC hour, keyed by the start of the hour.
    pub hourly: BTreeMap<DateTime<Utc>, usize>,
}

impl ViewStats {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        let mut stats = ViewStats::default();
        for record in records {
            stats.total_records += 1;
            stats.total_bytes = stats.total_bytes.saturating_add(record.byte_size);

            match record.status_class() {
                Some(class) => *stats.by_status.entry(class).or_default() += 1,
                None => stats.other_status += 1,
            }
            *stats.by_method.entry(record.method.clone()).or_default() += 1;
            *stats
                .by_category
                .entry(record.content_category.clone())
                .or_default() += 1;

            match Traffic::of(&record.agent_string) {
                Traffic::Bots => stats.bots += 1,
                Traffic::Humans => stats.humans += 1,
            }

            let hour = record
                .occurred_at
                .duration_trunc(Duration::hours(1))
                .unwrap_or(record.occurred_at);
            *stats.hourly.entry(hour).or_default() += 1;
        }

        tracing::debug!(
            total = stats.total_records,
            bots = stats.bots,
            hours = stats.hourly.len(),
            "View statistics computed"
        );
        stats
    }

    /// Count for one status bucket, zero when absent.
    pub fn status_count(&self, class: StatusClass) -> usize {
        self.by_status.get(&class).copied().unwrap_or(0)
    }

    /// The busiest hour, earliest first on ties.
    pub fn peak_hour(&self) -> Option<(DateTime<Utc>, usize)> {
        self.hourly
            .iter()
            .fold(None, |best: Option<(DateTime<Utc>, usize)>, (hour, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*hour, *count)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_record(hour: u32, minute: u32, status: u16, agent: &str) -> LogRecord {
        LogRecord {
            source_address: "10.1.1.1".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 10, hour, minute, 0).unwrap(),
            method: if status == 201 { "POST" } else { "GET" }.to_string(),
            path: "/".to_string(),
            status_code: status,
            byte_size: 100,
            agent_string: agent.to_string(),
            referer_url: String::new(),
            content_category: "html".to_string(),
        }
    }

    #[test]
    fn test_compute_counts() {
        let records = vec![
            make_record(8, 0, 200, "Mozilla/5.0"),
            make_record(8, 45, 201, "Mozilla/5.0"),
            make_record(9, 10, 404, "Googlebot/2.1"),
            make_record(9, 20, 101, "Mozilla/5.0"),
            make_record(9, 30, 503, "Mozilla/5.0"),
        ];
        let stats = ViewStats::compute(&records);
        assert_eq!(stats.total_records, 5);
        assert_eq!(stats.total_bytes, 500);
        assert_eq!(stats.status_count(StatusClass::Success), 2);
        assert_eq!(stats.status_count(StatusClass::Redirection), 0);
        assert_eq!(stats.status_count(StatusClass::ClientError), 1);
        assert_eq!(stats.other_status, 1);
        assert_eq!(stats.by_method.get("POST"), Some(&1));
        assert_eq!(stats.by_method.get("GET"), Some(&4));
        assert_eq!((stats.bots, stats.humans), (1, 4));
        assert_eq!(stats.hourly.len(), 2);
        let nine = Utc.with_ymd_and_hms(2023, 4, 10, 9, 0, 0).unwrap();
        assert_eq!(stats.peak_hour(), Some((nine, 3)));
    }

    #[test]
    fn test_empty_view() {
        let stats = ViewStats::compute(&Vec::<LogRecord>::new());
        assert_eq!(stats, ViewStats::default());
        assert_eq!(stats.peak_hour(), None);
    }
}
