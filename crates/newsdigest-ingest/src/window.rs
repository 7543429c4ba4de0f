//! Trailing date window anchored to the newest date in a batch.
//!
//! The pipeline anchors on the full listing, before any page is fetched, so
//! a failed or deduplicated newest story never moves the cutoff.

use chrono::{Days, NaiveDate};
use newsdigest_core::{AppConfig, Record};

#[derive(Debug, Clone, Copy)]
pub struct WindowFilter {
    days: u64,
}

impl WindowFilter {
    #[must_use]
    pub fn new(days: u64) -> Self {
        Self { days }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.window_days)
    }

    /// `max(dates) - days`, or `None` when there are no dates.
    #[must_use]
    pub fn cutoff_for(&self, dates: impl IntoIterator<Item = NaiveDate>) -> Option<NaiveDate> {
        let newest = dates.into_iter().max()?;
        Some(
            newest
                .checked_sub_days(Days::new(self.days))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Cutoff anchored on the records themselves.
    #[must_use]
    pub fn cutoff(&self, records: &[Record]) -> Option<NaiveDate> {
        self.cutoff_for(records.iter().map(|r| r.date))
    }

    /// Keep records dated on or after their own batch cutoff.
    #[must_use]
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        match self.cutoff(&records) {
            Some(cutoff) => Self::apply_from(cutoff, records),
            None => records,
        }
    }

    /// Keep records dated on or after `cutoff`, preserving order.
    #[must_use]
    pub fn apply_from(cutoff: NaiveDate, records: Vec<Record>) -> Vec<Record> {
        let before = records.len();
        let kept: Vec<Record> = records.into_iter().filter(|r| r.date >= cutoff).collect();
        if kept.len() < before {
            tracing::debug!(
                %cutoff,
                before,
                after = kept.len(),
                "dropped records outside the date window"
            );
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> Record {
        Record {
            heading: format!("Story from {date}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            link: format!("https://example.com/{date}"),
            content: "Some content.".to_string(),
        }
    }

    fn dates(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.date.to_string()).collect()
    }

    #[test]
    fn boundary_day_is_retained_and_day_before_excluded() {
        let records = vec![record("2024-03-10"), record("2024-03-03"), record("2024-03-02")];
        let kept = WindowFilter::new(7).apply(records);
        assert_eq!(dates(&kept), vec!["2024-03-10", "2024-03-03"]);
    }

    #[test]
    fn anchor_is_newest_record_not_first() {
        let records = vec![record("2024-03-01"), record("2024-03-10"), record("2024-02-20")];
        let filter = WindowFilter::new(7);
        assert_eq!(
            filter.cutoff(&records),
            NaiveDate::from_ymd_opt(2024, 3, 3)
        );
        assert_eq!(dates(&filter.apply(records)), vec!["2024-03-10"]);
    }

    #[test]
    fn retained_and_excluded_partition_on_cutoff() {
        let records: Vec<Record> = (1..=28)
            .map(|day| record(&format!("2024-02-{day:02}")))
            .collect();
        let filter = WindowFilter::new(7);
        let cutoff = filter.cutoff(&records).unwrap();
        let kept = filter.apply(records.clone());

        assert!(kept.iter().all(|r| r.date >= cutoff));
        let excluded: Vec<&Record> = records.iter().filter(|r| !kept.contains(r)).collect();
        assert!(excluded.iter().all(|r| r.date < cutoff));
        assert_eq!(kept.len(), 8);
    }

    #[test]
    fn zero_day_window_keeps_only_newest_date() {
        let records = vec![record("2024-03-10"), record("2024-03-10"), record("2024-03-09")];
        let kept = WindowFilter::new(0).apply(records);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn explicit_cutoff_ignores_records_newest_date() {
        let listed = ["2024-03-10", "2024-03-05", "2024-03-01"]
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap());
        let filter = WindowFilter::new(7);
        let cutoff = filter.cutoff_for(listed).unwrap();
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());

        // The 03-10 item never made it past resolution.
        let survivors = vec![record("2024-03-05"), record("2024-03-01")];
        let kept = WindowFilter::apply_from(cutoff, survivors);
        assert_eq!(dates(&kept), vec!["2024-03-05"]);
    }

    #[test]
    fn empty_batch_passes_through() {
        let filter = WindowFilter::new(7);
        assert!(filter.cutoff(&[]).is_none());
        assert!(filter.cutoff_for(std::iter::empty()).is_none());
        assert!(filter.apply(Vec::new()).is_empty());
    }
}
