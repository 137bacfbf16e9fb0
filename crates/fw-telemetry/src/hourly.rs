//! Hourly temperature archiving with same-hour deduplication.
//!
//! The archive keeps at most one temperature per clock hour: the first
//! accepted reading observed in each new hour. Duplicates within an hour
//! are skipped, matching the dashboard's expectation of one row per hour.

/// Clock-hour bucket of a stream timestamp (seconds since epoch).
pub fn hour_bucket(ts: f64) -> i64 {
    (ts / 3600.0).floor() as i64
}

/// Start of the bucket's hour in seconds since epoch.
pub fn hour_start_secs(bucket: i64) -> i64 {
    bucket * 3600
}

/// Tracks which hour was last archived.
#[derive(Debug, Clone, Default)]
pub struct HourlyArchiver {
    last_bucket: Option<i64>,
}

impl HourlyArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reading at `ts` should be archived. Marks the hour as
    /// archived when it returns true.
    pub fn observe(&mut self, ts: f64) -> bool {
        let bucket = hour_bucket(ts);
        if self.last_bucket == Some(bucket) {
            return false;
        }
        self.last_bucket = Some(bucket);
        true
    }

    /// The last archived hour bucket, if any.
    pub fn last_bucket(&self) -> Option<i64> {
        self.last_bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reading_archives() {
        let mut archiver = HourlyArchiver::new();
        assert!(archiver.observe(7200.0));
    }

    #[test]
    fn test_same_hour_deduplicates() {
        let mut archiver = HourlyArchiver::new();
        assert!(archiver.observe(7200.0));
        assert!(!archiver.observe(7215.0));
        assert!(!archiver.observe(10799.9));
    }

    #[test]
    fn test_new_hour_archives_again() {
        let mut archiver = HourlyArchiver::new();
        assert!(archiver.observe(7200.0));
        assert!(archiver.observe(10800.0));
        assert_eq!(archiver.last_bucket(), Some(3));
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(hour_bucket(3599.999), 0);
        assert_eq!(hour_bucket(3600.0), 1);
        assert_eq!(hour_start_secs(hour_bucket(5000.0)), 3600);
    }
}
