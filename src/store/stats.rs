//! Session statistics.

use crate::models::{HttpLogRecord, RecordState, ShortType};
use std::fmt;

/// Aggregate figures over the captured records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub total: usize,
    /// Completed with a 2xx or 3xx status.
    pub successful: usize,
    /// Completed with a 4xx/5xx status, or failed without a response.
    pub failed: usize,
    /// Still waiting for a response.
    pub pending: usize,
    pub request_bytes: u64,
    pub response_bytes: u64,
    /// Mean elapsed seconds over records with a response.
    pub average_time_interval: Option<f64>,
    pub fastest_time_interval: Option<f64>,
    pub slowest_time_interval: Option<f64>,
    per_type: [usize; ShortType::COUNT],
}

impl Statistics {
    pub fn from_records(records: &[HttpLogRecord]) -> Self {
        let mut stats = Statistics {
            total: records.len(),
            ..Default::default()
        };
        let mut total_interval = 0.0;
        let mut responded = 0usize;

        for record in records {
            stats.request_bytes += record.request().body_length;
            stats.per_type[record.short_type().index()] += 1;

            match (record.state(), record.response()) {
                (RecordState::Pending, _) => stats.pending += 1,
                (_, Some(response)) => {
                    if response.is_success() {
                        stats.successful += 1;
                    } else {
                        stats.failed += 1;
                    }
                    stats.response_bytes += response.body_length;

                    let interval = response.time_interval;
                    total_interval += interval;
                    responded += 1;
                    stats.fastest_time_interval =
                        Some(stats.fastest_time_interval.map_or(interval, |f| f.min(interval)));
                    stats.slowest_time_interval =
                        Some(stats.slowest_time_interval.map_or(interval, |s| s.max(interval)));
                }
                (_, None) => stats.failed += 1,
            }
        }

        if responded > 0 {
            stats.average_time_interval = Some(total_interval / responded as f64);
        }

        stats
    }

    /// Number of records of `short_type`.
    pub fn count_for(&self, short_type: ShortType) -> usize {
        self.per_type[short_type.index()]
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Success: {} ({:.1}%) | Errors: {} ({:.1}%)",
            self.total,
            self.successful,
            percent(self.successful, self.total),
            self.failed,
            percent(self.failed, self.total)
        )?;
        if self.pending > 0 {
            write!(f, " | Pending: {}", self.pending)?;
        }
        if let Some(avg) = self.average_time_interval {
            write!(f, " | Avg time: {:.3}s", avg)?;
        }
        Ok(())
    }
}
