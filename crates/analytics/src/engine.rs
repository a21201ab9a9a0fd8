use chrono::Datelike;
use core_types::{DayRecord, KpiSnapshot};

/// A stateless calculator for deriving the dashboard KPIs from the series.
///
/// Input must already be sorted ascending by date (the builder's output
/// guarantee). Two different absence policies apply and must not be mixed
/// up: `today` and `mtd` substitute 0.0 for an absent profit, while `avg7`
/// excludes absent-profit records from the mean entirely.
#[derive(Debug, Default)]
pub struct KpiEngine {}

impl KpiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the full snapshot in one pass over the tail of the series.
    pub fn compute(&self, records: &[DayRecord]) -> KpiSnapshot {
        let Some(last) = records.last() else {
            return KpiSnapshot::empty();
        };

        let today = last.profit.unwrap_or(0.0);
        let last_date = last.date;

        // Delta vs the previous record. `today` is already 0.0-substituted,
        // so the only gate is the previous record's profit being present.
        let delta = match records.len() {
            n if n >= 2 => records[n - 2].profit.map(|prev| today - prev),
            _ => None,
        };

        KpiSnapshot {
            today: Some(today),
            mtd: self.month_to_date(records, last),
            avg7: self.trailing_average(records, 7),
            delta,
            last_date: Some(last_date),
        }
    }

    /// Sum of profit over all records sharing the target month.
    ///
    /// The target is the month of the *last record*, not the wall clock:
    /// stale data yields the stale month's MTD. Absent profits count as
    /// 0.0 rather than excluding the record.
    fn month_to_date(&self, records: &[DayRecord], last: &DayRecord) -> f64 {
        records
            .iter()
            .filter(|r| r.date.year() == last.date.year() && r.date.month() == last.date.month())
            .map(|r| r.profit.unwrap_or(0.0))
            .sum()
    }

    /// Mean profit over the last `n` records by position (not by calendar
    /// day), restricted to records whose profit is present. 0.0 when none
    /// qualify.
    fn trailing_average(&self, records: &[DayRecord], n: usize) -> f64 {
        let tail = &records[records.len().saturating_sub(n)..];
        let profits: Vec<f64> = tail.iter().filter_map(|r| r.profit).collect();
        if profits.is_empty() {
            return 0.0;
        }
        profits.iter().sum::<f64>() / profits.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: &str, profit: Option<f64>) -> DayRecord {
        DayRecord::new(date.parse::<NaiveDate>().unwrap(), None, None, profit)
    }

    #[test]
    fn empty_series_snapshot() {
        let snap = KpiEngine::new().compute(&[]);
        assert_eq!(snap, KpiSnapshot::empty());
        assert_eq!(snap.mtd, 0.0);
        assert_eq!(snap.avg7, 0.0);
    }

    #[test]
    fn single_record_has_no_delta() {
        let snap = KpiEngine::new().compute(&[rec("2024-01-01", Some(50.0))]);
        assert_eq!(snap.today, Some(50.0));
        assert_eq!(snap.delta, None);
        assert_eq!(snap.last_date, Some("2024-01-01".parse().unwrap()));
    }

    #[test]
    fn absent_today_profit_substitutes_zero() {
        let snap = KpiEngine::new().compute(&[rec("2024-01-01", None)]);
        assert_eq!(snap.today, Some(0.0));
        // The absent profit also counts as 0.0 towards MTD...
        assert_eq!(snap.mtd, 0.0);
        // ...but is excluded from the trailing average.
        assert_eq!(snap.avg7, 0.0);
    }

    #[test]
    fn delta_requires_previous_profit() {
        let with_prev = KpiEngine::new().compute(&[
            rec("2024-01-01", Some(30.0)),
            rec("2024-01-02", Some(50.0)),
        ]);
        assert_eq!(with_prev.delta, Some(20.0));

        let without_prev =
            KpiEngine::new().compute(&[rec("2024-01-01", None), rec("2024-01-02", Some(50.0))]);
        assert_eq!(without_prev.delta, None);
    }

    #[test]
    fn mtd_targets_the_last_records_month() {
        let snap = KpiEngine::new().compute(&[
            rec("2024-01-15", Some(10.0)),
            rec("2024-02-01", Some(20.0)),
            rec("2024-02-10", Some(30.0)),
        ]);
        // January's 10.0 is outside the target month.
        assert_eq!(snap.mtd, 50.0);
    }

    #[test]
    fn mtd_counts_absent_profit_as_zero() {
        let snap = KpiEngine::new().compute(&[
            rec("2024-02-01", Some(20.0)),
            rec("2024-02-05", None),
            rec("2024-02-10", Some(30.0)),
        ]);
        assert_eq!(snap.mtd, 50.0);
    }

    #[test]
    fn avg7_excludes_absent_profits_from_the_mean() {
        // Last 7 records: 5 with profits summing to 100, 2 absent.
        let records = vec![
            rec("2024-03-01", Some(10.0)),
            rec("2024-03-02", None),
            rec("2024-03-03", Some(20.0)),
            rec("2024-03-04", Some(30.0)),
            rec("2024-03-05", None),
            rec("2024-03-06", Some(15.0)),
            rec("2024-03-07", Some(25.0)),
        ];
        let snap = KpiEngine::new().compute(&records);
        assert_eq!(snap.avg7, 20.0); // 100 / 5, not 100 / 7
    }

    #[test]
    fn avg7_window_is_positional_not_calendar() {
        // 8 records; the first falls out of the window even though dates
        // are sparse.
        let mut records = vec![rec("2024-01-01", Some(700.0))];
        for day in 10..17 {
            records.push(rec(&format!("2024-03-{day:02}"), Some(10.0)));
        }
        let snap = KpiEngine::new().compute(&records);
        assert_eq!(snap.avg7, 10.0);
    }

    #[test]
    fn duplicate_dates_double_count() {
        // The builder keeps duplicate dates; aggregation sums both.
        let snap = KpiEngine::new().compute(&[
            rec("2024-02-01", Some(10.0)),
            rec("2024-02-01", Some(10.0)),
        ]);
        assert_eq!(snap.mtd, 20.0);
    }
}
