//! Time-bucketed series. Only tickets with a parsed date take part.

use chrono::{Datelike, NaiveDate};
use reportes_core::model::Status;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::TicketSet;
use crate::date;
use crate::locale::MonthLocale;

/// Buckets kept by [`TicketSet::recent_trend`].
pub const RECENT_MONTHS: usize = 12;

/// Distinct dates kept by [`TicketSet::daily_trend`].
pub const DAILY_WINDOW: usize = 30;

/// Working days per month assumed by the weekly average.
pub const WORKING_DAYS_PER_MONTH: f64 = 21.0;

/// Tickets in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: u64,
}

/// A month bucket split by status, for charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTrend {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total: u64,
    pub resolved: u64,
    pub pending: u64,
    pub in_progress: u64,
}

/// Tickets sharing one exact date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    /// The stored date text.
    pub raw: String,
    pub date: NaiveDate,
    /// `dd/mm`.
    pub label: String,
    pub count: u64,
}

/// Monthly and weekly ticket averages over the most recent year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub monthly: f64,
    pub weekly: f64,
    pub active_months: usize,
    /// Year the averages cover; `None` when nothing is dated.
    pub year: Option<i32>,
}

impl TicketSet {
    fn month_counts(&self) -> BTreeMap<(i32, u32), u64> {
        let mut counts = BTreeMap::new();
        for (_, d) in self.dated() {
            *counts.entry((d.year(), d.month())).or_insert(0) += 1;
        }
        counts
    }

    /// Per-month counts, oldest first.
    #[must_use]
    pub fn monthly_buckets(&self, locale: MonthLocale) -> Vec<MonthBucket> {
        self.month_counts()
            .into_iter()
            .map(|((year, month), count)| MonthBucket {
                year,
                month,
                label: locale.label(year, month),
                count,
            })
            .collect()
    }

    /// The last [`RECENT_MONTHS`] months with per-status counts, newest
    /// first. Statuses are recognized in English or Spanish; other literals
    /// only add to `total`.
    #[must_use]
    pub fn recent_trend(&self, locale: MonthLocale) -> Vec<MonthTrend> {
        let mut months: BTreeMap<(i32, u32), MonthTrend> = BTreeMap::new();
        for (ticket, d) in self.dated() {
            let (year, month) = (d.year(), d.month());
            let bucket = months.entry((year, month)).or_insert_with(|| MonthTrend {
                year,
                month,
                label: locale.label(year, month),
                total: 0,
                resolved: 0,
                pending: 0,
                in_progress: 0,
            });
            bucket.total += 1;
            match ticket.parsed_status() {
                Some(Status::Resolved) => bucket.resolved += 1,
                Some(Status::Pending) => bucket.pending += 1,
                Some(Status::InProgress) => bucket.in_progress += 1,
                None => {}
            }
        }
        months.into_values().rev().take(RECENT_MONTHS).collect()
    }

    /// Date-string groups falling on the [`DAILY_WINDOW`] most recent
    /// distinct calendar dates, oldest first. A day stored in two layouts
    /// yields two groups but uses one slot of the window.
    #[must_use]
    pub fn daily_trend(&self) -> Vec<DayBucket> {
        let mut counts: HashMap<&str, (NaiveDate, u64)> = HashMap::new();
        for (ticket, d) in self.dated() {
            counts.entry(ticket.date.as_str()).or_insert((d, 0)).1 += 1;
        }

        let window: BTreeSet<NaiveDate> = counts
            .values()
            .map(|(d, _)| *d)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .take(DAILY_WINDOW)
            .collect();

        let mut days: Vec<DayBucket> = counts
            .into_iter()
            .filter(|(_, (d, _))| window.contains(d))
            .map(|(raw, (d, count))| DayBucket {
                raw: raw.to_string(),
                date: d,
                label: date::format_day_label(d),
                count,
            })
            .collect();

        days.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.raw.cmp(&b.raw)));
        days
    }

    /// Averages over the months of the latest year present.
    ///
    /// `weekly` keeps the operational estimate of 21 working days per month
    /// and five working days per week.
    #[must_use]
    pub fn averages(&self) -> Averages {
        let counts = self.month_counts();
        let Some(&(year, _)) = counts.keys().next_back() else {
            return Averages {
                monthly: 0.0,
                weekly: 0.0,
                active_months: 0,
                year: None,
            };
        };

        let in_year: Vec<u64> = counts
            .iter()
            .filter(|((y, _), _)| *y == year)
            .map(|(_, count)| *count)
            .collect();
        let months = in_year.len();
        let sum: u64 = in_year.iter().sum();

        #[allow(clippy::cast_precision_loss)]
        let (sum, months_f) = (sum as f64, months as f64);
        Averages {
            monthly: sum / months_f,
            weekly: (sum / (WORKING_DAYS_PER_MONTH * months_f)) * 5.0,
            active_months: months,
            year: Some(year),
        }
    }
}
