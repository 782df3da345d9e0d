//! Aggregation engine.
//!
//! Rows are wrapped once into a [`TicketSet`], which parses every date up
//! front. The statistics live in `impl TicketSet` blocks grouped by concern:
//!
//! - [`counts`]: totals, status breakdown, office/floor/resolver rankings
//! - [`trend`]: monthly buckets, the recent trend, the daily trend, averages
//! - [`winners`]: employee of the month and of the week
//! - [`summary`]: bundled dashboards
//!
//! Records with unparseable dates are kept for the plain counts and
//! excluded from anything bucketed by date.

pub mod counts;
pub mod summary;
pub mod trend;
pub mod winners;

use chrono::{Duration, NaiveDate};
use reportes_core::model::Ticket;

use crate::date;

pub use summary::{Summary, SummaryOptions, WeekReport};
pub use trend::{Averages, DayBucket, MonthBucket, MonthTrend};
pub use winners::MonthWinners;

/// Default length of office, floor and resolver rankings.
pub const DEFAULT_TOP: usize = 5;

/// A ticket paired with its parsed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedTicket {
    pub ticket: Ticket,
    pub date: Option<NaiveDate>,
}

/// An immutable snapshot of tickets ready for aggregation.
#[derive(Debug, Clone, Default)]
pub struct TicketSet {
    entries: Vec<DatedTicket>,
}

impl TicketSet {
    /// Parse every ticket's date once.
    pub fn new(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let entries = tickets
            .into_iter()
            .map(|ticket| {
                let date = match date::parse_flexible(&ticket.date) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        tracing::debug!(id = ticket.id, error = %e, "ticket date not parsed");
                        None
                    }
                };
                DatedTicket { ticket, date }
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatedTicket> {
        self.entries.iter()
    }

    /// Tickets whose date parsed, with that date.
    pub fn dated(&self) -> impl Iterator<Item = (&Ticket, NaiveDate)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.date.map(|d| (&entry.ticket, d)))
    }

    /// Number of tickets whose date matched no accepted layout.
    #[must_use]
    pub fn unparsed_dates(&self) -> usize {
        self.entries.iter().filter(|e| e.date.is_none()).count()
    }

    /// Tickets dated on or after `today - days`.
    #[must_use]
    pub fn since(&self, today: NaiveDate, days: i64) -> Self {
        let start = today - Duration::days(days);
        self.filtered(|d| d >= start)
    }

    /// Tickets dated exactly `day`.
    #[must_use]
    pub fn on(&self, day: NaiveDate) -> Self {
        self.filtered(|d| d == day)
    }

    fn filtered(&self, keep: impl Fn(NaiveDate) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.date.is_some_and(&keep))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<Ticket> for TicketSet {
    fn from_iter<I: IntoIterator<Item = Ticket>>(iter: I) -> Self {
        Self::new(iter)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ticket;
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dates_are_parsed_once_and_failures_counted() {
        let set = TicketSet::new([
            ticket(1, "Legal", "pending", "05/03/24", ""),
            ticket(2, "Legal", "pending", "garbage", ""),
            ticket(3, "Legal", "pending", "2024-03-06", ""),
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.unparsed_dates(), 1);
        assert_eq!(set.dated().count(), 2);
    }

    #[test]
    fn since_keeps_window_inclusive() {
        let set = TicketSet::new([
            ticket(1, "A", "pending", "01/03/24", ""),
            ticket(2, "A", "pending", "03/03/24", ""),
            ticket(3, "A", "pending", "10/03/24", ""),
            ticket(4, "A", "pending", "??", ""),
        ]);
        let week = set.since(ymd(2024, 3, 10), 7);
        let ids: Vec<i64> = week.iter().map(|e| e.ticket.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn on_matches_exact_day_across_layouts() {
        let set = TicketSet::new([
            ticket(1, "A", "pending", "05/03/24", ""),
            ticket(2, "A", "pending", "2024-03-05", ""),
            ticket(3, "A", "pending", "06/03/24", ""),
        ]);
        assert_eq!(set.on(ymd(2024, 3, 5)).len(), 2);
    }

    #[test]
    fn empty_set() {
        let set = TicketSet::default();
        assert!(set.is_empty());
        assert_eq!(set.unparsed_dates(), 0);
        assert!(set.since(ymd(2024, 1, 1), 7).is_empty());
    }
}
