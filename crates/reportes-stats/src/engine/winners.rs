//! Employee of the month and of the week.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::TicketSet;
use super::counts::tally;
use crate::date;
use crate::locale::MonthLocale;
use crate::names;
use crate::rank::{RankKey, RankedBucket, rank};

/// Number of people kept by [`TicketSet::top_winners`].
pub const TOP_WINNERS: usize = 3;

/// Everyone tied at the highest weekday credit count in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWinners {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Alphabetical; all entries share the same count.
    pub winners: Vec<RankedBucket<String>>,
}

impl TicketSet {
    /// Winner sets keyed by (year, month), oldest first.
    fn winners_by_month(&self) -> BTreeMap<(i32, u32), Vec<RankedBucket<String>>> {
        let mut per_month: BTreeMap<(i32, u32), HashMap<String, u64>> = BTreeMap::new();
        for (ticket, d) in self.dated() {
            if !date::is_weekday(d) {
                continue;
            }
            for name in names::split_names(&ticket.resolved_by) {
                *per_month
                    .entry((d.year(), d.month()))
                    .or_default()
                    .entry(name)
                    .or_insert(0) += 1;
            }
        }

        per_month
            .into_iter()
            .map(|(month, counts)| {
                let best = counts.values().copied().max().unwrap_or(0);
                let mut winners: Vec<RankedBucket<String>> = counts
                    .into_iter()
                    .filter(|(_, count)| *count == best)
                    .map(|(key, count)| RankedBucket { key, count })
                    .collect();
                winners.sort_by(|a, b| a.key.rank_cmp(&b.key));
                (month, winners)
            })
            .collect()
    }

    /// Winners per month, oldest first.
    ///
    /// Only resolutions dated Monday through Friday count. Months where no
    /// name was credited are omitted.
    #[must_use]
    pub fn monthly_winners(&self, locale: MonthLocale) -> Vec<MonthWinners> {
        self.winners_by_month()
            .into_iter()
            .map(|((year, month), winners)| MonthWinners {
                year,
                month,
                label: locale.label(year, month),
                winners,
            })
            .collect()
    }

    /// Number of months each person appears among the winners.
    #[must_use]
    pub fn win_counts(&self) -> HashMap<String, u64> {
        let mut wins = HashMap::new();
        for winner in self.winners_by_month().into_values().flatten() {
            *wins.entry(winner.key).or_insert(0) += 1;
        }
        wins
    }

    /// People with the most monthly wins, at most [`TOP_WINNERS`].
    #[must_use]
    pub fn top_winners(&self) -> Vec<RankedBucket<String>> {
        rank(self.win_counts(), Some(TOP_WINNERS))
    }

    /// Top resolver among resolved tickets of the last seven days.
    #[must_use]
    pub fn employee_of_week(&self, today: NaiveDate) -> Option<RankedBucket<String>> {
        let week = self.since(today, 7);
        let counts = tally(
            week.iter()
                .filter(|e| e.ticket.is_resolved())
                .map(|e| e.ticket.resolved_by.as_str()),
        );
        rank(counts, Some(1)).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ticket;
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(bucket: &[RankedBucket<String>]) -> Vec<&str> {
        bucket.iter().map(|b| b.key.as_str()).collect()
    }

    #[test]
    fn tie_makes_two_winners() {
        // 2024-03-04 and 2024-03-05 are Monday and Tuesday.
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "04/03/24", "Tomas"),
            ticket(2, "L", "resolved", "05/03/24", "Chloe"),
        ]);
        let months = set.monthly_winners(MonthLocale::En);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].label, "March 2024");
        assert_eq!(names(&months[0].winners), ["Chloe", "Tomas"]);

        let wins = set.win_counts();
        assert_eq!(wins.get("Chloe"), Some(&1));
        assert_eq!(wins.get("Tomas"), Some(&1));
    }

    #[test]
    fn weekend_resolutions_do_not_count_for_winners() {
        // 2024-03-09 is a Saturday.
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "04/03/24", "Tomas"),
            ticket(2, "L", "resolved", "09/03/24", "Chloe"),
            ticket(3, "L", "resolved", "09/03/24", "Chloe"),
        ]);
        let months = set.monthly_winners(MonthLocale::En);
        assert_eq!(names(&months[0].winners), ["Tomas"]);
        assert_eq!(set.credit_tally().get("Chloe"), Some(&2));
        assert_eq!(set.total(), 3);
    }

    #[test]
    fn top_winners_ranked_by_months_won() {
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "04/01/24", "Nahuel"),
            ticket(2, "L", "resolved", "05/02/24", "Nahuel"),
            ticket(3, "L", "resolved", "04/03/24", "Adrian"),
            ticket(4, "L", "resolved", "04/04/24", "Marcelo, Chloe"),
        ]);
        let top = set.top_winners();
        assert_eq!(names(&top), ["Nahuel", "Adrian", "Chloe"]);
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn win_counts_agree_with_monthly_winners() {
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "04/01/24", "Nahuel, Tomas"),
            ticket(2, "L", "resolved", "05/02/24", "Nahuel"),
            ticket(3, "L", "resolved", "06/02/24", "Tomas, Nahuel"),
        ]);
        let mut from_months: HashMap<String, u64> = HashMap::new();
        for month in set.monthly_winners(MonthLocale::Es) {
            for winner in month.winners {
                *from_months.entry(winner.key).or_insert(0) += 1;
            }
        }
        assert_eq!(set.win_counts(), from_months);
        assert_eq!(set.win_counts().get("Nahuel"), Some(&2));
        assert_eq!(set.win_counts().get("Tomas"), Some(&1));
    }

    #[test]
    fn months_without_names_are_omitted() {
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "04/03/24", " , "),
            ticket(2, "L", "pending", "04/04/24", ""),
        ]);
        assert!(set.monthly_winners(MonthLocale::En).is_empty());
        assert!(set.top_winners().is_empty());
    }

    #[test]
    fn employee_of_week_only_counts_resolved_in_window() {
        let today = ymd(2024, 3, 15);
        let set = TicketSet::new([
            ticket(1, "L", "resolved", "14/03/24", "Chloe"),
            ticket(2, "L", "resolved", "13/03/24", "Tomas, Chloe"),
            ticket(3, "L", "pending", "13/03/24", "Tomas"),
            ticket(4, "L", "resolved", "01/03/24", "Tomas"),
            ticket(5, "L", "resolved", "01/03/24", "Tomas"),
        ]);
        let best = set.employee_of_week(today).unwrap();
        assert_eq!(best.key, "Chloe");
        assert_eq!(best.count, 2);
    }

    #[test]
    fn no_employee_of_week_when_nothing_resolved() {
        let set = TicketSet::new([ticket(1, "L", "pending", "14/03/24", "")]);
        assert!(set.employee_of_week(ymd(2024, 3, 15)).is_none());
    }
}
