//! Bundled results for the dashboard and the fixed text reports.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::trend::{Averages, DayBucket, MonthBucket, MonthTrend};
use super::winners::MonthWinners;
use super::{DEFAULT_TOP, TicketSet};
use crate::locale::MonthLocale;
use crate::rank::RankedBucket;

/// Knobs for [`TicketSet::summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub top: usize,
    pub locale: MonthLocale,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            locale: MonthLocale::default(),
        }
    }
}

/// Every dashboard statistic computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub unparsed_dates: usize,
    pub status_breakdown: BTreeMap<String, u64>,
    pub top_offices: Vec<RankedBucket<String>>,
    pub top_floors: Vec<RankedBucket<i64>>,
    pub top_resolvers: Vec<RankedBucket<String>>,
    pub monthly: Vec<MonthBucket>,
    pub recent_trend: Vec<MonthTrend>,
    pub averages: Averages,
    pub daily: Vec<DayBucket>,
    pub monthly_winners: Vec<MonthWinners>,
    pub top_winners: Vec<RankedBucket<String>>,
}

/// The last seven days at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekReport {
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub total: usize,
    pub status_breakdown: BTreeMap<String, u64>,
    pub employee_of_week: Option<RankedBucket<String>>,
}

impl TicketSet {
    #[must_use]
    pub fn summary(&self, options: SummaryOptions) -> Summary {
        Summary {
            total: self.total(),
            unparsed_dates: self.unparsed_dates(),
            status_breakdown: self.status_breakdown(),
            top_offices: self.top_offices(options.top),
            top_floors: self.top_floors(options.top),
            top_resolvers: self.top_resolvers(options.top),
            monthly: self.monthly_buckets(options.locale),
            recent_trend: self.recent_trend(options.locale),
            averages: self.averages(),
            daily: self.daily_trend(),
            monthly_winners: self.monthly_winners(options.locale),
            top_winners: self.top_winners(),
        }
    }

    #[must_use]
    pub fn week_report(&self, today: NaiveDate) -> WeekReport {
        let week = self.since(today, 7);
        WeekReport {
            since: today - Duration::days(7),
            until: today,
            total: week.total(),
            status_breakdown: week.status_breakdown(),
            employee_of_week: self.employee_of_week(today),
        }
    }
}
