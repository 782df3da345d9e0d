//! `rp report` — fixed plain-text reports for sharing in chat or email.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, render};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use reportes_core::model::{Status, Ticket};
use reportes_stats::engine::WeekReport;
use reportes_stats::{RankedBucket, TicketSet, date};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

/// Newest pending tickets listed by the pending report.
const PENDING_SHOWN: usize = 10;
const PENDING_REASON_CHARS: usize = 50;
const TODAY_REASON_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Totals, status counts and busiest floors.
    General,
    /// The newest pending tickets.
    Pending,
    /// Tickets filed today.
    Today,
    /// The last seven days and the employee of the week.
    Week,
    /// Historical totals with office and employee rankings.
    Stats,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Which report to produce.
    #[arg(value_enum, default_value = "general")]
    pub kind: ReportKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

impl StatusCounts {
    fn from_breakdown(breakdown: &BTreeMap<String, u64>) -> Self {
        let mut counts = Self::default();
        for (raw, count) in breakdown {
            match raw.parse::<Status>() {
                Ok(Status::Pending) => counts.pending += count,
                Ok(Status::InProgress) => counts.in_progress += count,
                Ok(Status::Resolved) => counts.resolved += count,
                Err(_) => {}
            }
        }
        counts
    }

    fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Pending:      {}", self.pending)?;
        writeln!(w, "In progress:  {}", self.in_progress)?;
        writeln!(w, "Resolved:     {}", self.resolved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    General {
        total: usize,
        statuses: StatusCounts,
        top_floors: Vec<RankedBucket<i64>>,
    },
    Pending {
        tickets: Vec<Ticket>,
    },
    Today {
        date: NaiveDate,
        tickets: Vec<Ticket>,
    },
    Week {
        week: WeekReport,
        total_all_time: usize,
        statuses: StatusCounts,
    },
    Stats {
        total: usize,
        monthly_average: f64,
        statuses: StatusCounts,
        top_offices: Vec<RankedBucket<String>>,
        top_employees: Vec<RankedBucket<String>>,
    },
}

fn newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| b.id.cmp(&a.id));
    tickets
}

/// Build `kind` from `set` as of `today`, ranking `top` entries.
#[must_use]
pub fn build_report(kind: ReportKind, set: &TicketSet, today: NaiveDate, top: usize) -> Report {
    match kind {
        ReportKind::General => Report::General {
            total: set.total(),
            statuses: StatusCounts::from_breakdown(&set.status_breakdown()),
            top_floors: set.top_floors(top),
        },
        ReportKind::Pending => {
            let pending = set
                .iter()
                .filter(|e| e.ticket.parsed_status() == Some(Status::Pending))
                .map(|e| e.ticket.clone())
                .collect();
            let mut tickets = newest_first(pending);
            tickets.truncate(PENDING_SHOWN);
            Report::Pending { tickets }
        }
        ReportKind::Today => Report::Today {
            date: today,
            tickets: newest_first(set.on(today).iter().map(|e| e.ticket.clone()).collect()),
        },
        ReportKind::Week => {
            let week = set.week_report(today);
            let statuses = StatusCounts::from_breakdown(&week.status_breakdown);
            Report::Week {
                week,
                total_all_time: set.total(),
                statuses,
            }
        }
        ReportKind::Stats => {
            // Undated tickets sit outside every month bucket.
            let months = set.monthly_buckets(reportes_stats::MonthLocale::default());
            let dated: u64 = months.iter().map(|m| m.count).sum();
            #[allow(clippy::cast_precision_loss)]
            let monthly_average = dated as f64 / months.len().max(1) as f64;
            Report::Stats {
                total: set.total(),
                monthly_average: super::stats::round2(monthly_average),
                statuses: StatusCounts::from_breakdown(&set.status_breakdown()),
                top_offices: set.top_offices(top),
                top_employees: set.top_resolvers(top),
            }
        }
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

fn write_ranking<K: std::fmt::Display>(
    w: &mut dyn Write,
    ranking: &[RankedBucket<K>],
    unit: &str,
) -> io::Result<()> {
    for (i, b) in ranking.iter().enumerate() {
        writeln!(w, "{}. {}: {} {unit}", i + 1, b.key, b.count)?;
    }
    Ok(())
}

fn write_report(report: &Report, w: &mut dyn Write) -> io::Result<()> {
    match report {
        Report::General {
            total,
            statuses,
            top_floors,
        } => {
            writeln!(w, "GENERAL TICKET REPORT")?;
            writeln!(w)?;
            writeln!(w, "Total tickets: {total}")?;
            writeln!(w)?;
            statuses.write(w)?;
            if !top_floors.is_empty() {
                writeln!(w)?;
                writeln!(w, "Top {} floors:", top_floors.len())?;
                for b in top_floors {
                    writeln!(w, "  - Floor {}: {} tickets", b.key, b.count)?;
                }
            }
        }
        Report::Pending { tickets } => {
            writeln!(w, "PENDING TICKETS ({})", tickets.len())?;
            writeln!(w)?;
            if tickets.is_empty() {
                writeln!(w, "No pending tickets!")?;
            }
            for t in tickets {
                writeln!(w, "Ticket #{}", t.id)?;
                writeln!(w, "  Floor {} - {}", t.floor, t.office)?;
                writeln!(w, "  Reporter: {}", t.reporter)?;
                writeln!(w, "  {}", truncated(&t.reason, PENDING_REASON_CHARS))?;
                writeln!(w, "  Date: {}", t.date)?;
                writeln!(w, "{:─<30}", "")?;
            }
        }
        Report::Today { date: day, tickets } => {
            writeln!(w, "TODAY'S TICKETS ({})", date::format_short(*day))?;
            writeln!(w)?;
            writeln!(w, "Total: {}", tickets.len())?;
            writeln!(w)?;
            if tickets.is_empty() {
                writeln!(w, "No tickets filed today.")?;
            }
            for t in tickets {
                writeln!(
                    w,
                    "[{}] #{} - Floor {}",
                    cmd::status_label(&t.status),
                    t.id,
                    t.floor
                )?;
                writeln!(w, "  {} | {}", t.office, t.reporter)?;
                writeln!(w, "  {}", truncated(&t.reason, TODAY_REASON_CHARS))?;
                if t.is_resolved() && !t.resolved_by.is_empty() {
                    writeln!(w, "  Resolved by: {}", t.resolved_by)?;
                }
                writeln!(w)?;
            }
        }
        Report::Week {
            week,
            total_all_time,
            statuses,
        } => {
            writeln!(w, "WEEKLY REPORT")?;
            writeln!(
                w,
                "({} to {})",
                date::format_short(week.since),
                date::format_short(week.until)
            )?;
            writeln!(w)?;
            writeln!(w, "Total this week: {}", week.total)?;
            writeln!(w, "Total all time:  {total_all_time}")?;
            writeln!(w)?;
            statuses.write(w)?;
            if let Some(ref best) = week.employee_of_week {
                writeln!(w)?;
                writeln!(w, "EMPLOYEE OF THE WEEK")?;
                writeln!(w, "  {}", best.key)?;
                writeln!(w, "  {} jobs", best.count)?;
            }
        }
        Report::Stats {
            total,
            monthly_average,
            statuses,
            top_offices,
            top_employees,
        } => {
            writeln!(w, "FULL STATISTICS")?;
            writeln!(w)?;
            writeln!(w, "Total all time:   {total}")?;
            writeln!(w, "Monthly average:  {monthly_average:.1}")?;
            writeln!(w)?;
            writeln!(w, "Current status:")?;
            statuses.write(w)?;
            if !top_offices.is_empty() {
                writeln!(w)?;
                writeln!(w, "Top offices:")?;
                write_ranking(w, top_offices, "tickets")?;
            }
            if !top_employees.is_empty() {
                writeln!(w)?;
                writeln!(w, "Top employees:")?;
                write_ranking(w, top_employees, "jobs")?;
            }
        }
    }
    Ok(())
}

pub fn run_report(args: &ReportArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let conn = workspace.open_store(output)?;
    let set = cmd::load_ticket_set(&conn)?;

    let report = build_report(args.kind, &set, cmd::today(), workspace.config.stats.top);
    render(output, &report, write_report)
}
