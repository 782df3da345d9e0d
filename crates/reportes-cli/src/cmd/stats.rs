//! `rp stats` — the full statistics dashboard.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use reportes_stats::RankedBucket;
use reportes_stats::engine::{Summary, SummaryOptions};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

/// Months of winners shown in human output.
const WINNER_MONTHS_SHOWN: usize = 6;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Length of the office/floor/resolver rankings (default: `[stats].top`).
    #[arg(long)]
    pub top: Option<usize>,

    /// Month-label locale: en or es (default: `[stats].locale`).
    #[arg(long)]
    pub locale: Option<String>,
}

/// Round to two decimals for presentation.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn write_ranking<K: Display>(
    w: &mut dyn Write,
    heading: &str,
    ranking: &[RankedBucket<K>],
) -> io::Result<()> {
    writeln!(w)?;
    pretty_section(w, heading)?;
    if ranking.is_empty() {
        writeln!(w, "(none)")?;
    }
    for (i, bucket) in ranking.iter().enumerate() {
        writeln!(w, "{:>2}. {:<28} {}", i + 1, bucket.key.to_string(), bucket.count)?;
    }
    Ok(())
}

fn render_pretty(s: &Summary, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Overview")?;
    pretty_kv(w, "Total", s.total.to_string())?;
    for (status, count) in &s.status_breakdown {
        pretty_kv(w, &cmd::status_label(status), count.to_string())?;
    }
    match s.averages.year {
        Some(year) => {
            pretty_kv(w, "Per month", format!("{:.2} ({year})", s.averages.monthly))?;
            pretty_kv(w, "Per week", format!("{:.2}", s.averages.weekly))?;
        }
        None => pretty_kv(w, "Averages", "n/a")?
    }
    if s.unparsed_dates > 0 {
        pretty_kv(w, "Undated", s.unparsed_dates.to_string())?;
    }

    write_ranking(w, "Top offices", &s.top_offices)?;
    write_ranking(w, "Top floors", &s.top_floors)?;
    write_ranking(w, "Top resolvers", &s.top_resolvers)?;

    writeln!(w)?;
    pretty_section(w, "Recent months")?;
    if s.recent_trend.is_empty() {
        writeln!(w, "(none)")?;
    }
    for m in &s.recent_trend {
        writeln!(
            w,
            "{:<16} total {:>4}  resolved {:>4}  pending {:>4}  in progress {:>4}",
            m.label, m.total, m.resolved, m.pending, m.in_progress
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Employee of the month")?;
    if s.monthly_winners.is_empty() {
        writeln!(w, "(none)")?;
    }
    for m in s.monthly_winners.iter().rev().take(WINNER_MONTHS_SHOWN) {
        let names: Vec<String> = m
            .winners
            .iter()
            .map(|b| format!("{} ({})", b.key, b.count))
            .collect();
        writeln!(w, "{:<16} {}", m.label, names.join(", "))?;
    }

    write_ranking(w, "Most monthly wins", &s.top_winners)
}

fn render_text(s: &Summary, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "total  {}", s.total)?;
    for (status, count) in &s.status_breakdown {
        writeln!(w, "status  {status}  {count}")?;
    }
    writeln!(w, "avg_monthly  {:.2}", s.averages.monthly)?;
    writeln!(w, "avg_weekly  {:.2}", s.averages.weekly)?;
    for b in &s.top_offices {
        writeln!(w, "office  {}  {}", b.key, b.count)?;
    }
    for b in &s.top_floors {
        writeln!(w, "floor  {}  {}", b.key, b.count)?;
    }
    for b in &s.top_resolvers {
        writeln!(w, "resolver  {}  {}", b.key, b.count)?;
    }
    for m in &s.monthly {
        writeln!(w, "month  {}-{:02}  {}", m.year, m.month, m.count)?;
    }
    for d in &s.daily {
        writeln!(w, "day  {}  {}", d.date, d.count)?;
    }
    for m in &s.monthly_winners {
        for b in &m.winners {
            writeln!(w, "winner  {}-{:02}  {}  {}", m.year, m.month, b.key, b.count)?;
        }
    }
    for b in &s.top_winners {
        writeln!(w, "wins  {}  {}", b.key, b.count)?;
    }
    Ok(())
}

pub fn run_stats(args: &StatsArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let options = SummaryOptions {
        top: args.top.unwrap_or(workspace.config.stats.top),
        locale: workspace.locale(args.locale.as_deref()),
    };
    let conn = workspace.open_store(output)?;
    let set = cmd::load_ticket_set(&conn)?;

    let mut summary = set.summary(options);
    summary.averages.monthly = round2(summary.averages.monthly);
    summary.averages.weekly = round2(summary.averages.weekly);
    tracing::debug!(total = summary.total, "summary computed");

    render_mode(output, &summary, render_text, render_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportes_core::model::Ticket;
    use reportes_stats::TicketSet;

    fn ticket(id: i64, office: &str, status: &str, date: &str, by: &str) -> Ticket {
        Ticket {
            id,
            floor: 2,
            office: office.into(),
            reporter: "Ana".into(),
            reason: "Leak".into(),
            status: status.into(),
            date: date.into(),
            resolved_by: by.into(),
        }
    }

    fn sample() -> Summary {
        TicketSet::new([
            ticket(1, "Legal", "resolved", "04/03/24", "Tomas, Chloe"),
            ticket(2, "Legal", "pending", "05/03/24", ""),
            ticket(3, "RRHH", "in_progress", "2024-04-02", ""),
        ])
        .summary(SummaryOptions::default())
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert!((round2(1.234_9) - 1.23).abs() < f64::EPSILON);
        assert!((round2(0.125) - 0.13).abs() < 1e-9);
        assert!(round2(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pretty_lists_sections() {
        let mut buf = Vec::new();
        render_pretty(&sample(), &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("Overview"));
        assert!(s.contains("Top offices"));
        assert!(s.contains(" 1. Legal"));
        assert!(s.contains("March 2024"));
        assert!(s.contains("Employee of the month"));
    }

    #[test]
    fn text_is_line_oriented() {
        let mut buf = Vec::new();
        render_text(&sample(), &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("total  3\n"));
        assert!(s.contains("status  pending  1\n"));
        assert!(s.contains("resolver  Chloe  1\n"));
        assert!(s.contains("month  2024-04  1\n"));
    }

    #[test]
    fn empty_store_renders() {
        let summary = TicketSet::default().summary(SummaryOptions::default());
        let mut buf = Vec::new();
        render_pretty(&summary, &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("Averages:"));
        assert!(s.contains("(none)"));
    }
}
