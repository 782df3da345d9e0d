//! `rp trend` — chart-ready monthly trend: labels plus one dataset per series.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, pretty_section, render_mode};
use clap::Args;
use reportes_stats::MonthLocale;
use reportes_stats::engine::MonthTrend;
use reportes_stats::TicketSet;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

const BAR_WIDTH: u64 = 40;

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Month-label locale: en or es (default: `[stats].locale`).
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendChart {
    /// Month labels, oldest first.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl TrendChart {
    #[must_use]
    pub fn from_set(set: &TicketSet, locale: MonthLocale) -> Self {
        let mut months = set.recent_trend(locale);
        months.reverse();

        let series = |label: &'static str, pick: fn(&MonthTrend) -> u64| Dataset {
            label,
            data: months.iter().map(pick).collect(),
        };
        let datasets = vec![
            series("Total", |m| m.total),
            series("Resolved", |m| m.resolved),
            series("Pending", |m| m.pending),
            series("In progress", |m| m.in_progress),
        ];
        Self {
            labels: months.iter().map(|m| m.label.clone()).collect(),
            datasets,
        }
    }

    fn series(&self, label: &str) -> &[u64] {
        self.datasets
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.data.as_slice())
            .unwrap_or_default()
    }
}

fn render_text(chart: &TrendChart, w: &mut dyn Write) -> io::Result<()> {
    let headers: Vec<&str> = chart.datasets.iter().map(|d| d.label).collect();
    writeln!(w, "MONTH  {}", headers.join("  "))?;
    for (i, label) in chart.labels.iter().enumerate() {
        let values: Vec<String> = chart
            .datasets
            .iter()
            .map(|d| d.data.get(i).copied().unwrap_or_default().to_string())
            .collect();
        writeln!(w, "{label}  {}", values.join("  "))?;
    }
    Ok(())
}

fn render_pretty(chart: &TrendChart, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Tickets per month")?;
    if chart.labels.is_empty() {
        return writeln!(w, "(no dated tickets)");
    }

    let totals = chart.series("Total");
    let resolved = chart.series("Resolved");
    let peak = totals.iter().copied().max().unwrap_or_default().max(1);
    for (i, label) in chart.labels.iter().enumerate() {
        let total = totals.get(i).copied().unwrap_or_default();
        let done = resolved.get(i).copied().unwrap_or_default();
        let width = usize::try_from(total * BAR_WIDTH / peak).unwrap_or_default();
        writeln!(w, "{label:<16} {:<40} {total:>4} ({done} resolved)", "█".repeat(width))?;
    }
    Ok(())
}

pub fn run_trend(args: &TrendArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let locale = workspace.locale(args.locale.as_deref());
    let conn = workspace.open_store(output)?;
    let set = cmd::load_ticket_set(&conn)?;

    render_mode(
        output,
        &TrendChart::from_set(&set, locale),
        render_text,
        render_pretty,
    )
}
