//! `rp list` — list tickets with filtering, newest first.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, Renderable, render_list};
use clap::Args;
use reportes_core::db::query::{self, ListedTicket, TicketFilter};
use std::io::{self, Write};
use std::path::Path;

const REASON_PREVIEW_CHARS: usize = 40;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: pending, in_progress, resolved.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by floor.
    #[arg(short, long, allow_negative_numbers = true)]
    pub floor: Option<i64>,

    /// Substring match on office, reporter or reason.
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Maximum tickets to show (0 = all).
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: u32,

    /// Page number, starting at 1.
    #[arg(short, long, default_value = "1")]
    pub page: u32,
}

impl ListArgs {
    fn filter(&self, status: Option<String>) -> TicketFilter {
        let limit = (self.limit > 0).then_some(self.limit);
        let offset = limit
            .map(|limit| self.page.saturating_sub(1).saturating_mul(limit))
            .filter(|offset| *offset > 0);
        TicketFilter {
            status,
            floor: self.floor,
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            limit,
            offset,
        }
    }
}

fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

impl Renderable for ListedTicket {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let t = &self.ticket;
        writeln!(
            w,
            "#{:<5} {:<12} {}  floor {}  {}",
            t.id,
            cmd::status_label(&t.status),
            t.date,
            t.floor,
            t.office
        )?;
        write!(w, "       {}  ({})", preview(&t.reason, REASON_PREVIEW_CHARS), t.reporter)?;
        if !t.resolved_by.is_empty() {
            write!(w, "  by {}", t.resolved_by)?;
        }
        if self.comment_count > 0 {
            write!(w, "  [{} comments]", self.comment_count)?;
        }
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let t = &self.ticket;
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}  {}",
            t.id,
            t.status,
            t.date,
            t.floor,
            t.office,
            preview(&t.reason, REASON_PREVIEW_CHARS),
            self.comment_count
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "STATUS", "DATE", "FLOOR", "OFFICE", "REASON", "COMMENTS"]
    }
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let status = match args.status.as_deref() {
        Some(raw) => Some(cmd::parse_status(output, raw)?.as_str().to_string()),
        None => None,
    };
    let conn = workspace.open_store(output)?;

    let filter = args.filter(status);
    let tickets = query::list_tickets(&conn, &filter)?;
    tracing::debug!(count = tickets.len(), "tickets listed");

    if tickets.is_empty() && !output.is_json() {
        println!("No tickets found.");
        return Ok(());
    }
    render_list(&tickets, output)?;

    if output == OutputMode::Pretty {
        let total = query::count_tickets(&conn, &filter)?;
        println!("\n{}", page_footer(tickets.len(), total, args.page));
    }
    Ok(())
}

fn page_footer(shown: usize, total: u64, page: u32) -> String {
    format!("{shown} of {total} tickets (page {page})")
}
