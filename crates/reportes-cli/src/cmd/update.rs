//! `rp update` — edit ticket fields and/or move it to another status.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, render_mode};
use clap::Args;
use reportes_core::db::write::{self, TicketUpdate};
use reportes_core::error::ErrorCode;
use reportes_core::model::StatusChange;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Ticket id.
    pub id: i64,

    /// New floor.
    #[arg(long, allow_negative_numbers = true)]
    pub floor: Option<i64>,

    /// New office.
    #[arg(long)]
    pub office: Option<String>,

    /// New reporter.
    #[arg(long)]
    pub reporter: Option<String>,

    /// New reason.
    #[arg(long)]
    pub reason: Option<String>,

    /// New status: pending, in_progress or resolved.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Comma-separated resolvers; required when moving to resolved.
    #[arg(long, requires = "status")]
    pub by: Option<String>,

    /// Replacement date, typically the resolution date.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateOutput {
    id: i64,
    status: String,
    resolved_by: String,
    date: String,
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;

    let change = match args.status.as_deref() {
        Some(raw) => {
            let status = cmd::parse_status(output, raw)?;
            match StatusChange::new(status, args.by.as_deref()) {
                Ok(change) => Some(change),
                Err(e) => return cmd::fail(output, ErrorCode::MissingResolver, e.to_string()),
            }
        }
        None => None,
    };
    let date = match args.date.as_deref() {
        Some(raw) => Some(cmd::storage_date(output, Some(raw))?),
        None => None,
    };

    let update = TicketUpdate {
        floor: args.floor,
        office: args.office.clone(),
        reporter: args.reporter.clone(),
        reason: args.reason.clone(),
        change,
        date,
    };
    let update = match update.validated() {
        Ok(update) => update,
        Err(e) => return cmd::fail(output, ErrorCode::InvalidField, e.to_string()),
    };

    let conn = workspace.open_store(output)?;
    if !write::update_ticket(&conn, args.id, &update)? {
        return cmd::fail(
            output,
            ErrorCode::TicketNotFound,
            format!("ticket #{} not found", args.id),
        );
    }

    let ticket = cmd::require_ticket(output, &conn, args.id)?;
    let result = UpdateOutput {
        id: ticket.id,
        status: ticket.status,
        resolved_by: ticket.resolved_by,
        date: ticket.date,
    };
    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "{}  {}", r.id, r.status),
        |r, w| {
            write!(w, "✓ Updated ticket #{} ({}", r.id, cmd::status_label(&r.status))?;
            if !r.resolved_by.is_empty() {
                write!(w, " by {}", r.resolved_by)?;
            }
            writeln!(w, ", {})", r.date)
        },
    )
}
