//! `rp create` — file a new maintenance ticket.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, pretty_kv, render_mode};
use clap::Args;
use reportes_core::db::{offices::OfficeDirectory, write};
use reportes_core::error::ErrorCode;
use reportes_core::model::{NewTicket, Status, StatusChange};
use reportes_stats::names::split_names;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Floor of the office (basements are negative).
    #[arg(long, allow_negative_numbers = true)]
    pub floor: i64,

    /// Office reporting the problem.
    #[arg(long)]
    pub office: String,

    /// Person who reported the problem.
    #[arg(long)]
    pub reporter: String,

    /// What is wrong.
    #[arg(long)]
    pub reason: String,

    /// Initial status: pending, in_progress or resolved.
    #[arg(long, default_value = "pending")]
    pub status: String,

    /// Comma-separated resolvers; required with `--status resolved`.
    #[arg(long)]
    pub resolved_by: Option<String>,

    /// Ticket date in any accepted layout (default: today).
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    id: i64,
    floor: i64,
    office: String,
    status: &'static str,
    date: String,
    resolved_by: String,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let status = cmd::parse_status(output, &args.status)?;
    let change = match StatusChange::new(status, args.resolved_by.as_deref()) {
        Ok(change) => change,
        Err(e) => return cmd::fail(output, ErrorCode::MissingResolver, e.to_string()),
    };
    let date = cmd::storage_date(output, args.date.as_deref())?;

    let ticket = NewTicket {
        floor: args.floor,
        office: args.office.clone(),
        reporter: args.reporter.clone(),
        reason: args.reason.clone(),
        change,
        date,
    };
    let ticket = match ticket.validated() {
        Ok(ticket) => ticket,
        Err(e) => return cmd::fail(output, ErrorCode::InvalidField, e.to_string()),
    };

    if let Some(directory) = workspace.office_directory() {
        warn_unknown_office(&directory, ticket.floor, &ticket.office);
    }
    if status == Status::Resolved {
        warn_unknown_staff(&workspace.config.staff.employees, &ticket.change.resolved_by);
    }

    let conn = workspace.open_store(output)?;
    let id = write::insert_ticket(&conn, &ticket)?;

    let result = CreateOutput {
        id,
        floor: ticket.floor,
        office: ticket.office,
        status: ticket.change.status.as_str(),
        date: ticket.date,
        resolved_by: ticket.change.resolved_by,
    };
    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "{}", r.id),
        |r, w| {
            writeln!(w, "✓ Created ticket #{}", r.id)?;
            pretty_kv(w, "Office", format!("{} (floor {})", r.office, r.floor))?;
            pretty_kv(w, "Status", r.status)?;
            pretty_kv(w, "Date", &r.date)
        },
    )
}

fn warn_unknown_office(directory: &OfficeDirectory, floor: i64, office: &str) {
    match directory.offices_on_floor(floor) {
        Ok(known) if !known.is_empty() && !known.iter().any(|name| name == office) => {
            tracing::warn!(floor, office, "office not listed on this floor");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "office directory unreadable"),
    }
}

fn warn_unknown_staff(employees: &[String], resolved_by: &str) {
    for name in split_names(resolved_by) {
        if !employees.iter().any(|e| e.eq_ignore_ascii_case(&name)) {
            tracing::warn!(name = %name, "resolver is not in [staff].employees");
        }
    }
}
