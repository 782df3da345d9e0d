//! `rp resolve` — quick resolve with one or more technicians.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, render_mode};
use clap::Args;
use reportes_core::db::write;
use reportes_core::error::ErrorCode;
use reportes_core::model::{Status, StatusChange};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Ticket id.
    pub id: i64,

    /// Comma-separated resolvers, e.g. "Tomas, Nahuel".
    #[arg(long)]
    pub by: String,

    /// Resolution date; replaces the ticket date when given.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    id: i64,
    status: &'static str,
    resolved_by: String,
    date: String,
}

pub fn run_resolve(args: &ResolveArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    if let Err(e) = StatusChange::new(Status::Resolved, Some(&args.by)) {
        return cmd::fail(output, ErrorCode::MissingResolver, e.to_string());
    }
    let date = match args.date.as_deref() {
        Some(raw) => Some(cmd::storage_date(output, Some(raw))?),
        None => None,
    };

    let conn = workspace.open_store(output)?;
    if !write::resolve_ticket(&conn, args.id, &args.by, date.as_deref())? {
        return cmd::fail(
            output,
            ErrorCode::TicketNotFound,
            format!("ticket #{} not found", args.id),
        );
    }

    let ticket = cmd::require_ticket(output, &conn, args.id)?;
    let result = ResolveOutput {
        id: ticket.id,
        status: Status::Resolved.as_str(),
        resolved_by: ticket.resolved_by,
        date: ticket.date,
    };
    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "{}  {}  {}", r.id, r.status, r.resolved_by),
        |r, w| writeln!(w, "✓ Resolved ticket #{} by {} ({})", r.id, r.resolved_by, r.date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ResolveArgs,
    }

    #[test]
    fn by_is_required() {
        assert!(Wrapper::try_parse_from(["rp", "3"]).is_err());
        let w = Wrapper::parse_from(["rp", "3", "--by", "Chloe", "--date", "05/03/24"]);
        assert_eq!(w.args.by, "Chloe");
        assert_eq!(w.args.date.as_deref(), Some("05/03/24"));
    }

    #[test]
    fn blank_resolver_fails_before_touching_store() {
        let dir = tempfile::tempdir().unwrap();
        let args = ResolveArgs {
            id: 1,
            by: " ,".into(),
            date: None,
        };
        let err = run_resolve(&args, OutputMode::Json, dir.path()).unwrap_err();
        assert!(err.to_string().contains("resolver"));
    }
}
