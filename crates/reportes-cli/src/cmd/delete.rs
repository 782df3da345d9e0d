//! `rp delete` — remove a ticket and, by cascade, its comments.
//!
//! Ids are never handed out again after a delete.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, render_mode};
use clap::Args;
use reportes_core::db::write;
use reportes_core::error::ErrorCode;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket id to delete.
    pub id: i64,

    /// Skip interactive confirmation prompt.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
}

fn confirm_delete(id: i64, office: &str) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Ok(true);
    }

    eprint!("Delete ticket #{id} ({office}) and its comments? [y/N] ");
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let conn = workspace.open_store(output)?;
    let ticket = cmd::require_ticket(output, &conn, args.id)?;

    if !args.force && !confirm_delete(ticket.id, &ticket.office)? {
        anyhow::bail!("deletion of ticket #{} cancelled", ticket.id);
    }

    if !write::delete_ticket(&conn, args.id)? {
        return cmd::fail(
            output,
            ErrorCode::TicketNotFound,
            format!("ticket #{} not found", args.id),
        );
    }

    render_mode(
        output,
        &DeleteOutput {
            id: args.id,
            deleted: true,
        },
        |r, w| writeln!(w, "{}", r.id),
        |r, w| writeln!(w, "✓ Deleted ticket #{}", r.id),
    )
}
