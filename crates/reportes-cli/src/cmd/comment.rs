//! `rp comment` — append a note to a ticket.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, render_mode};
use clap::Args;
use reportes_core::db::write;
use reportes_core::error::ErrorCode;
use reportes_core::model::comment;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Ticket id to comment on.
    pub id: i64,

    /// Comment body.
    pub body: String,

    /// Author name (default: Anonymous).
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentOutput {
    id: i64,
    ticket_id: i64,
    author: String,
    created_at: String,
}

pub fn run_comment(args: &CommentArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    if let Err(e) = comment::validate_body(&args.body) {
        return cmd::fail(output, ErrorCode::EmptyComment, e.to_string());
    }

    let conn = workspace.open_store(output)?;
    cmd::require_ticket(output, &conn, args.id)?;

    let created_at = cmd::comment_timestamp();
    let id = write::add_comment(
        &conn,
        args.id,
        &args.body,
        args.author.as_deref(),
        &created_at,
    )?;

    let result = CommentOutput {
        id,
        ticket_id: args.id,
        author: comment::author_or_anonymous(args.author.as_deref()).to_string(),
        created_at,
    };
    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "{}  {}", r.ticket_id, r.id),
        |r, w| writeln!(w, "✓ Comment added to ticket #{} by {}", r.ticket_id, r.author),
    )
}
