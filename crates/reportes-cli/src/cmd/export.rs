use crate::cmd::Workspace;
use crate::output::OutputMode;
use anyhow::{Context as _, Result};
use clap::Args;
use reportes_core::db::query;
use reportes_core::model::{Comment, Ticket};
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output JSONL path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Leave comment logs out of the export.
    #[arg(long)]
    pub no_comments: bool,
}

#[derive(Debug, Serialize)]
struct JsonlExportRecord {
    #[serde(flatten)]
    ticket: Ticket,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<Comment>>,
}

pub fn run_export(args: &ExportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let conn = workspace.open_store(output)?;

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let written = write_jsonl(&conn, &mut out, !args.no_comments)?;
    out.flush().context("failed to flush export")?;
    tracing::info!(tickets = written, "export complete");
    Ok(())
}

/// Write every ticket, newest first, one JSON object per line.
fn write_jsonl(conn: &Connection, out: &mut dyn Write, with_comments: bool) -> Result<usize> {
    let tickets = query::all_tickets(conn)?;
    let count = tickets.len();
    for ticket in tickets {
        let comments = if with_comments {
            Some(query::get_comments(conn, ticket.id)?)
        } else {
            None
        };
        let row = JsonlExportRecord { ticket, comments };
        writeln!(out, "{}", serde_json::to_string(&row)?)?;
    }
    Ok(count)
}
