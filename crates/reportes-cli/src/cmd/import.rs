//! `rp import` — copy a legacy store into the current one.

use crate::cmd::Workspace;
use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::Result;
use clap::Args;
use reportes_core::db::legacy::{self, ImportStats};
use reportes_core::db::offices::OfficeDirectory;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Legacy database with a `datos` table.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Do not copy the legacy `oficinas` directory.
    #[arg(long)]
    pub no_offices: bool,
}

pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let mut store = workspace.open_store(output)?;
    let source = legacy::open_legacy(&args.path)?;

    let directory = if args.no_offices {
        None
    } else {
        Some(OfficeDirectory::open(&workspace.paths.offices)?)
    };

    let stats = legacy::import_legacy(&mut store, &source, directory.as_ref())?;
    tracing::info!(
        imported = stats.tickets_imported,
        skipped = stats.tickets_skipped,
        "legacy import complete"
    );

    render_mode(
        output,
        &stats,
        |s: &ImportStats, w| {
            writeln!(
                w,
                "{}  {}  {}  {}  {}",
                s.tickets_imported,
                s.tickets_skipped,
                s.comments_imported,
                s.comments_skipped,
                s.offices_imported
            )
        },
        |s, w| {
            writeln!(w, "✓ Imported {}", args.path.display())?;
            pretty_kv(w, "Tickets", s.tickets_imported.to_string())?;
            pretty_kv(w, "Skipped", s.tickets_skipped.to_string())?;
            pretty_kv(w, "Comments", s.comments_imported.to_string())?;
            pretty_kv(w, "Offices", s.offices_imported.to_string())
        },
    )
}
