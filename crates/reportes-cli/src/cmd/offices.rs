//! `rp offices` — maintain the floor → offices directory.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, Renderable, render_list, render_mode, render_success};
use clap::{Args, Subcommand};
use reportes_core::db::offices::{self, OfficeDirectory, OfficeError};
use reportes_core::error::ErrorCode;
use reportes_core::model::Office;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct OfficesArgs {
    #[command(subcommand)]
    pub command: OfficesCommand,
}

#[derive(Subcommand, Debug)]
pub enum OfficesCommand {
    #[command(
        about = "List offices, optionally on one floor",
        after_help = "EXAMPLES:\n    # Every office\n    rp offices list\n\n    # Basement offices\n    rp offices list --floor -1"
    )]
    List(OfficesListArgs),

    #[command(
        about = "Register an office on a floor",
        after_help = "EXAMPLES:\n    rp offices add \"Mesa de Entradas\" --floor 1"
    )]
    Add(OfficesAddArgs),

    #[command(about = "Remove an office by name")]
    Remove(OfficesRemoveArgs),

    #[command(about = "Floors offered when filing tickets")]
    Floors,
}

#[derive(Args, Debug)]
pub struct OfficesListArgs {
    /// Only offices on this floor.
    #[arg(long, allow_negative_numbers = true)]
    pub floor: Option<i64>,
}

#[derive(Args, Debug)]
pub struct OfficesAddArgs {
    /// Office name (unique across floors).
    pub name: String,

    /// Floor the office is on.
    #[arg(long, allow_negative_numbers = true)]
    pub floor: i64,
}

#[derive(Args, Debug)]
pub struct OfficesRemoveArgs {
    /// Office name.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct FloorsOutput {
    floors: Vec<i64>,
    fallback: bool,
}

impl Renderable for Office {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "floor {:>3}  {}", self.floor, self.name)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.id, self.floor, self.name)
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "FLOOR", "NAME"]
    }
}

fn require_directory(output: OutputMode, workspace: &Workspace) -> anyhow::Result<OfficeDirectory> {
    match workspace.office_directory() {
        Some(directory) => Ok(directory),
        None => cmd::fail(
            output,
            ErrorCode::OfficeDirectoryUnavailable,
            format!(
                "office directory not found at {}",
                workspace.paths.offices.display()
            ),
        ),
    }
}

pub fn run_offices(args: &OfficesArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    match &args.command {
        OfficesCommand::List(list) => run_list(list, output, &workspace),
        OfficesCommand::Add(add) => run_add(add, output, &workspace),
        OfficesCommand::Remove(remove) => run_remove(remove, output, &workspace),
        OfficesCommand::Floors => run_floors(output, &workspace),
    }
}

fn run_list(args: &OfficesListArgs, output: OutputMode, workspace: &Workspace) -> anyhow::Result<()> {
    let directory = require_directory(output, workspace)?;
    let mut listed = directory.list()?;
    if let Some(floor) = args.floor {
        listed.retain(|office| office.floor == floor);
    }

    if listed.is_empty() && !output.is_json() {
        println!("No offices found.");
        return Ok(());
    }
    render_list(&listed, output)
}

fn run_add(args: &OfficesAddArgs, output: OutputMode, workspace: &Workspace) -> anyhow::Result<()> {
    let directory = OfficeDirectory::open(&workspace.paths.offices)?;
    match directory.add(&args.name, args.floor) {
        Ok(id) => {
            tracing::debug!(id, "office registered");
            render_success(
                output,
                &format!("Added office '{}' on floor {}", args.name.trim(), args.floor),
            )
        }
        Err(e) => match e.downcast_ref::<OfficeError>() {
            Some(OfficeError::Duplicate(_)) => {
                cmd::fail(output, ErrorCode::DuplicateOffice, e.to_string())
            }
            Some(OfficeError::BlankName) => cmd::fail(output, ErrorCode::InvalidField, e.to_string()),
            None => Err(e),
        },
    }
}

fn run_remove(args: &OfficesRemoveArgs, output: OutputMode, workspace: &Workspace) -> anyhow::Result<()> {
    let directory = require_directory(output, workspace)?;
    if !directory.remove(&args.name)? {
        return cmd::fail(
            output,
            ErrorCode::InvalidField,
            format!("office '{}' is not listed", args.name.trim()),
        );
    }
    render_success(output, &format!("Removed office '{}'", args.name.trim()))
}

fn run_floors(output: OutputMode, workspace: &Workspace) -> anyhow::Result<()> {
    let directory = workspace.office_directory();
    let listed = directory.as_ref().and_then(|d| d.floors().ok());
    let result = match listed {
        Some(floors) => FloorsOutput {
            floors,
            fallback: false,
        },
        None => FloorsOutput {
            floors: offices::floors_or_fallback(directory.as_ref()),
            fallback: true,
        },
    };

    render_mode(
        output,
        &result,
        |r, w| {
            for floor in &r.floors {
                writeln!(w, "{floor}")?;
            }
            Ok(())
        },
        |r, w| {
            let floors: Vec<String> = r.floors.iter().map(ToString::to_string).collect();
            write!(w, "Floors: {}", floors.join(", "))?;
            if r.fallback {
                write!(w, " (default; office directory unavailable)")?;
            }
            writeln!(w)
        },
    )
}
