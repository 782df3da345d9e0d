//! `rp info` — where the stores live and what they hold.

use crate::cmd::Workspace;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use chrono::{DateTime, Utc};
use clap::Args;
use reportes_core::db::query;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

#[derive(Debug, Serialize)]
struct InfoOutput {
    tickets_db: String,
    offices_db: String,
    schema_version: i64,
    created_at: String,
    tickets: u64,
    last_id: i64,
    last_date: String,
    /// `None` when the office directory is missing or unreadable.
    offices: Option<u64>,
}

fn micros_to_rfc3339(us: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(us).map_or_else(|| us.to_string(), |ts| ts.to_rfc3339())
}

fn render_text(info: &InfoOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "tickets_db  {}", info.tickets_db)?;
    writeln!(w, "offices_db  {}", info.offices_db)?;
    writeln!(w, "schema_version  {}", info.schema_version)?;
    writeln!(w, "tickets  {}", info.tickets)?;
    writeln!(w, "last_id  {}", info.last_id)?;
    writeln!(w, "last_date  {}", info.last_date)?;
    match info.offices {
        Some(count) => writeln!(w, "offices  {count}"),
        None => writeln!(w, "offices  -"),
    }
}

fn render_pretty(info: &InfoOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Store")?;
    pretty_kv(w, "Tickets DB", &info.tickets_db)?;
    pretty_kv(w, "Offices DB", &info.offices_db)?;
    pretty_kv(w, "Schema", format!("v{}", info.schema_version))?;
    pretty_kv(w, "Created", &info.created_at)?;
    writeln!(w)?;
    pretty_section(w, "Contents")?;
    pretty_kv(w, "Tickets", info.tickets.to_string())?;
    if info.last_id > 0 {
        pretty_kv(w, "Newest", format!("#{} ({})", info.last_id, info.last_date))?;
    }
    pretty_kv(
        w,
        "Offices",
        info.offices
            .map_or_else(|| "unavailable".to_string(), |count| count.to_string()),
    )
}

pub fn run_info(_args: &InfoArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let conn = workspace.open_store(output)?;
    let meta = query::store_meta(&conn)?;
    let latest = query::latest_activity(&conn)?;

    let offices = workspace.office_directory().and_then(|d| match d.count() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "could not count offices");
            None
        }
    });

    let info = InfoOutput {
        tickets_db: workspace.paths.tickets.display().to_string(),
        offices_db: workspace.paths.offices.display().to_string(),
        schema_version: meta.schema_version,
        created_at: micros_to_rfc3339(meta.created_at_us),
        tickets: latest.total,
        last_id: latest.last_id,
        last_date: latest.last_date,
        offices,
    };
    render_mode(output, &info, render_text, render_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_render_as_rfc3339() {
        assert_eq!(micros_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn text_marks_missing_directory() {
        let info = InfoOutput {
            tickets_db: "/srv/.reportes/tickets.db".into(),
            offices_db: "/srv/.reportes/offices.db".into(),
            schema_version: 2,
            created_at: micros_to_rfc3339(0),
            tickets: 3,
            last_id: 5,
            last_date: "05/03/24".into(),
            offices: None,
        };
        let mut buf = Vec::new();
        render_text(&info, &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("last_id  5\n"));
        assert!(s.ends_with("offices  -\n"));
    }
}
