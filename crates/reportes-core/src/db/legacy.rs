//! Import from the legacy store layout.
//!
//! Legacy files hold tickets in `datos` with Spanish column names, comments
//! in `comentarios` (body column named `comentario` in newer files and
//! `texto` in older ones) and optionally an `oficinas` directory. Ticket ids
//! are preserved; tickets whose id already exists are skipped together with
//! their comments.

use anyhow::{Context, Result, bail};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, params};
use serde::Serialize;
use std::path::Path;

use super::offices::{OfficeDirectory, OfficeError};
use super::query;
use crate::model::Status;
use crate::model::comment::ANONYMOUS_AUTHOR;

/// Counters reported after an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub tickets_imported: usize,
    pub tickets_skipped: usize,
    pub comments_imported: usize,
    pub comments_skipped: usize,
    pub offices_imported: usize,
}

struct LegacyTicket {
    id: i64,
    floor: i64,
    office: String,
    reporter: String,
    reason: String,
    status: String,
    date: String,
    resolved_by: String,
}

struct LegacyComment {
    ticket_id: i64,
    body: String,
    author: String,
    created_at: String,
}

/// Open a legacy file read-only.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or has no `datos`
/// table.
pub fn open_legacy(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("open legacy store {}", path.display()))?;
    if !query::table_exists(&conn, "datos")? {
        bail!("{} has no legacy 'datos' table", path.display());
    }
    Ok(conn)
}

/// Copy tickets, comments and (when `offices` is given) the office directory
/// from `legacy` into `store` in one transaction.
///
/// # Errors
///
/// Returns an error if reading the legacy file or writing the store fails.
pub fn import_legacy(
    store: &mut Connection,
    legacy: &Connection,
    offices: Option<&OfficeDirectory>,
) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let tickets = read_tickets(legacy)?;
    let comments = read_comments(legacy)?;

    let tx = store.transaction().context("begin import transaction")?;
    let mut imported_ids = std::collections::HashSet::new();

    for ticket in &tickets {
        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO tickets \
                 (id, floor, office, reporter, reason, status, date, resolved_by) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    ticket.id,
                    ticket.floor,
                    ticket.office,
                    ticket.reporter,
                    ticket.reason,
                    ticket.status,
                    ticket.date,
                    ticket.resolved_by,
                ],
            )
            .with_context(|| format!("import ticket #{}", ticket.id))?;

        if inserted > 0 {
            imported_ids.insert(ticket.id);
            stats.tickets_imported += 1;
        } else {
            tracing::debug!(id = ticket.id, "ticket id already present; skipped");
            stats.tickets_skipped += 1;
        }
    }

    for comment in &comments {
        if !imported_ids.contains(&comment.ticket_id) || comment.body.trim().is_empty() {
            stats.comments_skipped += 1;
            continue;
        }
        tx.execute(
            "INSERT INTO comments (ticket_id, body, author, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                comment.ticket_id,
                comment.body.trim(),
                comment.author,
                comment.created_at
            ],
        )
        .with_context(|| format!("import comment on #{}", comment.ticket_id))?;
        stats.comments_imported += 1;
    }

    tx.commit().context("commit import")?;

    if let Some(directory) = offices {
        stats.offices_imported = import_offices(legacy, directory)?;
    }

    tracing::info!(
        tickets = stats.tickets_imported,
        skipped = stats.tickets_skipped,
        comments = stats.comments_imported,
        offices = stats.offices_imported,
        "legacy import finished"
    );
    Ok(stats)
}

fn read_tickets(legacy: &Connection) -> Result<Vec<LegacyTicket>> {
    let mut stmt = legacy
        .prepare(
            "SELECT id, piso, oficina, quien, razon, estado, fecha, resuelto_por \
             FROM datos ORDER BY id",
        )
        .context("prepare legacy ticket query")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Value>(1)?,
            [
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
            ],
        ))
    })?;

    let mut tickets = Vec::new();
    for row in rows {
        let (id, floor, [office, reporter, reason, status, date, resolved_by]) =
            row.context("read legacy ticket")?;
        let Some(floor) = coerce_floor(&floor) else {
            tracing::warn!(id, "legacy ticket has a non-numeric floor; skipped");
            continue;
        };
        let status = status.unwrap_or_default();
        let status = status
            .parse::<Status>()
            .map_or(status, |parsed| parsed.as_str().to_string());

        tickets.push(LegacyTicket {
            id,
            floor,
            office: office.unwrap_or_default(),
            reporter: reporter.unwrap_or_default(),
            reason: reason.unwrap_or_default(),
            status,
            date: date.unwrap_or_default(),
            resolved_by: resolved_by.unwrap_or_default(),
        });
    }
    Ok(tickets)
}

fn read_comments(legacy: &Connection) -> Result<Vec<LegacyComment>> {
    if !query::table_exists(legacy, "comentarios")? {
        return Ok(Vec::new());
    }
    let body_column = if query::table_has_column(legacy, "comentarios", "comentario")? {
        "comentario"
    } else if query::table_has_column(legacy, "comentarios", "texto")? {
        "texto"
    } else {
        tracing::warn!("legacy comments table has no body column; comments not imported");
        return Ok(Vec::new());
    };

    let sql = format!(
        "SELECT reporte_id, {body_column}, autor, fecha FROM comentarios ORDER BY id"
    );
    let mut stmt = legacy
        .prepare(&sql)
        .context("prepare legacy comment query")?;
    let rows = stmt.query_map([], |row| {
        Ok(LegacyComment {
            ticket_id: row.get(0)?,
            body: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            author: row
                .get::<_, Option<String>>(2)?
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            created_at: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        })
    })?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row.context("read legacy comment")?);
    }
    Ok(comments)
}

fn import_offices(legacy: &Connection, directory: &OfficeDirectory) -> Result<usize> {
    if !query::table_exists(legacy, "oficinas")? {
        return Ok(0);
    }
    let mut stmt = legacy
        .prepare("SELECT nombre_oficina, piso FROM oficinas ORDER BY id")
        .context("prepare legacy office query")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Value>(1)?))
    })?;

    let mut imported = 0;
    for row in rows {
        let (name, floor) = row.context("read legacy office")?;
        let (Some(name), Some(floor)) = (name, coerce_floor(&floor)) else {
            continue;
        };
        match directory.add(&name, floor) {
            Ok(_) => imported += 1,
            Err(e) if e.downcast_ref::<OfficeError>().is_some() => {
                tracing::debug!(name, error = %e, "legacy office skipped");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(imported)
}

fn coerce_floor(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Text(text) => text.trim().parse().ok(),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}
