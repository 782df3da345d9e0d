//! Mutations on the ticket store.
//!
//! Callers validate user input first ([`NewTicket::validated`],
//! [`TicketUpdate::validated`]); these functions only enforce what the
//! database must never hold, such as a comment on a missing ticket.

use anyhow::{Context, Result};
use rusqlite::{Connection, params, params_from_iter};

use crate::model::comment::{self, CommentError};
use crate::model::{FieldError, NewTicket, Status, StatusChange};

use super::query;

/// Failures a write can report besides plain SQL errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("ticket #{0} not found")]
    TicketNotFound(i64),
    #[error(transparent)]
    Comment(#[from] CommentError),
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

/// Partial edit of a ticket. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    pub floor: Option<i64>,
    pub office: Option<String>,
    pub reporter: Option<String>,
    pub reason: Option<String>,
    /// New status; also rewrites `resolved_by`.
    pub change: Option<StatusChange>,
    /// Replaces the ticket date, typically the resolution date.
    pub date: Option<String>,
}

impl TicketUpdate {
    /// Trim provided text fields and reject blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] naming the first blank field.
    pub fn validated(mut self) -> Result<Self, FieldError> {
        for (name, value) in [
            ("office", &mut self.office),
            ("reporter", &mut self.reporter),
            ("reason", &mut self.reason),
            ("date", &mut self.date),
        ] {
            if let Some(text) = value {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(FieldError::Blank(name));
                }
                *text = trimmed.to_string();
            }
        }
        Ok(self)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.floor.is_none()
            && self.office.is_none()
            && self.reporter.is_none()
            && self.reason.is_none()
            && self.change.is_none()
            && self.date.is_none()
    }
}

/// Insert a ticket and return its newly assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_ticket(conn: &Connection, ticket: &NewTicket) -> Result<i64> {
    conn.execute(
        "INSERT INTO tickets (floor, office, reporter, reason, status, date, resolved_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            ticket.floor,
            ticket.office,
            ticket.reporter,
            ticket.reason,
            ticket.change.status.as_str(),
            ticket.date,
            ticket.change.resolved_by,
        ],
    )
    .context("insert ticket")?;

    let id = conn.last_insert_rowid();
    tracing::info!(id, floor = ticket.floor, office = %ticket.office, "ticket created");
    Ok(id)
}

/// Apply `update` to ticket `id`.
///
/// Returns `false` when no such ticket exists.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_ticket(conn: &Connection, id: i64, update: &TicketUpdate) -> Result<bool> {
    if update.is_empty() {
        return query::ticket_exists(conn, id);
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    let mut push = |column: &str, value: Box<dyn rusqlite::types::ToSql>| {
        values.push(value);
        sets.push(format!("{column} = ?{}", values.len()));
    };

    if let Some(floor) = update.floor {
        push("floor", Box::new(floor));
    }
    if let Some(ref office) = update.office {
        push("office", Box::new(office.clone()));
    }
    if let Some(ref reporter) = update.reporter {
        push("reporter", Box::new(reporter.clone()));
    }
    if let Some(ref reason) = update.reason {
        push("reason", Box::new(reason.clone()));
    }
    if let Some(ref change) = update.change {
        push("status", Box::new(change.status.as_str()));
        push("resolved_by", Box::new(change.resolved_by.clone()));
    }
    if let Some(ref date) = update.date {
        push("date", Box::new(date.clone()));
    }

    values.push(Box::new(id));
    let sql = format!(
        "UPDATE tickets SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );

    let params_ref: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(AsRef::as_ref).collect();
    let changed = conn
        .execute(&sql, params_from_iter(params_ref))
        .with_context(|| format!("update ticket #{id}"))?;

    if changed > 0 {
        tracing::info!(
            id,
            status = update.change.as_ref().map(|c| c.status.as_str()),
            "ticket updated"
        );
    }
    Ok(changed > 0)
}

/// Mark ticket `id` resolved by `resolved_by`, optionally moving its date to
/// the resolution date.
///
/// # Errors
///
/// Returns an error if the resolver is blank or the update fails.
pub fn resolve_ticket(
    conn: &Connection,
    id: i64,
    resolved_by: &str,
    date: Option<&str>,
) -> Result<bool> {
    let change = StatusChange::new(Status::Resolved, Some(resolved_by))?;
    let update = TicketUpdate {
        change: Some(change),
        date: date.map(str::to_string),
        ..TicketUpdate::default()
    }
    .validated()?;
    update_ticket(conn, id, &update)
}

/// Delete ticket `id` and, by cascade, its comments.
///
/// Returns `false` when no such ticket exists. The id is never reassigned.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_ticket(conn: &Connection, id: i64) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM tickets WHERE id = ?1", params![id])
        .with_context(|| format!("delete ticket #{id}"))?;

    if removed > 0 {
        tracing::info!(id, "ticket deleted");
    }
    Ok(removed > 0)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Append a comment to ticket `ticket_id` and return the comment id.
///
/// A blank or missing author is recorded as
/// [`comment::ANONYMOUS_AUTHOR`]. `created_at` is stored verbatim.
///
/// # Errors
///
/// Returns [`WriteError::Comment`] for an invalid body,
/// [`WriteError::TicketNotFound`] when the ticket is missing, or an SQL
/// error.
pub fn add_comment(
    conn: &Connection,
    ticket_id: i64,
    body: &str,
    author: Option<&str>,
    created_at: &str,
) -> Result<i64> {
    let body = comment::validate_body(body).map_err(WriteError::from)?;
    if !query::ticket_exists(conn, ticket_id)? {
        return Err(WriteError::TicketNotFound(ticket_id).into());
    }
    let author = comment::author_or_anonymous(author);

    conn.execute(
        "INSERT INTO comments (ticket_id, body, author, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![ticket_id, body, author, created_at],
    )
    .with_context(|| format!("insert comment on #{ticket_id}"))?;

    let id = conn.last_insert_rowid();
    tracing::info!(id, ticket_id, author, "comment added");
    Ok(id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
