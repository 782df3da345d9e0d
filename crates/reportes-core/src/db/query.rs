//! `SQLite` read helpers for the ticket store.
//!
//! All functions take a shared `&Connection` and return typed structs
//! (never raw rows) wrapped in `anyhow::Result`.

use anyhow::{Context, Result};
use rusqlite::{Connection, params, params_from_iter};
use serde::Serialize;

use crate::model::{Comment, Ticket};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A ticket row with the size of its comment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub comment_count: usize,
}

/// Contents of the single `store_meta` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreMeta {
    pub schema_version: i64,
    pub created_at_us: i64,
}

/// Newest-ticket summary used to detect changes cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestActivity {
    /// Highest assigned id (0 when the store is empty).
    pub last_id: i64,
    pub total: u64,
    /// Date of the highest-id ticket (empty when the store is empty).
    pub last_date: String,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Filter criteria for ticket listings.
///
/// All fields are optional. When multiple fields are set they are combined
/// with AND semantics. Results are always newest (highest id) first.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Exact match on the stored status literal.
    pub status: Option<String>,
    /// Exact match on floor.
    pub floor: Option<i64>,
    /// Substring match on office, reporter or reason.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

impl TicketFilter {
    fn where_clause(&self) -> (String, Vec<Box<dyn rusqlite::types::ToSql>>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref status) = self.status {
            param_values.push(Box::new(status.clone()));
            conditions.push(format!("t.status = ?{}", param_values.len()));
        }

        if let Some(floor) = self.floor {
            param_values.push(Box::new(floor));
            conditions.push(format!("t.floor = ?{}", param_values.len()));
        }

        if let Some(ref search) = self.search {
            param_values.push(Box::new(format!("%{search}%")));
            let n = param_values.len();
            conditions.push(format!(
                "(t.office LIKE ?{n} OR t.reporter LIKE ?{n} OR t.reason LIKE ?{n})"
            ));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        (clause, param_values)
    }
}

fn limit_clause(limit: Option<u32>, offset: Option<u32>) -> String {
    match (limit, offset) {
        (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
        (Some(limit), None) => format!(" LIMIT {limit}"),
        (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
        (None, None) => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Core query functions
// ---------------------------------------------------------------------------

const TICKET_COLUMNS: &str =
    "t.id, t.floor, t.office, t.reporter, t.reason, t.status, t.date, t.resolved_by";

/// Fetch a single ticket by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_ticket(conn: &Connection, id: i64) -> Result<Option<Ticket>> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.id = ?1");
    let mut stmt = conn.prepare(&sql).context("prepare get_ticket query")?;

    match stmt.query_row(params![id], row_to_ticket) {
        Ok(ticket) => Ok(Some(ticket)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context(format!("get_ticket for #{id}")),
    }
}

/// Check whether a ticket id exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ticket_exists(conn: &Connection, id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tickets WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
    .context("check ticket_exists")
}

/// Every ticket in the store, newest first. This is the engine's input.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn all_tickets(conn: &Connection) -> Result<Vec<Ticket>> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets t ORDER BY t.id DESC");
    let mut stmt = conn.prepare(&sql).context("prepare all_tickets query")?;
    let rows = stmt
        .query_map([], row_to_ticket)
        .context("execute all_tickets query")?;

    let mut tickets = Vec::new();
    for row in rows {
        tickets.push(row.context("read ticket row")?);
    }
    Ok(tickets)
}

/// List tickets matching `filter`, newest first, with comment counts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets(conn: &Connection, filter: &TicketFilter) -> Result<Vec<ListedTicket>> {
    let (where_clause, param_values) = filter.where_clause();
    let limit = limit_clause(filter.limit, filter.offset);

    let sql = format!(
        "SELECT {TICKET_COLUMNS}, \
         (SELECT COUNT(*) FROM comments c WHERE c.ticket_id = t.id) AS comment_count \
         FROM tickets t{where_clause} ORDER BY t.id DESC{limit}"
    );

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("prepare list_tickets query: {sql}"))?;

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(AsRef::as_ref).collect();

    let rows = stmt
        .query_map(params_from_iter(params_ref), |row| {
            let count: i64 = row.get(8)?;
            Ok(ListedTicket {
                ticket: row_to_ticket(row)?,
                comment_count: usize::try_from(count).unwrap_or(0),
            })
        })
        .context("execute list_tickets query")?;

    let mut tickets = Vec::new();
    for row in rows {
        tickets.push(row.context("read list_tickets row")?);
    }
    Ok(tickets)
}

/// Count tickets matching `filter` (ignores limit/offset).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_tickets(conn: &Connection, filter: &TicketFilter) -> Result<u64> {
    let (where_clause, param_values) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM tickets t{where_clause}");

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(AsRef::as_ref).collect();

    let count: i64 = conn
        .query_row(&sql, params_from_iter(params_ref), |row| row.get(0))
        .with_context(|| format!("execute count_tickets: {sql}"))?;

    Ok(u64::try_from(count).unwrap_or(0))
}

/// Comments for a ticket, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_comments(conn: &Connection, ticket_id: i64) -> Result<Vec<Comment>> {
    let sql = "SELECT id, ticket_id, body, author, created_at \
               FROM comments WHERE ticket_id = ?1 \
               ORDER BY id DESC";

    let mut stmt = conn.prepare(sql).context("prepare get_comments")?;
    let rows = stmt
        .query_map(params![ticket_id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                ticket_id: row.get(1)?,
                body: row.get(2)?,
                author: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .context("execute get_comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row.context("read comment row")?);
    }
    Ok(comments)
}

/// Read the `store_meta` row.
///
/// # Errors
///
/// Returns an error if the row is missing or unreadable.
pub fn store_meta(conn: &Connection) -> Result<StoreMeta> {
    conn.query_row(
        "SELECT schema_version, created_at_us FROM store_meta WHERE id = 1",
        [],
        |row| {
            Ok(StoreMeta {
                schema_version: row.get(0)?,
                created_at_us: row.get(1)?,
            })
        },
    )
    .context("read store metadata")
}

/// Highest id, total count and the date of the newest ticket.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn latest_activity(conn: &Connection) -> Result<LatestActivity> {
    let (last_id, total): (Option<i64>, i64) = conn
        .query_row("SELECT MAX(id), COUNT(*) FROM tickets", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .context("read latest activity")?;

    let last_date = match last_id {
        Some(id) => conn
            .query_row("SELECT date FROM tickets WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .context("read latest ticket date")?,
        None => String::new(),
    };

    Ok(LatestActivity {
        last_id: last_id.unwrap_or(0),
        total: u64::try_from(total).unwrap_or(0),
        last_date,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )
        .context("check table exists")?;
    Ok(exists)
}

pub(crate) fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .context("prepare table_info pragma")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for row in rows {
        let name = row.context("read table_info column")?;
        if name == column {
            return Ok(true);
        }
    }

    Ok(false)
}

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        floor: row.get(1)?,
        office: row.get(2)?,
        reporter: row.get(3)?,
        reason: row.get(4)?,
        status: row.get(5)?,
        date: row.get(6)?,
        resolved_by: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_db() -> Connection {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        conn.pragma_update(None, "foreign_keys", "ON")
            .expect("enable fk");
        migrations::migrate(&mut conn).expect("migrate");
        conn
    }

    fn insert_ticket(conn: &Connection, floor: i64, office: &str, status: &str, date: &str) -> i64 {
        conn.execute(
            "INSERT INTO tickets (floor, office, reporter, reason, status, date, resolved_by) \
             VALUES (?1, ?2, 'Ana', 'Broken chair', ?3, ?4, '')",
            params![floor, office, status, date],
        )
        .expect("insert ticket");
        conn.last_insert_rowid()
    }

    fn insert_comment(conn: &Connection, ticket_id: i64, body: &str) {
        conn.execute(
            "INSERT INTO comments (ticket_id, body, author, created_at) \
             VALUES (?1, ?2, 'Tomas', '05/03/24 10:00')",
            params![ticket_id, body],
        )
        .expect("insert comment");
    }

    #[test]
    fn get_ticket_found_and_missing() {
        let conn = test_db();
        let id = insert_ticket(&conn, -1, "Archivo", "pending", "05/03/24");

        let ticket = get_ticket(&conn, id).unwrap().unwrap();
        assert_eq!(ticket.floor, -1);
        assert_eq!(ticket.office, "Archivo");
        assert_eq!(ticket.status, "pending");
        assert!(ticket.resolved_by.is_empty());

        assert!(get_ticket(&conn, id + 100).unwrap().is_none());
        assert!(ticket_exists(&conn, id).unwrap());
        assert!(!ticket_exists(&conn, id + 100).unwrap());
    }

    #[test]
    fn list_is_newest_first_with_comment_counts() {
        let conn = test_db();
        let a = insert_ticket(&conn, 1, "Legal", "pending", "01/03/24");
        let b = insert_ticket(&conn, 2, "RRHH", "resolved", "02/03/24");
        insert_comment(&conn, a, "first");
        insert_comment(&conn, a, "second");

        let rows = list_tickets(&conn, &TicketFilter::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticket.id, b);
        assert_eq!(rows[0].comment_count, 0);
        assert_eq!(rows[1].ticket.id, a);
        assert_eq!(rows[1].comment_count, 2);
    }

    #[test]
    fn filters_combine_with_and() {
        let conn = test_db();
        insert_ticket(&conn, 1, "Legal", "pending", "01/03/24");
        insert_ticket(&conn, 1, "Contaduria", "resolved", "01/03/24");
        insert_ticket(&conn, 2, "Legal", "pending", "01/03/24");

        let filter = TicketFilter {
            status: Some("pending".into()),
            floor: Some(1),
            ..TicketFilter::default()
        };
        let rows = list_tickets(&conn, &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticket.office, "Legal");
        assert_eq!(count_tickets(&conn, &filter).unwrap(), 1);
    }

    #[test]
    fn search_matches_office_reporter_or_reason() {
        let conn = test_db();
        insert_ticket(&conn, 1, "Mesa de Entradas", "pending", "01/03/24");
        insert_ticket(&conn, 3, "Legal", "pending", "01/03/24");

        let filter = TicketFilter {
            search: Some("entradas".into()),
            ..TicketFilter::default()
        };
        assert_eq!(list_tickets(&conn, &filter).unwrap().len(), 1);

        let filter = TicketFilter {
            search: Some("chair".into()),
            ..TicketFilter::default()
        };
        assert_eq!(list_tickets(&conn, &filter).unwrap().len(), 2);
    }

    #[test]
    fn pagination_applies_limit_and_offset() {
        let conn = test_db();
        for i in 0..7 {
            insert_ticket(&conn, i, "Legal", "pending", "01/03/24");
        }
        let page = TicketFilter {
            limit: Some(3),
            offset: Some(3),
            ..TicketFilter::default()
        };
        let rows = list_tickets(&conn, &page).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].ticket.floor, 3);
        assert_eq!(count_tickets(&conn, &page).unwrap(), 7);
    }

    #[test]
    fn comments_newest_first() {
        let conn = test_db();
        let id = insert_ticket(&conn, 1, "Legal", "pending", "01/03/24");
        insert_comment(&conn, id, "older");
        insert_comment(&conn, id, "newer");

        let comments = get_comments(&conn, id).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "newer");
        assert_eq!(comments[1].body, "older");
    }

    #[test]
    fn floors_are_distinct_and_sorted() {
        let conn = test_db();
        insert_ticket(&conn, 3, "A", "pending", "01/03/24");
        insert_ticket(&conn, -1, "B", "pending", "01/03/24");
        insert_ticket(&conn, 3, "C", "pending", "01/03/24");
        assert_eq!(ticket_floors(&conn).unwrap(), vec![-1, 3]);
    }

    #[test]
    fn latest_activity_on_empty_and_filled_store() {
        let conn = test_db();
        let empty = latest_activity(&conn).unwrap();
        assert_eq!(empty.last_id, 0);
        assert_eq!(empty.total, 0);
        assert!(empty.last_date.is_empty());

        insert_ticket(&conn, 1, "A", "pending", "01/03/24");
        let id = insert_ticket(&conn, 1, "B", "pending", "09/03/24");
        let filled = latest_activity(&conn).unwrap();
        assert_eq!(filled.last_id, id);
        assert_eq!(filled.total, 2);
        assert_eq!(filled.last_date, "09/03/24");
    }

    #[test]
    fn schema_helpers_detect_tables_and_columns() {
        let conn = test_db();
        assert!(table_exists(&conn, "tickets").unwrap());
        assert!(!table_exists(&conn, "datos").unwrap());
        assert!(table_has_column(&conn, "tickets", "resolved_by").unwrap());
        assert!(!table_has_column(&conn, "tickets", "resuelto_por").unwrap());
    }
}
