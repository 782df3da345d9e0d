//! Subcommand handlers and the plumbing they share.

pub mod comment;
pub mod completions;
pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod info;
pub mod init;
pub mod list;
pub mod offices;
pub mod report;
pub mod resolve;
pub mod show;
pub mod stats;
pub mod trend;
pub mod update;

use crate::output::{CliError, OutputMode, render_error};
use chrono::{Local, NaiveDate};
use reportes_core::config::{self, ProjectConfig, StorePaths};
use reportes_core::db::{self, offices::OfficeDirectory, query};
use reportes_core::error::ErrorCode;
use reportes_core::model::Status;
use reportes_stats::{MonthLocale, TicketSet, date};
use rusqlite::Connection;
use std::path::Path;

/// Layout of comment timestamps.
pub const COMMENT_TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M";

/// Render `message` under `code` and return it as an error.
pub fn fail<T>(output: OutputMode, code: ErrorCode, message: impl Into<String>) -> anyhow::Result<T> {
    let message = message.into();
    render_error(output, &CliError::from_code(code, message.clone()))?;
    anyhow::bail!("{message}")
}

/// Project configuration and resolved store paths for one invocation.
pub struct Workspace {
    pub config: ProjectConfig,
    pub paths: StorePaths,
}

impl Workspace {
    /// Load `.reportes/config.toml` under `project_root`.
    ///
    /// # Errors
    ///
    /// Renders [`ErrorCode::ConfigParseError`] when the file is malformed.
    pub fn load(output: OutputMode, project_root: &Path) -> anyhow::Result<Self> {
        let config = match config::load_project_config(project_root) {
            Ok(config) => config,
            Err(e) => return fail(output, ErrorCode::ConfigParseError, format!("{e:#}")),
        };
        let paths = config.store_paths(project_root);
        Ok(Self { config, paths })
    }

    /// Open the ticket store, which must already exist.
    ///
    /// # Errors
    ///
    /// Renders [`ErrorCode::NotInitialized`] when the store is missing.
    pub fn open_store(&self, output: OutputMode) -> anyhow::Result<Connection> {
        match db::try_open_store(&self.paths.tickets)? {
            Some(conn) => Ok(conn),
            None => fail(
                output,
                ErrorCode::NotInitialized,
                format!("ticket store not found at {}", self.paths.tickets.display()),
            ),
        }
    }

    /// Open the office directory if it exists and is readable.
    pub fn office_directory(&self) -> Option<OfficeDirectory> {
        match OfficeDirectory::try_open(&self.paths.offices) {
            Ok(directory) => directory,
            Err(e) => {
                tracing::warn!(
                    path = %self.paths.offices.display(),
                    error = %e,
                    "office directory unreadable"
                );
                None
            }
        }
    }

    /// Month-label locale from `[stats].locale`, overridable per command.
    pub fn locale(&self, override_value: Option<&str>) -> MonthLocale {
        let raw = override_value.unwrap_or(&self.config.stats.locale);
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unknown locale; using default");
            MonthLocale::default()
        })
    }
}

/// Load every ticket into an aggregation snapshot.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_ticket_set(conn: &Connection) -> anyhow::Result<TicketSet> {
    Ok(TicketSet::new(query::all_tickets(conn)?))
}

/// Parse a status argument, accepting the Spanish spellings.
///
/// # Errors
///
/// Renders [`ErrorCode::InvalidStatus`] for anything else.
pub fn parse_status(output: OutputMode, raw: &str) -> anyhow::Result<Status> {
    match raw.parse() {
        Ok(status) => Ok(status),
        Err(e) => fail(output, ErrorCode::InvalidStatus, e.to_string()),
    }
}

/// Parse a date argument in any accepted layout.
///
/// # Errors
///
/// Renders [`ErrorCode::InvalidDate`] when no layout matches.
pub fn parse_date(output: OutputMode, raw: &str) -> anyhow::Result<NaiveDate> {
    match date::parse_flexible(raw) {
        Ok(day) => Ok(day),
        Err(e) => fail(output, ErrorCode::InvalidDate, e.to_string()),
    }
}

/// Normalize an optional date argument to the storage layout, defaulting to
/// today.
///
/// # Errors
///
/// Renders [`ErrorCode::InvalidDate`] for an unparseable date.
pub fn storage_date(output: OutputMode, raw: Option<&str>) -> anyhow::Result<String> {
    let day = match raw {
        Some(raw) => parse_date(output, raw)?,
        None => today(),
    };
    Ok(date::format_short(day))
}

/// Fetch a ticket or render [`ErrorCode::TicketNotFound`].
///
/// # Errors
///
/// Returns an error when the ticket is missing or the query fails.
pub fn require_ticket(
    output: OutputMode,
    conn: &Connection,
    id: i64,
) -> anyhow::Result<reportes_core::model::Ticket> {
    match query::get_ticket(conn, id)? {
        Some(ticket) => Ok(ticket),
        None => fail(output, ErrorCode::TicketNotFound, format!("ticket #{id} not found")),
    }
}

/// Local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local wall-clock stamp for new comments.
pub fn comment_timestamp() -> String {
    Local::now().format(COMMENT_TIMESTAMP_FORMAT).to_string()
}

/// Human label for a stored status literal.
pub fn status_label(raw: &str) -> String {
    raw.parse::<Status>()
        .map_or_else(|_| raw.to_string(), |s| s.label().to_string())
}
