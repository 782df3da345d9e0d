//! Office directory: the floor → offices dataset offered when filing tickets.
//!
//! The directory lives in its own SQLite file. Older deployments keep it in an
//! `oficinas (nombre_oficina, piso)` table; such files are read and written in
//! place rather than migrated.

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode as SqliteErrorCode, params};
use std::path::Path;

use super::{DEFAULT_BUSY_TIMEOUT, query, schema};
use crate::model::Office;
use crate::model::office::FALLBACK_FLOORS;

/// Typed failures of directory edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfficeError {
    #[error("office '{0}' already exists")]
    Duplicate(String),
    #[error("office name must not be empty")]
    BlankName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Current,
    Legacy,
}

impl Layout {
    const fn table(self) -> &'static str {
        match self {
            Self::Current => "offices",
            Self::Legacy => "oficinas",
        }
    }

    const fn name_column(self) -> &'static str {
        match self {
            Self::Current => "name",
            Self::Legacy => "nombre_oficina",
        }
    }

    const fn floor_column(self) -> &'static str {
        match self {
            Self::Current => "floor",
            Self::Legacy => "piso",
        }
    }
}

/// Handle on an office directory database.
pub struct OfficeDirectory {
    conn: Connection,
    layout: Layout,
}

impl OfficeDirectory {
    /// Open (or create) the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open office directory {}", path.display()))?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)
            .context("set office directory busy timeout")?;
        Self::from_connection(conn)
    }

    /// Open the directory only if the file already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be opened.
    pub fn try_open(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::open(path).map(Some)
    }

    /// Wrap an existing connection, creating the schema when the legacy
    /// table is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if schema inspection or creation fails.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let legacy = query::table_exists(&conn, "oficinas")?
            && query::table_has_column(&conn, "oficinas", "nombre_oficina")?
            && query::table_has_column(&conn, "oficinas", "piso")?;

        let layout = if legacy {
            tracing::debug!("using legacy office directory layout");
            Layout::Legacy
        } else {
            conn.execute_batch(schema::OFFICES_SQL)
                .context("create office directory schema")?;
            Layout::Current
        };

        Ok(Self { conn, layout })
    }

    /// Distinct floors that have at least one office, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn floors(&self) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT DISTINCT {floor} FROM {table} ORDER BY {floor}",
            floor = self.layout.floor_column(),
            table = self.layout.table(),
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare floors query")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut floors = Vec::new();
        for row in rows {
            floors.push(row.context("read floor")?);
        }
        Ok(floors)
    }

    /// Office names on `floor`, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn offices_on_floor(&self, floor: i64) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT {name} FROM {table} WHERE {floor} = ?1 ORDER BY {name}",
            name = self.layout.name_column(),
            floor = self.layout.floor_column(),
            table = self.layout.table(),
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare offices query")?;
        let rows = stmt.query_map(params![floor], |row| row.get(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.context("read office name")?);
        }
        Ok(names)
    }

    /// Every office ordered by floor, then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Office>> {
        let sql = format!(
            "SELECT id, {name}, {floor} FROM {table} ORDER BY {floor}, {name}",
            name = self.layout.name_column(),
            floor = self.layout.floor_column(),
            table = self.layout.table(),
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare office list")?;
        let rows = stmt.query_map([], |row| {
            Ok(Office {
                id: row.get(0)?,
                name: row.get(1)?,
                floor: row.get(2)?,
            })
        })?;

        let mut offices = Vec::new();
        for row in rows {
            offices.push(row.context("read office row")?);
        }
        Ok(offices)
    }

    /// Number of offices in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.layout.table());
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .context("count offices")?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Add an office and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`OfficeError::Duplicate`] when the name is taken,
    /// [`OfficeError::BlankName`] for an empty name, or an SQL error.
    pub fn add(&self, name: &str, floor: i64) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OfficeError::BlankName.into());
        }

        let sql = format!(
            "INSERT INTO {table} ({name_col}, {floor_col}) VALUES (?1, ?2)",
            table = self.layout.table(),
            name_col = self.layout.name_column(),
            floor_col = self.layout.floor_column(),
        );
        match self.conn.execute(&sql, params![name, floor]) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == SqliteErrorCode::ConstraintViolation =>
            {
                return Err(OfficeError::Duplicate(name.to_string()).into());
            }
            Err(e) => return Err(e).context("insert office"),
        }

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, name, floor, "office added");
        Ok(id)
    }

    /// Remove an office by name. Returns `false` when it was not listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            self.layout.table(),
            self.layout.name_column()
        );
        let removed = self
            .conn
            .execute(&sql, params![name.trim()])
            .context("delete office")?;
        if removed > 0 {
            tracing::info!(name, "office removed");
        }
        Ok(removed > 0)
    }
}

/// Floors to offer when filing a ticket.
///
/// Falls back to [`FALLBACK_FLOORS`] when the directory is missing or cannot
/// be read.
#[must_use]
pub fn floors_or_fallback(directory: Option<&OfficeDirectory>) -> Vec<i64> {
    let Some(directory) = directory else {
        tracing::warn!("office directory unavailable; offering default floors");
        return FALLBACK_FLOORS.to_vec();
    };

    match directory.floors() {
        Ok(floors) => floors,
        Err(e) => {
            tracing::warn!(error = %e, "office directory unreadable; offering default floors");
            FALLBACK_FLOORS.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> OfficeDirectory {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        OfficeDirectory::from_connection(conn).expect("init directory")
    }

    #[test]
    fn add_list_and_group_by_floor() {
        let dir = directory();
        dir.add("Legal", 2).unwrap();
        dir.add("Archivo", -1).unwrap();
        dir.add("Contaduria", 2).unwrap();

        assert_eq!(dir.floors().unwrap(), vec![-1, 2]);
        assert_eq!(
            dir.offices_on_floor(2).unwrap(),
            vec!["Contaduria".to_string(), "Legal".to_string()]
        );
        assert_eq!(dir.count().unwrap(), 3);

        let all = dir.list().unwrap();
        assert_eq!(all[0].name, "Archivo");
        assert_eq!(all[0].floor, -1);
    }

    #[test]
    fn duplicate_name_is_typed_error() {
        let dir = directory();
        dir.add("Legal", 2).unwrap();
        let err = dir.add(" Legal ", 3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<OfficeError>(),
            Some(&OfficeError::Duplicate("Legal".into()))
        );
    }

    #[test]
    fn blank_name_rejected() {
        let dir = directory();
        let err = dir.add("  ", 1).unwrap_err();
        assert_eq!(err.downcast_ref::<OfficeError>(), Some(&OfficeError::BlankName));
    }

    #[test]
    fn remove_reports_whether_listed() {
        let dir = directory();
        dir.add("Legal", 2).unwrap();
        assert!(dir.remove("Legal").unwrap());
        assert!(!dir.remove("Legal").unwrap());
        assert_eq!(dir.count().unwrap(), 0);
    }

    #[test]
    fn legacy_layout_is_used_in_place() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch(
            "CREATE TABLE oficinas (id INTEGER PRIMARY KEY, nombre_oficina TEXT UNIQUE, piso INTEGER);
             INSERT INTO oficinas (nombre_oficina, piso) VALUES ('Mesa de Entradas', 0), ('Legal', 3);",
        )
        .unwrap();

        let dir = OfficeDirectory::from_connection(conn).unwrap();
        assert_eq!(dir.floors().unwrap(), vec![0, 3]);
        dir.add("Sistemas", 3).unwrap();
        assert_eq!(
            dir.offices_on_floor(3).unwrap(),
            vec!["Legal".to_string(), "Sistemas".to_string()]
        );
        assert!(!query::table_exists(&dir.conn, "offices").unwrap());
    }

    #[test]
    fn missing_directory_falls_back() {
        assert_eq!(floors_or_fallback(None), FALLBACK_FLOORS.to_vec());
    }

    #[test]
    fn try_open_missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("offices.db");
        assert!(OfficeDirectory::try_open(&path).unwrap().is_none());

        drop(OfficeDirectory::open(&path).unwrap());
        assert!(OfficeDirectory::try_open(&path).unwrap().is_some());
    }
}
