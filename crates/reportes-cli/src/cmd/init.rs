//! `rp init` — create `.reportes/` with a config file and both databases.

use anyhow::{Context as _, Result};
use clap::Args;
use reportes_core::config::{self, ProjectConfig};
use reportes_core::db::{self, offices::OfficeDirectory};
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite `.reportes/config.toml` if it already exists.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "*.db\n*.db-wal\n*.db-shm\n";

/// Execute `rp init`. Creates the project skeleton:
///
/// ```text
/// .reportes/
///   config.toml   (default project config)
///   tickets.db    (ticket store, migrated to the latest schema)
///   offices.db    (office directory, empty)
///   .gitignore
/// ```
///
/// Existing databases are opened and migrated, never truncated.
///
/// # Errors
///
/// Returns an error if `.reportes/` already exists and `--force` is not set,
/// or if any filesystem or database operation fails.
pub fn run_init(args: &InitArgs, project_root: &Path) -> Result<()> {
    let project_dir = config::project_dir(project_root);
    let config_path = project_dir.join("config.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(".reportes/ already exists. Use `rp init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let config = ProjectConfig::default();
    std::fs::write(&config_path, config::render_project_config(&config)?)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    let gitignore_path = project_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write .gitignore: {}", gitignore_path.display()))?;

    let paths = config.store_paths(project_root);
    drop(db::open_store(&paths.tickets)?);
    drop(OfficeDirectory::open(&paths.offices)?);
    tracing::info!(tickets = %paths.tickets.display(), "project initialized");

    println!("✓ Initialized .reportes/ project structure.");
    println!();
    println!("  Tickets: {}", paths.tickets.display());
    println!("  Offices: {}", paths.offices.display());
    println!("  Config:  .reportes/config.toml");
    println!();
    println!("Next steps:");
    println!("  Register offices:");
    println!("    rp offices add \"Mesa de Entradas\" --floor 1");
    println!();
    println!("  File your first ticket:");
    println!("    rp create --floor 1 --office \"Mesa de Entradas\" --reporter Ana --reason \"Printer jam\"");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportes_core::db::query;
    use std::fs;

    #[test]
    fn fresh_init_creates_structure() {
        let dir = tempfile::tempdir().unwrap();
        run_init(&InitArgs { force: false }, dir.path()).expect("init should succeed");

        let project = dir.path().join(".reportes");
        assert!(project.join("config.toml").is_file());
        assert!(project.join(".gitignore").is_file());
        assert!(project.join("tickets.db").is_file());
        assert!(project.join("offices.db").is_file());

        let conn = db::open_store(&project.join("tickets.db")).unwrap();
        assert_eq!(query::latest_activity(&conn).unwrap().total, 0);
    }

    #[test]
    fn reinit_without_force_fails() {
        let dir = tempfile::tempdir().unwrap();
        run_init(&InitArgs { force: false }, dir.path()).unwrap();
        assert!(run_init(&InitArgs { force: false }, dir.path()).is_err());
    }

    #[test]
    fn reinit_with_force_keeps_tickets() {
        let dir = tempfile::tempdir().unwrap();
        run_init(&InitArgs { force: false }, dir.path()).unwrap();

        let db_path = dir.path().join(".reportes/tickets.db");
        {
            let conn = db::open_store(&db_path).unwrap();
            conn.execute(
                "INSERT INTO tickets (floor, office, reporter, reason, status, date, resolved_by) \
                 VALUES (1, 'Legal', 'Ana', 'Leak', 'pending', '05/03/24', '')",
                [],
            )
            .unwrap();
        }

        run_init(&InitArgs { force: true }, dir.path()).expect("forced init");
        let conn = db::open_store(&db_path).unwrap();
        assert_eq!(query::latest_activity(&conn).unwrap().total, 1);
        assert!(fs::read_to_string(dir.path().join(".reportes/config.toml"))
            .unwrap()
            .contains("[stats]"));
    }
}
