//! E2E CLI tests covering statistics and data movement:
//! - `rp stats` dashboard JSON after create → resolve
//! - `rp trend` chart shape
//! - `rp report` text reports
//! - `rp offices`, `rp info`, `rp export`, `rp import`, `rp completions`
//!
//! Each test runs `rp` as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn rp_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rp"));
    cmd.current_dir(dir);
    cmd.env("REPORTES_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd.env_remove("REPORTES_DB");
    cmd.env_remove("REPORTES_OFFICES_DB");
    cmd
}

fn init_project(dir: &Path) {
    rp_cmd(dir).args(["init"]).assert().success();
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = rp_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn run_text(dir: &Path, args: &[&str]) -> String {
    let output = rp_cmd(dir)
        .args(args)
        .args(["--format", "text"])
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

fn create(dir: &Path, floor: &str, office: &str, date: &str) -> String {
    let json = run_json(
        dir,
        &[
            "create", "--floor", floor, "--office", office, "--reporter", "Ana", "--reason",
            "Broken outlet", "--date", date,
        ],
    );
    json["id"].as_i64().expect("id").to_string()
}

/// Two weekday resolutions in March 2024 (one shared) and a pending ticket.
fn seed_march(dir: &Path) {
    let a = create(dir, "2", "Legal", "04/03/24");
    let b = create(dir, "2", "Legal", "05/03/24");
    create(dir, "3", "RRHH", "2024-04-02");
    run_json(dir, &["resolve", &a, "--by", "Tomas, Nahuel"]);
    run_json(dir, &["resolve", &b, "--by", "tomas"]);
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn create_resolve_stats_round_trip() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    seed_march(dir.path());

    let stats = run_json(dir.path(), &["stats"]);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["status_breakdown"]["resolved"], 2);
    assert_eq!(stats["status_breakdown"]["pending"], 1);

    assert_eq!(stats["top_offices"][0]["key"], "Legal");
    assert_eq!(stats["top_offices"][0]["count"], 2);
    assert_eq!(stats["top_floors"][0]["key"], 2);

    assert_eq!(stats["top_resolvers"][0]["key"], "Tomas");
    assert_eq!(stats["top_resolvers"][0]["count"], 2);
    assert_eq!(stats["top_resolvers"][1]["key"], "Nahuel");

    assert_eq!(stats["monthly"][0]["label"], "March 2024");
    assert_eq!(stats["monthly"][0]["count"], 2);
    assert_eq!(stats["monthly_winners"][0]["winners"][0]["key"], "Tomas");
    assert_eq!(stats["top_winners"][0]["key"], "Tomas");
    assert_eq!(stats["top_winners"][0]["count"], 1);

    assert_eq!(stats["averages"]["year"], 2024);
    assert_eq!(stats["averages"]["monthly"], 1.5);
}

#[test]
fn stats_locale_and_top_flags() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    seed_march(dir.path());

    let stats = run_json(dir.path(), &["stats", "--locale", "es", "--top", "1"]);
    assert_eq!(stats["monthly"][0]["label"], "Marzo 2024");
    assert_eq!(stats["top_offices"].as_array().map(Vec::len), Some(1));
}

#[test]
fn empty_store_stats_are_zero() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let stats = run_json(dir.path(), &["stats"]);
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["status_breakdown"], serde_json::json!({}));
    assert_eq!(stats["averages"]["monthly"], 0.0);
    assert_eq!(stats["top_winners"], serde_json::json!([]));

    rp_cmd(dir.path())
        .args(["stats", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overview"));
}

#[test]
fn trend_is_oldest_first_with_four_series() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    seed_march(dir.path());

    let trend = run_json(dir.path(), &["trend"]);
    assert_eq!(trend["labels"], serde_json::json!(["March 2024", "April 2024"]));
    let datasets = trend["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 4);
    assert_eq!(datasets[0]["label"], "Total");
    assert_eq!(datasets[0]["data"], serde_json::json!([2, 1]));
    assert_eq!(datasets[1]["data"], serde_json::json!([2, 0]));
    assert_eq!(datasets[2]["data"], serde_json::json!([0, 1]));
}

#[test]
fn text_reports() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    seed_march(dir.path());

    let general = run_text(dir.path(), &["report", "general"]);
    assert!(general.contains("Total tickets: 3"));
    assert!(general.contains("Floor 2: 2 tickets"));

    let pending = run_text(dir.path(), &["report", "pending"]);
    assert!(pending.contains("PENDING TICKETS (1)"));
    assert!(pending.contains("Floor 3 - RRHH"));

    let stats = run_text(dir.path(), &["report", "stats"]);
    assert!(stats.contains("Monthly average:  1.5"));
    assert!(stats.contains("1. Tomas: 2 jobs"));

    let today = run_text(dir.path(), &["report", "today"]);
    assert!(today.contains("TODAY'S TICKETS"));

    let week = run_json(dir.path(), &["report", "week"]);
    assert_eq!(week["report"], "week");
    assert_eq!(week["total_all_time"], 3);
}

// ---------------------------------------------------------------------------
// Offices, info, export, import
// ---------------------------------------------------------------------------

#[test]
fn office_directory_maintenance() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    run_json(dir.path(), &["offices", "add", "Archivo", "--floor", "-1"]);
    run_json(dir.path(), &["offices", "add", "Legal", "--floor", "2"]);
    rp_cmd(dir.path())
        .args(["offices", "add", "Legal", "--floor", "3", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate_office"));

    let floors = run_json(dir.path(), &["offices", "floors"]);
    assert_eq!(floors["floors"], serde_json::json!([-1, 2]));
    assert_eq!(floors["fallback"], false);

    let listed = run_json(dir.path(), &["offices", "list", "--floor", "2"]);
    assert_eq!(listed[0]["name"], "Legal");

    run_json(dir.path(), &["offices", "remove", "Legal"]);
    let listed = run_json(dir.path(), &["offices", "list"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[test]
fn floors_fall_back_when_directory_missing() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    std::fs::remove_file(dir.path().join(".reportes/offices.db")).unwrap();

    let floors = run_json(dir.path(), &["offices", "floors"]);
    assert_eq!(floors["floors"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(floors["fallback"], true);
}

#[test]
fn info_reports_counts() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    create(dir.path(), "1", "Legal", "05/03/24");
    let last = create(dir.path(), "1", "Legal", "06/03/24");

    let info = run_json(dir.path(), &["info"]);
    assert_eq!(info["tickets"], 2);
    assert_eq!(info["last_id"].to_string(), last);
    assert_eq!(info["last_date"], "06/03/24");
    assert_eq!(info["offices"], 0);
}

#[test]
fn export_writes_jsonl_newest_first() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let first = create(dir.path(), "1", "Legal", "05/03/24");
    create(dir.path(), "1", "RRHH", "06/03/24");
    run_json(dir.path(), &["comment", &first, "Checked"]);

    let out = dir.path().join("dump.jsonl");
    rp_cmd(dir.path())
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    let rows: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["office"], "RRHH");
    assert_eq!(rows[1]["comments"][0]["body"], "Checked");
}

#[test]
fn import_legacy_store() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let legacy_path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&legacy_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE datos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                piso INTEGER, oficina TEXT, quien TEXT, razon TEXT,
                estado TEXT, fecha TEXT, resuelto_por TEXT
            );
            INSERT INTO datos VALUES (4, 1, 'Legal', 'Ana', 'Leak', 'pendiente', '01/03/24', '');
            INSERT INTO datos VALUES (8, -1, 'Archivo', 'Luis', 'Lights', 'resuelto', '04/03/24', 'tomas, nahuel');
            CREATE TABLE comentarios (id INTEGER PRIMARY KEY, reporte_id INTEGER,
                texto TEXT, autor TEXT, fecha TEXT);
            INSERT INTO comentarios VALUES (1, 8, 'Replaced tubes', 'Tomas', '04/03/24 10:00');
            CREATE TABLE oficinas (id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre_oficina TEXT UNIQUE NOT NULL, piso INTEGER NOT NULL);
            INSERT INTO oficinas (nombre_oficina, piso) VALUES ('Archivo', -1);",
        )
        .unwrap();
    }

    let report = run_json(dir.path(), &["import", legacy_path.to_str().unwrap()]);
    assert_eq!(report["tickets_imported"], 2);
    assert_eq!(report["comments_imported"], 1);
    assert_eq!(report["offices_imported"], 1);

    let shown = run_json(dir.path(), &["show", "8"]);
    assert_eq!(shown["status"], "resolved");
    assert_eq!(shown["comments"][0]["body"], "Replaced tubes");

    let again = run_json(dir.path(), &["import", legacy_path.to_str().unwrap()]);
    assert_eq!(again["tickets_imported"], 0);
    assert_eq!(again["tickets_skipped"], 2);

    let next = create(dir.path(), "1", "Legal", "05/03/24");
    assert_eq!(next, "9");
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    rp_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_rp()"));
}
