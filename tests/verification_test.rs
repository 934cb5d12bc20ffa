//! End-to-end verification scenarios
//!
//! Every test builds its own template in a temp dir and checks that no
//! sandbox file outlives the call.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde_json::json;
use sqlcheck::{
    DatasetInstance, EngineConfig, Row, SandboxConfig, SandboxProvisioner, SqlErrorKind, Value,
    VerificationEngine, compare_results,
};
use tempfile::TempDir;

fn template(dir: &Path) -> PathBuf {
    let path = dir.join("chinook.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE t (x INTEGER);
         CREATE TABLE artists (ArtistId INTEGER PRIMARY KEY, Name NVARCHAR(120));
         INSERT INTO artists (Name) VALUES ('Queen'), ('AC/DC'), ('Aerosmith'), ('Björk');",
    )
    .unwrap();
    path
}

fn config(dir: &TempDir) -> SandboxConfig {
    SandboxConfig::new(template(dir.path())).with_scratch_dir(dir.path().join("scratch"))
}

fn engine(dir: &TempDir) -> VerificationEngine {
    VerificationEngine::new(EngineConfig::new(config(dir)))
}

fn leftover_sandboxes(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path().join("scratch"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn row(cells: &[(&str, Value)]) -> Row {
    cells.iter().cloned().collect()
}

#[test]
fn shuffled_rows_compare_equal() {
    let a = vec![
        row(&[("id", Value::Integer(1)), ("name", Value::from("a"))]),
        row(&[("id", Value::Integer(2)), ("name", Value::from("b"))]),
        row(&[("id", Value::Integer(3)), ("name", Value::Null)]),
    ];
    let mut b = a.clone();
    b.reverse();
    assert!(compare_results(&a, &b));
}

#[test]
fn differing_row_counts_never_compare_equal() {
    let a = vec![row(&[("x", Value::Integer(1))])];
    let b = vec![row(&[("x", Value::Integer(1))]), row(&[("x", Value::Integer(1))])];
    assert!(!compare_results(&a, &b));
    assert!(!compare_results(&b, &a));
}

#[test]
fn null_is_not_empty_string() {
    let a = vec![row(&[("x", Value::Null)])];
    let b = vec![row(&[("x", Value::from(""))])];
    assert!(!compare_results(&a, &b));
}

#[test]
fn column_count_mismatch_is_positional_and_unequal() {
    let expected = vec![row(&[("x", Value::Integer(1)), ("y", Value::Integer(2))])];
    let actual = vec![row(&[
        ("a", Value::Integer(1)),
        ("b", Value::Integer(2)),
        ("c", Value::Integer(3)),
    ])];
    assert!(!compare_results(&expected, &actual));
}

#[tokio::test]
async fn mutation_mode_insert() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let right = engine
        .verify("INSERT INTO t VALUES (1)", "INSERT INTO t VALUES (1)", Some("SELECT * FROM t"))
        .await
        .unwrap();
    assert_eq!(right.is_correct, Some(true));

    let wrong = engine
        .verify("INSERT INTO t VALUES (2)", "INSERT INTO t VALUES (1)", Some("SELECT * FROM t"))
        .await
        .unwrap();
    let body = serde_json::to_value(&wrong).unwrap();
    assert_eq!(body["isCorrect"], false);
    assert_eq!(body["expectedData"], json!([{ "x": 1 }]));
    assert_eq!(leftover_sandboxes(&dir), 0);
}

#[tokio::test]
async fn read_mode_ignores_order() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let result = engine
        .verify(
            "SELECT Name FROM artists",
            "SELECT Name FROM artists ORDER BY Name",
            None,
        )
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.is_correct, Some(true));
    assert_eq!(leftover_sandboxes(&dir), 0);
}

#[tokio::test]
async fn syntax_error_reports_expected_rows_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let result = engine
        .verify("SELEKT * FROM t", "SELECT Name FROM artists", None)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(SqlErrorKind::Syntax));
    assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
    assert_eq!(result.expected_data.map(|rows| rows.len()), Some(4));
    assert_eq!(leftover_sandboxes(&dir), 0);
}

#[tokio::test]
async fn concurrent_sandboxes_never_collide() {
    let dir = TempDir::new().unwrap();
    let provisioner = SandboxProvisioner::new(config(&dir));

    let acquired = acquire_many(&provisioner, 16).await;
    let mut paths: Vec<_> = acquired.iter().map(|db| db.path().to_path_buf()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 16);

    for db in acquired {
        provisioner.release(db).await;
    }
    assert_eq!(leftover_sandboxes(&dir), 0);
}

async fn acquire_many(
    provisioner: &SandboxProvisioner,
    n: usize,
) -> Vec<DatasetInstance> {
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let provisioner = provisioner.clone();
            tokio::spawn(async move { provisioner.acquire().await.unwrap() })
        })
        .collect();

    let mut out = Vec::with_capacity(n);
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}

#[tokio::test]
async fn mutations_never_reach_the_template() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    let template = engine.provisioner().config().template_path.clone();

    engine
        .verify("DELETE FROM artists", "DELETE FROM artists", Some("SELECT count(*) AS n FROM artists"))
        .await
        .unwrap();

    let conn = Connection::open(&template).unwrap();
    let n: i64 = conn
        .query_row("SELECT count(*) FROM artists", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 4);
}
