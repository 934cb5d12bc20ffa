//! Request boundary scenarios, wired from configuration like the binary

use rusqlite::Connection;
use serde_json::json;
use sqlcheck::cli::build_service;
use sqlcheck::{AppConfig, SqlRequest, SqlService};
use tempfile::TempDir;

fn setup(dir: &TempDir, auth_token: Option<&str>) -> SqlService {
    let template = dir.path().join("chinook.db");
    Connection::open(&template)
        .unwrap()
        .execute_batch(
            "CREATE TABLE t (x INTEGER);
             CREATE TABLE artists (ArtistId INTEGER PRIMARY KEY, Name TEXT);
             INSERT INTO artists (Name) VALUES ('Queen'), ('AC/DC');",
        )
        .unwrap();

    let problems = dir.path().join("problems");
    std::fs::create_dir_all(problems.join("basic")).unwrap();
    std::fs::write(
        problems.join("basic/names.yaml"),
        "id: names\ntitle: Names\ndescription: List artist names\ndifficulty: basic\nexampleAnswer: SELECT Name FROM artists ORDER BY Name\n",
    )
    .unwrap();
    std::fs::write(
        problems.join("basic/insert.json"),
        r#"{"id":"insert","title":"Insert","description":"Insert 1 into t","difficulty":"basic","exampleAnswer":"INSERT INTO t VALUES (1)","verificationQuery":"SELECT * FROM t"}"#,
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.engine.sandbox = config
        .engine
        .sandbox
        .with_scratch_dir(dir.path().join("scratch"));
    config.engine.sandbox.template_path = template;
    config.problems_dir = Some(problems);
    config.auth_token = auth_token.map(str::to_string);

    build_service(&config).unwrap()
}

#[tokio::test]
async fn verify_through_request_boundary() {
    let dir = TempDir::new().unwrap();
    let service = setup(&dir, None);

    let response = service
        .handle(SqlRequest::new("SELECT Name FROM artists").for_problem("names"), None)
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["isCorrect"], true);

    let response = service
        .handle_json(r#"{"query":"INSERT INTO t VALUES (2)","problemId":"insert"}"#, None)
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["isCorrect"], false);
    assert_eq!(response.body["expectedData"], json!([{ "x": 1 }]));
}

#[tokio::test]
async fn error_statuses() {
    let dir = TempDir::new().unwrap();
    let service = setup(&dir, Some("letmein"));

    let unauthorized = service.handle(SqlRequest::new("SELECT 1"), None).await;
    assert_eq!(unauthorized.status, 401);
    assert_eq!(unauthorized.body["success"], false);

    let missing_query = service.handle_json(r#"{"problemId":"names"}"#, Some("letmein")).await;
    assert_eq!(missing_query.status, 400);

    let unknown = service
        .handle(SqlRequest::new("SELECT 1").for_problem("nope"), Some("letmein"))
        .await;
    assert_eq!(unknown.status, 404);

    let syntax = service
        .handle(SqlRequest::new("SELEKT * FROM t").for_problem("names"), Some("letmein"))
        .await;
    assert_eq!(syntax.status, 400);
    assert!(syntax.body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(syntax.body["expectedData"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn missing_template_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let service = setup(&dir, None);
    std::fs::remove_file(dir.path().join("chinook.db")).unwrap();

    let response = service.handle(SqlRequest::new("SELECT 1"), None).await;
    assert_eq!(response.status, 500);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["code"], "PROVISION_ERROR");
}
