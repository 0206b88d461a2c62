// Shared fixtures: a seeded SQLite file in a temp dir and request helpers.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use paralympics_api::Settings;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE country (id INTEGER PRIMARY KEY, country_name TEXT NOT NULL)",
    "CREATE TABLE host (id INTEGER PRIMARY KEY, place_name TEXT, latitude REAL, longitude REAL, \
     country_id INTEGER REFERENCES country(id))",
    "CREATE TABLE games (id INTEGER PRIMARY KEY, event_type TEXT, year INTEGER, start_date TEXT, \
     end_date TEXT, events INTEGER, sports INTEGER, countries INTEGER, participants_m INTEGER, \
     participants_f INTEGER, participants INTEGER)",
    "CREATE TABLE games_host (games_id INTEGER NOT NULL, host_id INTEGER NOT NULL, \
     PRIMARY KEY (games_id, host_id))",
    "CREATE TABLE disability (id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL UNIQUE)",
    "CREATE TABLE team (code TEXT PRIMARY KEY, name TEXT NOT NULL, region TEXT)",
    "CREATE TABLE note (body TEXT, author TEXT)",
    "CREATE TABLE medal (games_id INTEGER NOT NULL, country_id INTEGER NOT NULL, gold INTEGER, \
     PRIMARY KEY (games_id, country_id)) WITHOUT ROWID",
];

pub const SEED: &[&str] = &[
    "INSERT INTO country (id, country_name) VALUES (1, 'Japan'), (2, 'France'), (3, 'Great Britain')",
    "INSERT INTO host (id, place_name, latitude, longitude, country_id) VALUES \
     (1, 'Tokyo', 35.68, 139.69, 1), (2, 'London', 51.51, -0.13, 3)",
    "INSERT INTO games VALUES \
     (1, 'summer', 2020, '24-08-2021', '05-09-2021', 539, 22, 162, 2550, 1853, 4403), \
     (2, 'summer', 1964, '08-11-1964', '12-11-1964', 144, 9, 21, 309, 66, 375), \
     (3, 'summer', 2012, '29-08-2012', '09-09-2012', 503, 20, 164, 2736, 1501, 4237), \
     (4, 'winter', 2022, '04-03-2022', '13-03-2022', 78, 6, 46, 422, 138, 560)",
    "INSERT INTO games_host (games_id, host_id) VALUES (1, 1), (2, 1), (3, 2)",
    "INSERT INTO disability (description) VALUES ('Visual impairment')",
    "INSERT INTO team (code, name, region) VALUES ('JPN', 'Japan', 'Asia')",
    "INSERT INTO note (body, author) VALUES ('first', 'coach')",
    "INSERT INTO medal (games_id, country_id, gold) VALUES (1, 1, 13)",
];

pub const TABLES: &[&str] = &["country", "host", "games", "games_host", "disability", "team", "note", "medal"];

pub struct TestDb {
    // Keeps the directory alive for the test's duration.
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            database_url: self.url(),
            ..Settings::default()
        }
    }
}

pub async fn create_db(statements: &[&str]) -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paralympics.db");
    execute(&path, statements).await;
    TestDb { dir, path }
}

pub async fn seeded_db() -> TestDb {
    let db = create_db(SCHEMA).await;
    execute(&db.path, SEED).await;
    db
}

async fn execute(path: &Path, statements: &[&str]) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    for stmt in statements {
        sqlx::query(stmt).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
}

pub async fn seeded_app() -> (TestDb, Router) {
    let db = seeded_db().await;
    let app = paralympics_api::app(&db.settings()).await.unwrap();
    (db, app)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}
