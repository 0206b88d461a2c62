// Schema discovery and store startup failures.

mod common;

use common::{create_db, seeded_db, TABLES};
use paralympics_api::schema::Affinity;
use paralympics_api::{discover, SchemaError, Settings, Store};

#[tokio::test]
async fn discovers_user_tables_in_creation_order() {
    let db = seeded_db().await;
    let store = Store::open(&db.url()).await.unwrap();
    let registry = discover(&store).await.unwrap();
    let names: Vec<&str> = registry.tables().iter().map(|t| t.name.as_str()).collect();
    // AUTOINCREMENT creates sqlite_sequence, which is internal.
    assert_eq!(names, TABLES);
}

#[tokio::test]
async fn columns_and_primary_keys() {
    let db = seeded_db().await;
    let store = Store::open(&db.url()).await.unwrap();
    let registry = discover(&store).await.unwrap();

    let host = registry.table("host").unwrap();
    let cols: Vec<&str> = host.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(cols, ["id", "place_name", "latitude", "longitude", "country_id"]);
    assert_eq!(host.primary_key.as_deref(), Some("id"));
    assert_eq!(host.column("latitude").unwrap().affinity, Affinity::Real);

    assert_eq!(registry.table("games_host").unwrap().primary_key.as_deref(), Some("games_id"));
    assert_eq!(registry.table("team").unwrap().primary_key.as_deref(), Some("code"));
    assert_eq!(registry.table("note").unwrap().primary_key, None);
    assert!(registry.table("note").unwrap().key_columns.is_empty());
}

#[tokio::test]
async fn full_key_and_without_rowid_are_recorded() {
    let db = seeded_db().await;
    let store = Store::open(&db.url()).await.unwrap();
    let registry = discover(&store).await.unwrap();

    let games_host = registry.table("games_host").unwrap();
    assert_eq!(games_host.key_columns, ["games_id", "host_id"]);
    assert!(!games_host.without_rowid);

    let medal = registry.table("medal").unwrap();
    assert_eq!(medal.key_columns, ["games_id", "country_id"]);
    assert!(medal.without_rowid);
    assert!(!registry.table("team").unwrap().without_rowid);
}

#[tokio::test]
async fn composite_key_picks_first_column_by_position() {
    let db = create_db(&["CREATE TABLE result (a TEXT, b INTEGER, c INTEGER, PRIMARY KEY (c, b))"]).await;
    let store = Store::open(&db.url()).await.unwrap();
    let registry = discover(&store).await.unwrap();
    let result = registry.table("result").unwrap();
    assert_eq!(result.primary_key.as_deref(), Some("b"));
    // Key order follows the PRIMARY KEY clause, not column position.
    assert_eq!(result.key_columns, ["c", "b"]);
}

#[tokio::test]
async fn paths_are_derived_from_table_names() {
    let db = seeded_db().await;
    let store = Store::open(&db.url()).await.unwrap();
    let registry = discover(&store).await.unwrap();
    for t in registry.tables() {
        assert_eq!(t.base_path(), format!("/{}", t.name));
        assert_eq!(t.search_path(), format!("/{}/search", t.name));
        assert_eq!(t.item_path(), format!("/{}/:id", t.name));
    }
}

#[tokio::test]
async fn empty_database_has_no_tables() {
    let db = create_db(&[]).await;
    let store = Store::open(&db.url()).await.unwrap();
    assert!(discover(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_database_file_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("absent.db").display());
    let err = Store::open(&url).await.unwrap_err();
    assert!(matches!(err, SchemaError::StoreUnavailable(_)));
    assert!(!dir.path().join("absent.db").exists());

    let settings = Settings {
        database_url: url,
        ..Settings::default()
    };
    assert!(matches!(
        paralympics_api::app(&settings).await,
        Err(SchemaError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn in_memory_database_is_refused() {
    for url in ["sqlite::memory:", "sqlite://paralympics.db?mode=memory"] {
        let err = Store::open(url).await.unwrap_err();
        assert!(matches!(err, SchemaError::StoreUnavailable(_)), "url {}", url);
    }
}

#[tokio::test]
async fn unreadable_file_fails_introspection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, b"this is definitely not a sqlite database file, just some text padding it out").unwrap();
    let url = format!("sqlite://{}", path.display());
    assert!(paralympics_api::app(&Settings {
        database_url: url,
        ..Settings::default()
    })
    .await
    .is_err());
}
