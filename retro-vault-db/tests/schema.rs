use retro_vault_db::schema::{self, table_columns, CATALOG_TABLES, CURRENT_VERSION};
use retro_vault_db::{ensure_schema, open_database, open_memory, SchemaError};
use rusqlite::Connection;

fn version_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn fresh_store_has_all_tables() {
    let conn = open_memory().unwrap();
    for table in CATALOG_TABLES {
        assert!(
            !table_columns(&conn, table).unwrap().is_empty(),
            "missing table {table}"
        );
    }
    assert!(!table_columns(&conn, "roles").unwrap().is_empty());
    assert!(!table_columns(&conn, "usuarios").unwrap().is_empty());

    let links = table_columns(&conn, "JUEGOS_CONSOLAS").unwrap();
    assert_eq!(links, vec!["game_id", "console_id", "cloud_path"]);

    let version: i32 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, CURRENT_VERSION);
}

#[test]
fn ensure_schema_is_idempotent() {
    let conn = open_memory().unwrap();
    let before = version_rows(&conn);
    ensure_schema(&conn).unwrap();
    ensure_schema(&conn).unwrap();
    assert_eq!(version_rows(&conn), before);
    assert_eq!(table_columns(&conn, "JUEGOS_CONSOLAS").unwrap().len(), 3);
}

#[test]
fn link_table_gains_cloud_path_with_empty_default() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE EMPRESAS (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT UNIQUE);
         CREATE TABLE CONSOLAS (id INTEGER PRIMARY KEY, name TEXT, company_id INTEGER);
         CREATE TABLE JUEGOS (id INTEGER PRIMARY KEY, name TEXT, release_date TEXT,
                              description TEXT, publishers TEXT);
         CREATE TABLE JUEGOS_CONSOLAS (game_id INTEGER, console_id INTEGER,
                                       PRIMARY KEY (game_id, console_id));
         INSERT INTO JUEGOS_CONSOLAS VALUES (1, 10), (2, 10);",
    )
    .unwrap();

    ensure_schema(&conn).unwrap();

    let columns = table_columns(&conn, "JUEGOS_CONSOLAS").unwrap();
    assert!(columns.iter().any(|c| c == "cloud_path"));
    let empty: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM JUEGOS_CONSOLAS WHERE cloud_path = ''",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(empty, 2);

    // Consoles pick up the bookkeeping column too.
    let consoles = table_columns(&conn, "CONSOLAS").unwrap();
    assert!(consoles.iter().any(|c| c == "catalog_count"));

    // Second pass changes nothing.
    let versions = version_rows(&conn);
    ensure_schema(&conn).unwrap();
    assert_eq!(table_columns(&conn, "JUEGOS_CONSOLAS").unwrap(), columns);
    assert_eq!(version_rows(&conn), versions);
}

#[test]
fn legacy_route_column_fails_without_touching_store() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE JUEGOS (id INTEGER PRIMARY KEY, name TEXT, Route TEXT);",
    )
    .unwrap();

    let err = ensure_schema(&conn).unwrap_err();
    match err {
        SchemaError::DriftUnresolvable { table, column } => {
            assert_eq!(table, "JUEGOS");
            assert_eq!(column, "Route");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(table_columns(&conn, "EMPRESAS").unwrap().is_empty());
    assert!(table_columns(&conn, "schema_version").unwrap().is_empty());
    assert_eq!(table_columns(&conn, "JUEGOS").unwrap().len(), 3);
}

#[test]
fn newer_schema_version_is_rejected() {
    let conn = open_memory().unwrap();
    conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
        .unwrap();
    assert!(matches!(
        ensure_schema(&conn),
        Err(SchemaError::VersionMismatch { found: 99, .. })
    ));
}

#[test]
fn primary_keys_are_introspected_in_order() {
    let conn = open_memory().unwrap();
    assert_eq!(
        schema::primary_key_columns(&conn, "JUEGOS_CONSOLAS").unwrap(),
        vec!["game_id", "console_id"]
    );
    assert_eq!(
        schema::primary_key_columns(&conn, "EMPRESAS").unwrap(),
        vec!["id"]
    );
}

#[test]
fn open_database_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute("INSERT INTO EMPRESAS (name) VALUES ('Nintendo')", [])
            .unwrap();
    }
    assert!(path.exists());

    let conn = open_database(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM EMPRESAS", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_database_reports_bad_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("catalog.db");
    assert!(matches!(
        open_database(&path),
        Err(SchemaError::Open { .. })
    ));
}
