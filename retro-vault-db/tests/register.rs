use retro_vault_catalog::types::*;
use retro_vault_db::*;

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    register_platform(&conn, 49, "NES").unwrap();
    insert_game(
        &conn,
        &Game {
            id: 1,
            name: "Zelda ".to_string(),
            release_date: None,
            description: None,
            publishers: String::new(),
        },
    )
    .unwrap();
    link_game(&conn, 1, 49).unwrap();
    conn
}

#[test]
fn registration_is_deterministic() {
    let conn = setup_db();
    let registrar = Registrar::new("/cloud");
    let expected = RegisterResult::Registered {
        path: "/cloud/Nintendo/NES/Zelda.zip".to_string(),
    };
    assert_eq!(registrar.register(&conn, 1, 49).unwrap(), expected);
    assert_eq!(registrar.register(&conn, 1, 49).unwrap(), expected);
    assert_eq!(
        find_link(&conn, 1, 49).unwrap().unwrap().cloud_path,
        "/cloud/Nintendo/NES/Zelda.zip"
    );
}

#[test]
fn missing_link_is_not_found() {
    let conn = setup_db();
    let registrar = Registrar::new("/cloud");
    assert_eq!(
        registrar.register(&conn, 999, 999).unwrap(),
        RegisterResult::NotFound
    );
    // Both rows exist but are not linked.
    register_platform(&conn, 79, "SNES").unwrap();
    assert_eq!(
        registrar.register(&conn, 1, 79).unwrap(),
        RegisterResult::NotFound
    );
}

#[test]
fn empty_root_yields_rooted_path() {
    let conn = setup_db();
    let result = Registrar::default().register(&conn, 1, 49).unwrap();
    assert_eq!(result.path(), Some("/Nintendo/NES/Zelda.zip"));
}

#[test]
fn reregistering_overwrites_previous_path() {
    let conn = setup_db();
    Registrar::new("/old").register(&conn, 1, 49).unwrap();
    Registrar::new("/new").register(&conn, 1, 49).unwrap();
    assert_eq!(
        find_link(&conn, 1, 49).unwrap().unwrap().cloud_path,
        "/new/Nintendo/NES/Zelda.zip"
    );
}

#[test]
fn registration_publishes_the_game() {
    let conn = setup_db();
    assert!(games_for_console(&conn, 49, Visibility::Published)
        .unwrap()
        .is_empty());
    Registrar::new("/cloud").register(&conn, 1, 49).unwrap();
    assert_eq!(
        games_for_console(&conn, 49, Visibility::Published)
            .unwrap()
            .len(),
        1
    );
}
