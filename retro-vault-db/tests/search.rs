use retro_vault_catalog::types::*;
use retro_vault_db::*;

fn add_game(conn: &rusqlite::Connection, id: i64, name: &str, console_id: i64) {
    insert_game(
        conn,
        &Game {
            id,
            name: name.to_string(),
            release_date: Some("1990".to_string()),
            description: None,
            publishers: String::new(),
        },
    )
    .unwrap();
    link_game(conn, id, console_id).unwrap();
}

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    register_platform(&conn, 49, "NES").unwrap();
    register_platform(&conn, 79, "SNES").unwrap();
    register_platform(&conn, 29, "Genesis").unwrap();

    add_game(&conn, 1, "Super Mario Bros.", 49);
    add_game(&conn, 2, "Mario Kart", 79);
    add_game(&conn, 3, "100% Orange Juice", 29);
    add_game(&conn, 4, "Sonic the Hedgehog", 29);
    // Same title on a second console.
    link_game(&conn, 1, 79).unwrap();

    let registrar = Registrar::new("/cloud");
    registrar.register(&conn, 1, 49).unwrap();
    registrar.register(&conn, 1, 79).unwrap();
    conn
}

fn titles(results: &SearchResults) -> Vec<&str> {
    results.games.iter().map(|g| g.title.as_str()).collect()
}

#[test]
fn published_search_excludes_unarchived_games() {
    let conn = setup_db();
    let results = search(&conn, "mario", SearchScope::Games, true).unwrap();
    assert!(titles(&results).iter().all(|t| *t != "Mario Kart"));
    assert!(titles(&results).contains(&"Super Mario Bros."));
}

#[test]
fn unfiltered_search_finds_everything() {
    let conn = setup_db();
    let results = search(&conn, "MARIO", SearchScope::Games, false).unwrap();
    assert_eq!(
        titles(&results),
        vec!["Mario Kart", "Super Mario Bros.", "Super Mario Bros."]
    );
}

#[test]
fn game_hits_are_per_console() {
    let conn = setup_db();
    let results = search(&conn, "super mario", SearchScope::Games, true).unwrap();
    let consoles: Vec<i64> = results.games.iter().map(|g| g.console_id).collect();
    assert_eq!(consoles, vec![49, 79]);
    assert!(results.games.iter().all(|g| g.id == 1));
    assert_eq!(results.games[0].release_date.as_deref(), Some("1990"));
}

#[test]
fn scope_limits_kinds() {
    let conn = setup_db();
    let games_only = search(&conn, "n", SearchScope::Games, false).unwrap();
    assert!(games_only.companies.is_empty());
    assert!(games_only.consoles.is_empty());
    assert!(!games_only.games.is_empty());

    let companies = search(&conn, "nin", SearchScope::Companies, false).unwrap();
    assert_eq!(companies.companies.len(), 1);
    assert_eq!(companies.companies[0].name, "Nintendo");
    assert!(companies.games.is_empty());
}

#[test]
fn all_scope_searches_each_kind() {
    let conn = setup_db();
    let results = search(&conn, "es", SearchScope::All, false).unwrap();
    let consoles: Vec<&str> = results.consoles.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(consoles, vec!["Genesis", "NES", "SNES"]);
    assert!(results.companies.is_empty());
}

#[test]
fn published_consoles_and_companies() {
    let conn = setup_db();
    let results = search(&conn, "", SearchScope::All, true).unwrap();
    let consoles: Vec<&str> = results.consoles.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(consoles, vec!["NES", "SNES"]);
    let companies: Vec<&str> = results.companies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(companies, vec!["Nintendo"]);
}

#[test]
fn wildcards_are_literal() {
    let conn = setup_db();
    let percent = search(&conn, "100%", SearchScope::Games, false).unwrap();
    assert_eq!(titles(&percent), vec!["100% Orange Juice"]);

    let underscore = search(&conn, "_", SearchScope::All, false).unwrap();
    assert!(underscore.is_empty());
}

#[test]
fn no_match_is_empty_not_error() {
    let conn = setup_db();
    assert!(search(&conn, "zzz", SearchScope::All, false).unwrap().is_empty());
}

#[test]
fn non_ascii_terms_fold_case() {
    let conn = setup_db();
    add_game(&conn, 5, "Pokémon Red", 49);
    for term in ["POKÉMON", "pokémon", "Pokémon"] {
        let results = search(&conn, term, SearchScope::Games, false).unwrap();
        assert_eq!(titles(&results), vec!["Pokémon Red"], "{term}");
    }
}

#[test]
fn legacy_rows_with_null_fields_are_still_searchable() {
    let conn = setup_db();
    conn.execute_batch(
        "INSERT INTO CONSOLAS (id, name, company_id) VALUES (500, 'Vectrex', NULL);
         INSERT INTO JUEGOS (id, name) VALUES (600, NULL);",
    )
    .unwrap();

    let results = search(&conn, "vectrex", SearchScope::Consoles, false).unwrap();
    assert_eq!(results.consoles.len(), 1);
    assert_eq!(results.consoles[0].company_id, None);

    assert_eq!(find_game(&conn, 600).unwrap().unwrap().name, "");
    assert!(search(&conn, "", SearchScope::All, false).is_ok());
}
