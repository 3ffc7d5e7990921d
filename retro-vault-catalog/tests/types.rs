use retro_vault_catalog::*;

#[test]
fn scope_parses_case_insensitively() {
    assert_eq!("games".parse::<SearchScope>().unwrap(), SearchScope::Games);
    assert_eq!("ALL".parse::<SearchScope>().unwrap(), SearchScope::All);
    assert_eq!(" Consoles ".parse::<SearchScope>().unwrap(), SearchScope::Consoles);
    assert!("platforms".parse::<SearchScope>().is_err());
}

#[test]
fn scope_coverage() {
    assert!(SearchScope::All.includes_companies());
    assert!(SearchScope::All.includes_games());
    assert!(SearchScope::Games.includes_games());
    assert!(!SearchScope::Games.includes_consoles());
    assert!(!SearchScope::Companies.includes_games());
}

#[test]
fn register_result_shape() {
    let registered = RegisterResult::Registered {
        path: "/cloud/Nintendo/NES/Zelda.zip".to_string(),
    };
    assert_eq!(registered.path(), Some("/cloud/Nintendo/NES/Zelda.zip"));
    assert_eq!(RegisterResult::NotFound.path(), None);

    let json = serde_json::to_value(&registered).unwrap();
    assert_eq!(json["status"], "registered");
    assert_eq!(json["path"], "/cloud/Nintendo/NES/Zelda.zip");
    let json = serde_json::to_value(RegisterResult::NotFound).unwrap();
    assert_eq!(json["status"], "not_found");
}

#[test]
fn link_publication_state() {
    let mut link = GameConsoleLink {
        game_id: 1,
        console_id: 2,
        cloud_path: String::new(),
    };
    assert!(!link.is_published());
    link.cloud_path = "/Nintendo/NES/Zelda.zip".to_string();
    assert!(link.is_published());
}

#[test]
fn unpublished_game_rows_omit_cloud_path() {
    let row = GameRow {
        id: 1,
        name: "Zelda".to_string(),
        release_date: None,
        cloud_path: None,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert!(json.get("cloud_path").is_none());
}
