use retro_vault_catalog::classifier::{
    classify, matching_rule, rules, PlatformFamily, RULES, UNKNOWN_MANUFACTURER,
};

#[test]
fn classic_consoles() {
    assert_eq!(classify("NES"), "Nintendo");
    assert_eq!(classify("SNES"), "Nintendo");
    assert_eq!(classify("Nintendo 64"), "Nintendo");
    assert_eq!(classify("Game Boy Advance"), "Nintendo");
    assert_eq!(classify("Wii U"), "Nintendo");
    assert_eq!(classify("GameCube"), "Nintendo");
    assert_eq!(classify("PlayStation 2"), "Sony");
    assert_eq!(classify("PS4"), "Sony");
    assert_eq!(classify("PSP"), "Sony");
    assert_eq!(classify("PS Vita"), "Sony");
    assert_eq!(classify("Xbox Series S/X"), "Microsoft");
    assert_eq!(classify("Dreamcast"), "SEGA");
    assert_eq!(classify("Genesis"), "SEGA");
    assert_eq!(classify("SEGA Saturn"), "SEGA");
    assert_eq!(classify("Atari 2600"), "Atari");
    assert_eq!(classify("Jaguar"), "Atari");
    assert_eq!(classify("3DO"), "The 3DO Company");
    assert_eq!(classify("Commodore / Amiga"), "Commodore");
}

#[test]
fn specific_names_win_over_brand_rules() {
    // "Neo Geo Pocket" is a handheld, but not a Nintendo or generic one.
    assert_eq!(classify("Neo Geo Pocket"), "SNK");
    assert_eq!(classify("Neo Geo Pocket Color"), "SNK");
    // Game Gear sits above the generic "game boy"/SEGA rules.
    assert_eq!(classify("Game Gear"), "SEGA");
    // PSP is matched by its exact-name rule, not the broad PlayStation one.
    let psp = matching_rule("PSP").unwrap();
    let broad = matching_rule("PlayStation 3").unwrap();
    assert_eq!(psp.manufacturer, broad.manufacturer);
    assert!(!std::ptr::eq(psp, broad));
    assert!(!psp.matches("PlayStation 3"));
}

#[test]
fn mac_variants_are_distinguished_by_rule() {
    let classic = matching_rule("Classic Macintosh").unwrap();
    let modern = matching_rule("macOS").unwrap();
    assert_eq!(classic.manufacturer, "Apple");
    assert_eq!(modern.manufacturer, "Apple");
    assert!(!std::ptr::eq(classic, modern));
    assert_eq!(classify("Mac OS"), "Apple");
    assert_eq!(classify("OS X"), "Apple");
}

#[test]
fn operating_systems() {
    assert_eq!(classify("PC"), "PC");
    assert_eq!(classify("Windows 95"), "Microsoft");
    assert_eq!(classify("Linux"), "Linux");
    assert_eq!(classify("Ubuntu"), "Linux");
    assert_eq!(classify("Chrome OS"), "Google");
    assert_eq!(classify("Android"), "Google");
    assert_eq!(classify("iOS"), "Apple");
    assert_eq!(classify("iPadOS"), "Apple");
    assert_eq!(classify("Fire OS"), "Amazon");
    assert_eq!(classify("Sailfish OS"), "Jolla");
    assert_eq!(classify("Tizen"), "Samsung");
    assert_eq!(classify("webOS"), "LG");
    assert_eq!(classify("BlackBerry"), "BlackBerry");
    assert_eq!(classify("Raspberry Pi"), "Raspberry Pi Foundation");
    assert_eq!(classify("Web"), "Web");
}

#[test]
fn vr_and_handheld_pcs() {
    assert_eq!(classify("Oculus Quest"), "Meta");
    assert_eq!(classify("Meta Quest 3"), "Meta");
    assert_eq!(classify("Steam Deck"), "Valve");
    assert_eq!(matching_rule("Oculus Rift").unwrap().family, PlatformFamily::Vr);
}

#[test]
fn word_boundaries_are_respected() {
    // "ios" inside another word must not classify as Apple.
    assert_eq!(classify("Studios Arcade"), UNKNOWN_MANUFACTURER);
    // "ps" followed by a digit only counts at the start of the name.
    assert_eq!(classify("Zaps2"), UNKNOWN_MANUFACTURER);
}

#[test]
fn case_and_whitespace_insensitive() {
    assert_eq!(classify("  playstation 5  "), "Sony");
    assert_eq!(classify("NINTENDO SWITCH"), "Nintendo");
    assert_eq!(classify("pc"), classify("PC"));
}

#[test]
fn unknown_names_default() {
    assert_eq!(classify("Vectrex"), UNKNOWN_MANUFACTURER);
    assert_eq!(classify(""), UNKNOWN_MANUFACTURER);
    assert_eq!(classify("   "), UNKNOWN_MANUFACTURER);
}

#[test]
fn deterministic() {
    for name in ["NES", "Neo Geo", "Linux", "Vectrex", "PS5", "macOS"] {
        assert_eq!(classify(name), classify(name));
    }
}

#[test]
fn every_rule_has_matchers() {
    assert!(!RULES.is_empty());
    assert_eq!(rules().len(), RULES.len());
    for rule in RULES {
        assert!(!rule.matchers.is_empty(), "{} has no matchers", rule.manufacturer);
        assert_ne!(rule.manufacturer, UNKNOWN_MANUFACTURER);
    }
}
