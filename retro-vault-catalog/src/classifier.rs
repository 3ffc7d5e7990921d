//! Manufacturer classification for free-text platform names.
//!
//! Upstream catalogs name platforms inconsistently ("SNES", "Super Nintendo
//! Entertainment System", "PS4", "macOS", ...). [`classify`] maps any of
//! them to the manufacturer used for the company row.
//!
//! The rules are evaluated top to bottom and the first match wins, so the
//! order of [`RULES`] is significant: specific names ("Neo Geo Pocket",
//! "Game Gear") sit above the broad brand patterns that would otherwise
//! claim them.
//!
//! ```
//! use retro_vault_catalog::classifier::classify;
//!
//! assert_eq!(classify("Super Nintendo Entertainment System"), "Nintendo");
//! assert_eq!(classify("Neo Geo Pocket Color"), "SNK");
//! assert_eq!(classify("Vectrex"), "Unknown");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Manufacturer returned for names that no rule recognizes.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Broad family a rule belongs to. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Console,
    DesktopOs,
    MobileOs,
    Vr,
    Web,
    Pc,
}

/// A single test against the normalized (trimmed, lowercased) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The whole name equals this string.
    Exact(&'static str),
    /// The name contains this substring.
    Contains(&'static str),
    /// The name matches this regular expression.
    Pattern(&'static str),
    /// The name contains every one of these substrings.
    AllOf(&'static [&'static str]),
}

/// A rule matches when any of its matchers does.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub manufacturer: &'static str,
    pub family: PlatformFamily,
    pub matchers: &'static [Matcher],
}

use self::Matcher::{AllOf, Contains, Exact, Pattern};
use self::PlatformFamily::{Console, DesktopOs, MobileOs, Pc, Vr, Web};

/// The ordered rule list.
pub static RULES: &[Rule] = &[
    // Names that the broad brand rules below would misclassify or miss.
    rule("SNK", Console, &[Contains("neo geo")]),
    rule("Sony", Console, &[Exact("psp"), Exact("playstation portable")]),
    rule("Sony", Console, &[Exact("ps vita"), Exact("playstation vita")]),
    rule("Apple", DesktopOs, &[Contains("apple ii")]),
    rule(
        "Nintendo",
        Console,
        &[Exact("nes"), Contains("nintendo entertainment system")],
    ),
    rule("Apple", DesktopOs, &[Contains("macintosh")]),
    rule("SEGA", Console, &[Contains("game gear")]),
    rule("Nintendo", Console, &[Exact("snes"), Contains("super nintendo")]),
    rule("Nintendo", Console, &[Contains("gamecube")]),
    rule("The 3DO Company", Console, &[Contains("3do")]),
    rule("Atari", Console, &[Contains("jaguar")]),
    rule("Commodore", Console, &[Contains("commodore"), Contains("amiga")]),
    rule(
        "SEGA",
        Console,
        &[Exact("genesis"), Contains("sega genesis"), Contains("mega drive")],
    ),
    rule("Web", Web, &[Exact("web"), Contains("browser")]),
    // Dedicated consoles and handhelds.
    rule(
        "Nintendo",
        Console,
        &[Pattern(r"\bnintendo\b"), Contains("game boy"), Contains("wii")],
    ),
    rule("Sony", Console, &[Contains("playstation"), Pattern(r"^ps[0-9]")]),
    rule("Microsoft", Console, &[Contains("xbox")]),
    rule(
        "SEGA",
        Console,
        &[Pattern(r"\bsega\b"), Contains("dreamcast"), Contains("megadrive")],
    ),
    rule("Atari", Console, &[Contains("atari")]),
    rule(
        "Valve",
        Console,
        &[Contains("steam deck"), AllOf(&["steam", "deck"])],
    ),
    rule(
        "Meta",
        Vr,
        &[Contains("oculus"), Contains("quest"), Contains("rift")],
    ),
    // Desktop operating systems.
    rule(
        "Microsoft",
        DesktopOs,
        &[Contains("windows"), Contains("win32"), Contains("win64")],
    ),
    rule(
        "Apple",
        DesktopOs,
        &[Pattern(r"\bmac\s?os\b"), Contains("os x"), Contains("macos")],
    ),
    rule(
        "Linux",
        DesktopOs,
        &[
            Pattern(r"\blinux\b"),
            Contains("ubuntu"),
            Contains("debian"),
            Contains("fedora"),
            Contains("arch linux"),
            Contains("centos"),
            Contains("red hat"),
        ],
    ),
    rule("Google", DesktopOs, &[Contains("chrome os"), Contains("chromebook")]),
    // Mobile and embedded operating systems.
    rule("Google", MobileOs, &[Contains("android")]),
    rule(
        "Apple",
        MobileOs,
        &[
            Pattern(r"\bios\b"),
            Contains("ipados"),
            Contains("tvos"),
            Contains("watchos"),
        ],
    ),
    rule("Amazon", MobileOs, &[Contains("fire os")]),
    rule("Jolla", MobileOs, &[Contains("sailfish")]),
    rule("Samsung", MobileOs, &[Contains("tizen")]),
    rule("LG", MobileOs, &[Contains("webos")]),
    rule("BlackBerry", MobileOs, &[Contains("blackberry")]),
    rule("Raspberry Pi Foundation", MobileOs, &[Contains("raspberry pi")]),
    rule("PC", Pc, &[Exact("pc")]),
];

const fn rule(
    manufacturer: &'static str,
    family: PlatformFamily,
    matchers: &'static [Matcher],
) -> Rule {
    Rule {
        manufacturer,
        family,
        matchers,
    }
}

/// Compiled regexes for every `Pattern` matcher in [`RULES`], keyed by source.
static PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    RULES
        .iter()
        .flat_map(|r| r.matchers.iter())
        .filter_map(|m| match m {
            Pattern(src) => Some((*src, Regex::new(src).expect("built-in classifier pattern"))),
            _ => None,
        })
        .collect()
});

impl Matcher {
    /// Test an already-normalized name.
    fn matches(&self, normalized: &str) -> bool {
        match self {
            Exact(s) => normalized == *s,
            Contains(s) => normalized.contains(s),
            Pattern(src) => PATTERNS
                .get(src)
                .is_some_and(|re| re.is_match(normalized)),
            AllOf(parts) => parts.iter().all(|p| normalized.contains(p)),
        }
    }
}

impl Rule {
    /// Whether any matcher of this rule accepts the name.
    pub fn matches(&self, platform_name: &str) -> bool {
        let normalized = normalize(platform_name);
        self.matchers.iter().any(|m| m.matches(&normalized))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Return the first rule that accepts `platform_name`, if any.
pub fn matching_rule(platform_name: &str) -> Option<&'static Rule> {
    let normalized = normalize(platform_name);
    RULES
        .iter()
        .find(|r| r.matchers.iter().any(|m| m.matches(&normalized)))
}

/// Map a platform name to its manufacturer.
///
/// Never fails: unrecognized names yield [`UNKNOWN_MANUFACTURER`].
pub fn classify(platform_name: &str) -> &'static str {
    matching_rule(platform_name)
        .map(|r| r.manufacturer)
        .unwrap_or(UNKNOWN_MANUFACTURER)
}

/// The classification rules in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES
}
