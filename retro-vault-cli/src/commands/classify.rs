use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use retro_vault_catalog::matching_rule;
use retro_vault_catalog::UNKNOWN_MANUFACTURER;

use super::Output;
use crate::CliError;

#[derive(Serialize)]
struct Classification<'a> {
    name: &'a str,
    manufacturer: &'static str,
    family: Option<String>,
}

/// Entry point for `classify <name>...`.
pub(crate) fn run_classify(names: &[String], out: Output) -> Result<(), CliError> {
    let results: Vec<Classification<'_>> = names
        .iter()
        .map(|name| {
            let rule = matching_rule(name);
            Classification {
                name,
                manufacturer: rule.map_or(UNKNOWN_MANUFACTURER, |r| r.manufacturer),
                family: rule.map(|r| format!("{:?}", r.family)),
            }
        })
        .collect();
    if out.json(&results)? {
        return Ok(());
    }

    for result in &results {
        let family = result
            .family
            .as_deref()
            .map(|f| format!(" ({})", f))
            .unwrap_or_default();
        log::info!(
            "{:<30} {}{}",
            result.name,
            result.manufacturer.if_supports_color(Stdout, |t| t.bold()),
            family,
        );
    }
    Ok(())
}
