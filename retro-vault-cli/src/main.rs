//! retro-vault CLI
//!
//! Command-line interface for the retro game catalog: schema setup and
//! merging, listings, search, cloud path registration, and accounts.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;

use clap::Parser;
use retro_vault_catalog::Visibility;

use cli_types::{Cli, Commands};
use commands::Output;
use settings::{Overrides, Settings};

pub(crate) use error::CliError;

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logging(quiet: bool, verbose: bool, json: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    // JSON goes to stdout, so keep log lines out of its way.
    builder.target(if json {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    });
    if !verbose {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose, cli.json);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings: Settings = settings::resolve(Overrides {
        database: cli.db,
        cloud_root: cli.cloud_root,
    })?;
    log::debug!("Using settings: {:?}", settings);
    let out = Output { json: cli.json };
    let visibility = |all: bool| Visibility::from_published_only(!all);

    match cli.command {
        Commands::Init => commands::catalog::run_init(&settings, out),
        Commands::Merge { path } => commands::catalog::run_merge(&settings, &path, out),
        Commands::Stats => commands::catalog::run_stats(&settings, out),
        Commands::Companies { visibility: v } => {
            commands::catalog::run_companies(&settings, visibility(v.all), out)
        }
        Commands::Consoles {
            company,
            visibility: v,
        } => commands::catalog::run_consoles(&settings, company, visibility(v.all), out),
        Commands::Games {
            console,
            visibility: v,
        } => commands::catalog::run_games(&settings, console, visibility(v.all), out),
        Commands::Search {
            term,
            scope,
            visibility: v,
        } => commands::search::run_search(&settings, &term, scope, visibility(v.all), out),
        Commands::Register { game, console } => {
            commands::register::run_register(&settings, game, console, out)
        }
        Commands::Classify { names } => commands::classify::run_classify(&names, out),
        Commands::AddPlatform {
            id,
            name,
            catalog_count,
        } => commands::ingest::run_add_platform(&settings, id, &name, catalog_count, out),
        Commands::AddGame {
            id,
            name,
            consoles,
            release_date,
            description,
            publishers,
        } => commands::ingest::run_add_game(
            &settings,
            commands::ingest::NewGame {
                id,
                name,
                consoles,
                release_date,
                description,
                publishers,
            },
            out,
        ),
        Commands::Roles => commands::accounts::run_roles(&settings, out),
        Commands::AddRole { name } => commands::accounts::run_add_role(&settings, &name, out),
        Commands::Users { role } => commands::accounts::run_users(&settings, &role, out),
        Commands::AddUser {
            name,
            role,
            password,
        } => commands::accounts::run_add_user(&settings, &name, &role, password, out),
        Commands::Login { name, password } => {
            commands::accounts::run_login(&settings, &name, password, out)
        }
    }
}
