use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_vault_db::AccountError;

use super::{Output, open_store, password_or_prompt};
use crate::CliError;
use crate::settings::Settings;

fn account_error(e: AccountError) -> CliError {
    match e {
        AccountError::RoleNotFound(role) => CliError::not_found(format!("role {}", role)),
        other => CliError::account(other.to_string()),
    }
}

/// Entry point for `roles`.
pub(crate) fn run_roles(settings: &Settings, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let roles =
        store.with_connection(|conn| retro_vault_db::list_roles(conn).map_err(account_error))?;
    if out.json(&roles)? {
        return Ok(());
    }

    log::info!("{}", "Roles".if_supports_color(Stdout, |t| t.bold()));
    if roles.is_empty() {
        log::info!("  (none)");
    }
    for role in &roles {
        log::info!("  {:>4}  {}", role.id, role.name);
    }
    Ok(())
}

/// Entry point for `add-role <name>`.
pub(crate) fn run_add_role(settings: &Settings, name: &str, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let id = store
        .with_connection(|conn| retro_vault_db::insert_role(conn, name).map_err(account_error))?;
    if !out.json(&serde_json::json!({ "id": id, "name": name }))? {
        log::info!("Role '{}' has id {}", name, id);
    }
    Ok(())
}

/// Entry point for `users <role>`.
pub(crate) fn run_users(settings: &Settings, role: &str, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let users = store
        .with_connection(|conn| retro_vault_db::users_by_role(conn, role).map_err(account_error))?;
    if out.json(&users)? {
        return Ok(());
    }

    log::info!(
        "{}",
        format!("Users with role {}", role).if_supports_color(Stdout, |t| t.bold())
    );
    if users.is_empty() {
        log::info!("  (none)");
    }
    for user in &users {
        log::info!("  {:>6}  {}", user.id, user.name);
    }
    Ok(())
}

/// Entry point for `add-user <name> --role <role>`.
pub(crate) fn run_add_user(
    settings: &Settings,
    name: &str,
    role: &str,
    password: Option<String>,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let password = password_or_prompt(password)?;
    if password.is_empty() {
        return Err(CliError::account("password must not be empty"));
    }

    let id = store.with_connection(|conn| {
        let role = retro_vault_db::find_role(conn, role)
            .map_err(account_error)?
            .ok_or_else(|| CliError::not_found(format!("role {}", role)))?;
        retro_vault_db::create_user(conn, name, &password, role.id).map_err(account_error)
    })?;

    if !out.json(&serde_json::json!({ "id": id, "name": name }))? {
        log::info!("Created user '{}' (id {})", name, id);
    }
    Ok(())
}

/// Entry point for `login <name>`.
pub(crate) fn run_login(
    settings: &Settings,
    name: &str,
    password: Option<String>,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let password = password_or_prompt(password)?;
    let session = store.with_connection(|conn| {
        retro_vault_db::verify_login(conn, name, &password).map_err(account_error)
    })?;
    let Some(session) = session else {
        return Err(CliError::account("invalid user name or password"));
    };

    if !out.json(&session)? {
        log::info!(
            "Logged in as {} (role {})",
            session.name.if_supports_color(Stdout, |t| t.bold()),
            session.role
        );
    }
    Ok(())
}
