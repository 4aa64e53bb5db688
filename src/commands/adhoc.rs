//! Ad-hoc single-call mode: one REST call per invocation, result printed.

use crate::cli::{
    Cli, GroupAction, InstanceAction, LicenseAction, PermissionAction, RepositoryAction,
    UserAction,
};
use crate::client::{ArtifactoryApi, ArtifactoryClient};
use crate::config::{Payload, identifier_from_path};
use crate::resolve::expand_base_url;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default username for ad-hoc calls when none is given.
const DEFAULT_USERNAME: &str = "admin";

/// Build a client from the global connection flags, prompting for the
/// password when it was not supplied.
pub fn client(cli: &Cli) -> Result<ArtifactoryClient> {
    let Some(server) = cli.server.as_deref() else {
        bail!("--server is required (target server or base Artifactory URL)");
    };
    let (base_url, _) = expand_base_url(server, None);
    let username = cli.username.as_deref().unwrap_or(DEFAULT_USERNAME);
    let password = match cli.password.as_deref() {
        Some(password) => password.to_string(),
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for Artifactory user {username}"))
            .interact()
            .context("password prompt failed")?,
    };
    Ok(ArtifactoryClient::with_credentials(
        &base_url, username, &password,
    ))
}

pub fn artifactory(cli: &Cli, action: &InstanceAction) -> Result<()> {
    let api = client(cli)?;
    let text = match action {
        InstanceAction::Health => api.system_health()?,
        InstanceAction::Information => api.system_information()?,
        InstanceAction::Configuration => api.system_configuration()?,
    };
    println!("{text}");
    Ok(())
}

pub fn license(cli: &Cli, action: &LicenseAction) -> Result<()> {
    let api = client(cli)?;
    match action {
        LicenseAction::Information => print_json(&api.license_information()?),
        LicenseAction::Install { key_file } => {
            let (_, payload) = file_payload(key_file)?;
            print_json(&api.license_install(&payload)?);
        }
    }
    Ok(())
}

pub fn users(cli: &Cli, action: &UserAction) -> Result<()> {
    let api = client(cli)?;
    match action {
        UserAction::List => print_json(&api.user_list()?),
        UserAction::Detail { name } => print_json(&api.user_detail(name)?),
        UserAction::Create { user_file } => {
            let (name, payload) = file_payload(user_file)?;
            print_status(api.user_create(&name, &payload)?);
        }
        UserAction::Update { user_file } => {
            let (name, payload) = file_payload(user_file)?;
            print_status(api.user_update(&name, &payload)?);
        }
        UserAction::Delete { name } => print_status(api.user_delete(name)?),
    }
    Ok(())
}

pub fn groups(cli: &Cli, action: &GroupAction) -> Result<()> {
    let api = client(cli)?;
    match action {
        GroupAction::List => print_json(&api.group_list()?),
        GroupAction::Detail { name } => print_json(&api.group_detail(name)?),
        GroupAction::Create { group_file } => {
            let (name, payload) = file_payload(group_file)?;
            print_status(api.group_create(&name, &payload)?);
        }
        GroupAction::Update { group_file } => {
            let (name, payload) = file_payload(group_file)?;
            print_status(api.group_update(&name, &payload)?);
        }
        GroupAction::Delete { name } => print_status(api.group_delete(name)?),
    }
    Ok(())
}

pub fn repositories(cli: &Cli, action: &RepositoryAction) -> Result<()> {
    let api = client(cli)?;
    match action {
        RepositoryAction::List { repo_type } => {
            print_json(&api.repository_list(repo_type.as_deref())?);
        }
        RepositoryAction::Detail { key } => print_json(&api.repository_detail(key)?),
        RepositoryAction::Create { repository_file } => {
            let (key, payload) = file_payload(repository_file)?;
            print_status(api.repository_create(&key, &payload)?);
        }
        RepositoryAction::Update { repository_file } => {
            let (key, payload) = file_payload(repository_file)?;
            print_status(api.repository_update(&key, &payload)?);
        }
        RepositoryAction::Delete { key } => print_status(api.repository_delete(key)?),
    }
    Ok(())
}

pub fn permissions(cli: &Cli, action: &PermissionAction) -> Result<()> {
    let api = client(cli)?;
    match action {
        PermissionAction::List => print_json(&api.permission_list()?),
        PermissionAction::Detail { name } => print_json(&api.permission_detail(name)?),
        PermissionAction::Create { permission_file } => {
            let (name, payload) = file_payload(permission_file)?;
            print_status(api.permission_create(&name, &payload)?);
        }
        PermissionAction::Delete { name } => print_status(api.permission_delete(name)?),
    }
    Ok(())
}

/// Read a payload file; the identifier is the file's base name minus
/// extension.
fn file_payload(path: &Path) -> Result<(String, Payload)> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read payload file {}", path.display()))?;
    Ok((identifier_from_path(path), Payload::Raw(data)))
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{value}"),
    }
}

fn print_status(code: u16) {
    println!("HTTP {code}");
}
