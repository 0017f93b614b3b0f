// src/config/credentials.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
    symbols, ui,
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{fs, path::PathBuf};

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keeps the password out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("cannot determine the home directory")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("reading config file '{}' failed", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing config file '{}' failed", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("config file {:?} not found, writing defaults", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

pub fn save_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Ok(());
    }

    let config_path = get_config_path()?;
    let mut config = load_or_create_external_config()?;
    config.username = Some(username.to_string());

    let json_content = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, json_content)
        .with_context(|| format!("saving user name to '{}' failed", config_path.display()))?;

    info!("user name saved to {}", config_path.display());
    println!(
        "{} User name saved to: {}",
        *symbols::INFO,
        config_path.display()
    );
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Looks a credential up on the command line, then the environment, then the config file.
fn lookup(cli: Option<&str>, env_name: &str, file: Option<&str>) -> Option<(String, &'static str)> {
    if let Some(value) = non_empty(cli.map(str::to_string)) {
        return Some((value, "command line"));
    }
    if let Some(value) = non_empty(std::env::var(env_name).ok()) {
        return Some((value, "environment"));
    }
    non_empty(file.map(str::to_string)).map(|value| (value, "config file"))
}

/// Resolves login credentials, prompting on the terminal for anything still missing.
pub fn resolve_credentials(cli_username: Option<&str>) -> AppResult<Credentials> {
    let external = load_or_create_external_config().unwrap_or_else(|e| {
        debug!("config file unavailable while resolving credentials: {}", e);
        ExternalConfig::default_app_config()
    });

    let username = match lookup(cli_username, constants::env::USERNAME, external.username.as_deref()) {
        Some((value, source)) => {
            debug!("user name taken from {}", source);
            value
        }
        None => {
            let entered = ui::prompt("Moodle user name", None)?;
            if entered.is_empty() {
                return Err(AppError::UserInputError("a user name is required to log in".into()));
            }
            if ui::confirm("Save this user name for next time?", false)
                && let Err(e) = save_username(&entered)
            {
                log::error!("saving user name failed: {}", e);
                eprintln!("{} Could not save the user name: {}", *symbols::WARN, e);
            }
            entered
        }
    };

    let password = match lookup(None, constants::env::PASSWORD, external.password.as_deref()) {
        Some((value, source)) => {
            debug!("password taken from {}", source);
            value
        }
        None => ui::prompt_hidden(&format!("Password for '{}' (input hidden)", username))?,
    };
    if password.is_empty() {
        return Err(AppError::UserInputError("a password is required to log in".into()));
    }

    Ok(Credentials { username, password })
}
