use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lingua_config::Config;
use serde::{Deserialize, Serialize};

pub const MAIN_PROFILE: &str = "main";

/// `--config-dir`, else `LINGUA_CONFIG_DIR`, else `./profiles`
pub fn profiles_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir
        .or_else(|| env::var_os("LINGUA_CONFIG_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("profiles"))
}

fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("parsing profile {}", path.display()))?;
    Ok(profile.value)
}

/// Create the profiles folder and a main profile from env defaults if missing
pub fn init_user_config(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    let main_profile = profile_path(dir, MAIN_PROFILE);
    if !main_profile.exists() {
        save_user_profile(dir, MAIN_PROFILE, &Config::new())?;
        tracing::info!("[PROFILE] Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, falling back to main, then to env defaults
pub fn load_user_profile(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profile_path(dir, name);
    if profile_file.exists() {
        tracing::info!("[PROFILE] Loading {}", profile_file.display());
        return read_profile(&profile_file);
    }

    tracing::warn!("[PROFILE] Profile {name} not found, falling back to main profile or defaults");
    let main_file = profile_path(dir, MAIN_PROFILE);
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::new())
    }
}

pub fn save_user_profile(dir: &Path, name: &str, config: &Config) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let profile = Profile {
        name: name.into(),
        value: config.clone(),
    };
    let file = profile_path(dir, name);
    fs::write(&file, serde_json::to_string_pretty(&profile)?)?;
    tracing::debug!("[PROFILE] Saved {}", file.display());
    Ok(file)
}
