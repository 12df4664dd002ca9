//! Configuration loading and validation.
//!
//! Configuration is layered with [`figment`], later sources overriding
//! earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A configuration file, either given explicitly or discovered in the
//!    platform configuration directory (`config.toml`, `config.yaml`,
//!    `config.yml` or `config.json`).
//! 3. Environment variables prefixed with `WEBDIR_`, using `__` to reach
//!    nested keys (`WEBDIR_NETWORK__USER_AGENT=...`).

pub mod error;
mod models;

pub use crate::models::{Config, NetworkConfig, ProxyConfig};

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};
use tracing::instrument;

const ENV_PREFIX: &str = "WEBDIR_";
const DEFAULT_FILE_STEMS: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

/// Load configuration from defaults, a file, and the environment.
///
/// If `path` is `None` the platform configuration directory is searched; a
/// missing file is not an error in that case. An explicit `path` that does
/// not exist is.
#[instrument]
pub fn load(path: Option<&Path>) -> Result<Config> {
    let file = match path {
        Some(path) if !path.exists() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Some(path) => Some(path.to_path_buf()),
        None => discover(),
    };
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(file) = &file {
        tracing::debug!(path = %file.display(), "Loading configuration file");
        figment = merge_file(figment, file)?;
    }
    from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Extract and validate a [`Config`] from an already-assembled [`Figment`].
pub fn from_figment(figment: Figment) -> Result<Config> {
    let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
    config.validate()?;
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

fn discover() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "webdir")?;
    DEFAULT_FILE_STEMS.iter().map(|name| dirs.config_dir().join(name)).find(|candidate| candidate.is_file())
}
