use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://api.spoonacular.com/recipes";

const API_KEY_ENV: &str = "LARDER_API_KEY";
const API_BASE_ENV: &str = "LARDER_API_BASE";

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "larder").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = db_override.unwrap_or_else(|| data_dir.join("larder.db"));

        Ok(Config { db_path, data_dir })
    }

    /// Provider API key from `LARDER_API_KEY`, falling back to the `api_key`
    /// file in the data directory.
    pub fn api_key(&self) -> Result<String> {
        let env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(env.as_deref(), &self.data_dir)
    }

    pub fn api_base(&self) -> String {
        std::env::var(API_BASE_ENV)
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }
}

fn resolve_api_key(env: Option<&str>, data_dir: &Path) -> Result<String> {
    if let Some(key) = env.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    let path = data_dir.join("api_key");
    if path.exists() {
        let key = std::fs::read_to_string(&path).context("Failed to read API key file")?;
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    bail!(
        "No recipe API key configured. Set {API_KEY_ENV} or write the key to {}",
        path.display()
    )
}
