use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Runtime configuration. Values come from defaults, then `.env` in the
/// working directory, then the process environment; components receive them
/// injected rather than reading globals themselves.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub staging_dir: PathBuf,
    pub store_root: PathBuf,
    pub public_base_url: String,
    pub filename_prefix: String,
    pub page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("barback.db"),
            staging_dir: std::env::temp_dir(),
            store_root: PathBuf::from("images"),
            public_base_url: "http://localhost:8080/images".to_string(),
            filename_prefix: "cocktail".to_string(),
            page_size: 12,
        }
    }
}

const ENV_KEYS: [&str; 6] = [
    "BARBACK_DB_PATH",
    "BARBACK_STAGING_DIR",
    "BARBACK_STORE_ROOT",
    "BARBACK_PUBLIC_BASE_URL",
    "BARBACK_FILENAME_PREFIX",
    "BARBACK_PAGE_SIZE",
];

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let env_path = Path::new(".env");
        if env_path.exists() {
            config
                .apply_env_file(env_path)
                .with_context(|| format!("Failed to read {}", env_path.display()))?;
            info!("Loaded configuration from .env");
        }

        config.apply_process_env();
        Ok(config)
    }

    fn apply_env_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            if let Some((key, value)) = line.split_once('=') {
                self.apply(key.trim(), value.trim());
            }
        }
        Ok(())
    }

    fn apply_process_env(&mut self) {
        for key in ENV_KEYS {
            if let Ok(value) = std::env::var(key) {
                self.apply(key, &value);
            }
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "BARBACK_DB_PATH" => self.db_path = PathBuf::from(value),
            "BARBACK_STAGING_DIR" => self.staging_dir = PathBuf::from(value),
            "BARBACK_STORE_ROOT" => self.store_root = PathBuf::from(value),
            "BARBACK_PUBLIC_BASE_URL" => self.public_base_url = value.to_string(),
            "BARBACK_FILENAME_PREFIX" => self.filename_prefix = value.to_string(),
            "BARBACK_PAGE_SIZE" => {
                if let Ok(size) = value.parse() {
                    self.page_size = size;
                }
            }
            _ => {}
        }
    }
}
