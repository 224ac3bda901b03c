use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV exports to load, in order. A missing file is skipped with a
    /// warning; the service only refuses to start when nothing loads.
    pub data_files: Vec<PathBuf>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Every key has a default; `WEB_PORT` must parse if set.
    pub fn from_env() -> Self {
        let data_files = env::var("DATA_FILES")
            .unwrap_or_else(|_| "data/lsd_outbreaks_2025.csv".to_string())
            .split(',')
            .map(|p| PathBuf::from(p.trim()))
            .filter(|p| !p.as_os_str().is_empty())
            .collect();

        Self {
            data_files,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}
