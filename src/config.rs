//! Configuration and root folder resolution
//!
//! The root folder holds everything the service persists: the SQLite
//! database file and the uploads directory. Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "PROFILED_ROOT_FOLDER";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "profiled", about = "User profile record service")]
pub struct Cli {
    /// Root folder for the database and uploaded photos
    #[arg(long)]
    pub root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "PROFILED_PORT")]
    pub port: Option<u16>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub port: u16,
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, config file, defaults
    pub fn resolve(cli: &Cli) -> Self {
        let root_folder = cli
            .root_folder
            .clone()
            .or_else(|| std::env::var(ROOT_FOLDER_ENV).ok().map(PathBuf::from))
            .or_else(root_folder_from_config_file)
            .unwrap_or_else(default_root_folder);

        let port = cli.port.unwrap_or(DEFAULT_PORT);

        ServiceConfig { root_folder, port }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("profiled.db")
    }

    /// Directory uploaded profile photos are stored in
    pub fn uploads_dir(&self) -> PathBuf {
        self.root_folder.join("uploads")
    }

    /// Create the root and uploads directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder).with_context(|| {
            format!("Failed to create root folder {}", self.root_folder.display())
        })?;
        std::fs::create_dir_all(self.uploads_dir()).with_context(|| {
            format!("Failed to create uploads dir {}", self.uploads_dir().display())
        })?;
        info!("Root folder: {}", self.root_folder.display());
        Ok(())
    }
}

/// Read `root_folder` from the platform config file, if one exists
fn root_folder_from_config_file() -> Option<PathBuf> {
    let config_path = dirs::config_dir()?.join("profiled").join("config.toml");
    let content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&content).ok()?;
    config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("profiled"))
        .unwrap_or_else(|| PathBuf::from("./profiled_data"))
}
