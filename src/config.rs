use crate::cli::{Cli, RepairKind, ThemeMode};
use crate::error::MdtailError;
use crate::repair::RepairOptions;
use anyhow::Result;
use clap::{ArgMatches, parser::ValueSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_ENV: &str = "MDTAIL_CONFIG_PATH";
const NO_COLOR_ENV: &str = "MDTAIL_NO_COLOR";

const DEFAULT_CHUNK_SIZE: usize = 32;
const DEFAULT_DELAY_MS: u64 = 15;

fn arg_has_user_value(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .map(|source| matches!(source, ValueSource::CommandLine | ValueSource::EnvVariable))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Display options
    pub no_colors: bool,
    pub cols: Option<usize>,
    #[serde(skip)]
    pub cols_from_cli: bool,
    pub theme: ThemeMode,

    // Output modes
    pub raw: bool,
    pub no_stream: bool,

    // Replay pacing
    pub chunk_size: usize,
    pub delay_ms: u64,

    pub repairs: RepairOptions,

    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_colors: false,
            cols: None,
            cols_from_cli: false,
            theme: ThemeMode::Auto,
            raw: false,
            no_stream: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
            repairs: RepairOptions::default(),
            config_file: None,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli, matches: &ArgMatches) -> Result<Self> {
        let mut config = Self::load_config_files(cli, matches)?;

        if let Some(no_colors) = mdtail_no_color_override() {
            config.no_colors = no_colors;
        }

        if cli.no_colors {
            config.no_colors = true;
        }

        if let Some(cols) = cli.cols {
            if arg_has_user_value(matches, "cols") {
                config.cols = Some(cols);
                config.cols_from_cli = true;
            }
        }

        if let Some(theme) = cli.theme {
            if arg_has_user_value(matches, "theme") {
                config.theme = theme;
            }
        }

        if cli.raw {
            config.raw = true;
        }

        if cli.no_stream {
            config.no_stream = true;
        }

        if let Some(chunk_size) = cli.chunk_size {
            if arg_has_user_value(matches, "chunk_size") {
                config.chunk_size = chunk_size;
            }
        }

        if let Some(delay_ms) = cli.delay_ms {
            if arg_has_user_value(matches, "delay_ms") {
                config.delay_ms = delay_ms;
            }
        }

        for kind in &cli.skip {
            config.disable_repair(*kind);
        }

        if config.chunk_size == 0 {
            log::warn!("chunk size 0 is not usable; falling back to {DEFAULT_CHUNK_SIZE}");
            config.chunk_size = DEFAULT_CHUNK_SIZE;
        }

        Ok(config)
    }

    fn load_config_files(cli: &Cli, matches: &ArgMatches) -> Result<Self> {
        if cli.no_config {
            return Ok(Self::default());
        }

        if let Some(config_file) = &cli.config_file {
            if arg_has_user_value(matches, "config_file") {
                let mut config = Self::default();
                config.merge_with(Self::load_from_file(config_file)?);
                config.config_file = Some(config_file.clone());
                return Ok(config);
            }
        }

        let mut config = Self::default();

        for path in Self::get_config_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(file_config) => {
                        config.merge_with(file_config);
                        config.config_file = Some(path.clone());
                        break;
                    }
                    Err(e) => {
                        log::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(config)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(env_path) = std::env::var_os(CONFIG_FILE_ENV) {
            if !env_path.is_empty() {
                paths.push(PathBuf::from(env_path));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let mdtail_dir = config_dir.join("mdtail");
            paths.push(mdtail_dir.join("config.yaml"));
            paths.push(mdtail_dir.join("config.yml"));
        }

        paths
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str::<Self>(&content).map_err(|_| {
            anyhow::Error::from(MdtailError::ConfigParseError(format!(
                "Failed to parse YAML config file: {}",
                path.display()
            )))
        })
    }

    fn merge_with(&mut self, other: Self) {
        if other.no_colors {
            self.no_colors = true;
        }

        if other.cols.is_some() {
            self.cols = other.cols;
        }

        if other.theme != ThemeMode::Auto {
            self.theme = other.theme;
        }

        if other.raw {
            self.raw = true;
        }

        if other.no_stream {
            self.no_stream = true;
        }

        if other.chunk_size != DEFAULT_CHUNK_SIZE {
            self.chunk_size = other.chunk_size;
        }

        if other.delay_ms != DEFAULT_DELAY_MS {
            self.delay_ms = other.delay_ms;
        }

        self.repairs = other.repairs;
    }

    fn disable_repair(&mut self, kind: RepairKind) {
        let repairs = &mut self.repairs;
        match kind {
            RepairKind::Fences => repairs.fences = false,
            RepairKind::InlineCode => repairs.inline_code = false,
            RepairKind::Links => repairs.links = false,
            RepairKind::Images => repairs.images = false,
            RepairKind::Emphasis => repairs.emphasis = false,
            RepairKind::Tables => repairs.tables = false,
        }
    }

    /// Width used to wrap rendered text; `None` when wrapping is off.
    pub fn wrap_width(&self) -> Option<usize> {
        match self.cols {
            Some(0) => None,
            Some(cols) if self.cols_from_cli => Some(cols),
            _ => Some(self.get_terminal_width()),
        }
    }

    pub fn get_terminal_width(&self) -> usize {
        if self.cols_from_cli {
            if let Some(cols) = self.cols.filter(|&cols| cols > 0) {
                return cols;
            }
        }

        if let Ok((width, _)) = crossterm::terminal::size() {
            let width = width as usize;
            if width >= 20 {
                return width;
            }
        }

        if let Some(cols) = self.cols.filter(|&cols| cols > 0) {
            return cols;
        }

        80
    }
}

pub(crate) fn mdtail_no_color_override() -> Option<bool> {
    let raw_value = std::env::var_os(NO_COLOR_ENV)?;
    let value = raw_value.to_string_lossy();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            log::warn!(
                "Invalid value '{}' for environment variable {}. Use 'True' or 'False'.",
                trimmed,
                NO_COLOR_ENV
            );
            None
        }
    }
}
