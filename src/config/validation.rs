use super::defaults::{
    CLI_OUTPUT_MAX_RANGE, COMPLETION_MAX_ITEMS_RANGE, COMPLETION_PREVIEW_RANGE,
    HEADER_HEIGHT_RANGE, MAX_DURATION_SECONDS, MIN_DATA_VIEWPORT_RANGE,
};
use super::AppConfig;
use crate::alias::AliasManager;
use crate::layout::LayoutConfig;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

fn check_range(flag: &str, value: u16, (min, max): (u16, u16)) -> Result<()> {
    if !(min..=max).contains(&value) {
        bail!("--{flag} must be between {min} and {max}, got {value}");
    }
    Ok(())
}

fn check_file(flag: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("--{flag} file not found: {}", path.display());
    }
    Ok(())
}

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before the terminal is touched.
    pub fn validate(&mut self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            bail!("--duration must be a positive number of seconds, got {}", self.duration);
        }
        if self.duration > MAX_DURATION_SECONDS {
            bail!(
                "--duration must be at most {MAX_DURATION_SECONDS} seconds, got {}",
                self.duration
            );
        }

        check_range("header-height", self.header_height, HEADER_HEIGHT_RANGE)?;
        check_range(
            "cli-output-max-height",
            self.cli_output_max_height,
            CLI_OUTPUT_MAX_RANGE,
        )?;
        check_range(
            "min-data-viewport",
            self.min_data_viewport,
            MIN_DATA_VIEWPORT_RANGE,
        )?;
        check_range(
            "completion-max-items",
            self.completion_max_items,
            COMPLETION_MAX_ITEMS_RANGE,
        )?;
        check_range(
            "completion-preview-height",
            self.completion_preview_height,
            COMPLETION_PREVIEW_RANGE,
        )?;

        if let Some(path) = &self.audio {
            check_file("audio", path)?;
        }
        if let Some(path) = &self.data {
            check_file("data", path)?;
        }
        if let Some(path) = &self.aliases_path {
            if path.is_dir() {
                bail!("--aliases-path must be a file, got directory {}", path.display());
            }
        }
        Ok(())
    }

    /// Layout knobs with the CLI overrides applied.
    pub fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig {
            header_height: self.header_height,
            cli_output_max_height: self.cli_output_max_height,
            min_data_viewport: self.min_data_viewport,
            completion_max_items: self.completion_max_items,
            completion_preview_height: self.completion_preview_height,
            ..LayoutConfig::default()
        };
        config.min_terminal_height = config.min_terminal_height.max(config.fixed_rows());
        config
    }

    /// Explicit path, else the per-user default. `None` keeps aliases in memory only.
    pub fn resolved_aliases_path(&self) -> Option<PathBuf> {
        self.aliases_path.clone().or_else(AliasManager::default_path)
    }
}
