use crate::config::toml_config::{AppConfig, TomlConfig};
use crate::domain::model::FormState;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "elis-search")]
#[command(about = "Search the ELIS therapist directory and render the results as HTML")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with an [api] section")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub method: Option<String>,

    #[arg(long, help = "Minimum years of experience")]
    pub min_experience: Option<u32>,

    #[arg(long, help = "Write a standalone HTML page instead of printing to stdout")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Read filter/submit commands from stdin")]
    pub interactive: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// defaults < 設定檔 < 命令列參數
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file {}", path.display());
            config = TomlConfig::from_file(path)?.apply_to(config);
        }

        if let Some(base_url) = &self.api_base_url {
            config.api_base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }

        Ok(config)
    }

    pub fn initial_form(&self) -> FormState {
        FormState {
            district: self.district.clone().unwrap_or_default(),
            method: self.method.clone().unwrap_or_default(),
            experience: self
                .min_experience
                .map(|years| years.to_string())
                .unwrap_or_default(),
        }
    }
}
