use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::Overrides;
use crate::fields::Theme;

/// Templates and their kanban task boards, from the terminal.
/// Data lives in ~/.template_board unless --dir is given; set --api-url to
/// work against a remote task API instead of the local JSON file.
#[derive(Parser)]
#[command(name = "tb", version, about = "Template task boards")]
pub struct Cli {
    /// Data directory holding config.json, the database and the log.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Base URL of a remote task API.
    #[arg(long, global = true, env = "TB_API_URL")]
    pub api_url: Option<String>,

    /// Log filter, e.g. `debug` or `template_board=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Colour scheme for alerts and inputs.
    #[arg(long, global = true, value_enum)]
    pub theme: Option<Theme>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            data_file: self.db.clone(),
            log_level: self.log_level.clone(),
            theme: self.theme,
        }
    }
}
