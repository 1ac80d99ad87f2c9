use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::server::DEFAULT_API_PORT;

#[derive(Parser)]
pub struct DaemonArgs {
    #[arg(long)]
    pub force: bool,
    #[arg(long)]
    pub dir: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    pub port: u16,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
