mod check;
mod collectors;
mod config;
mod error;
mod logging;
mod models;
mod schema;
mod severity;
mod util;

use clap::Parser;
use collectors::perccli::{self, PercCli};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "perccli-status",
    about = "Nagios/Opsview plugin to check status of PowerEdge RAID Controller",
    version
)]
struct Cli {
    /// Path to perccli (default: first of /opt/MegaRAID/perccli/perccli64, /opt/MegaRAID/perccli2/perccli2)
    #[arg(long, value_name = "PATH")]
    perccli_path: Option<PathBuf>,

    /// Nagios/Icinga-like single line output
    #[arg(long)]
    nagios: bool,

    /// Debugging mode
    #[arg(long)]
    debug: bool,

    /// Seconds to wait for each perccli run
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (default: <config dir>/perccli-status/perccli-status.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let cfg = Config::load(cli.config.as_deref());
    let path = cli
        .perccli_path
        .or(cfg.perccli.path)
        .unwrap_or_else(perccli::default_path);
    let timeout = Duration::from_secs(cli.timeout.unwrap_or(cfg.perccli.timeout_secs));

    let runner = PercCli::new(path, timeout);
    debug!("using {} (timeout {}s)", runner.path().display(), timeout.as_secs());

    let report  = check::run(&runner);
    let overall = report.overall();

    if cli.nagios {
        println!("{}", util::report::summary_line(&report));
    } else {
        print!("{}", util::report::tables(&report));
    }

    ExitCode::from(overall.exit_code())
}
