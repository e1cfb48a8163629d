use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use log::info;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the data directory where dumps are stored
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing uroflow…");

    let cfg = Config::init_all(cli.data_dir.clone(), cli.test)?;
    info!("initialized, data dir {}", cfg.data_dir);

    println!("🎉 uroflow initialization completed!");
    Ok(())
}
