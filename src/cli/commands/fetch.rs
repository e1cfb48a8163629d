use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::fetch::{FetchOptions, FetchTarget, Fetcher};
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_stdin;
use crate::utils::{date, path::expand_tilde};
use std::fs;
use std::time::Duration;

/// Download `U<date>.csv` and `S<date>.csv` from the device.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Fetch {
        addr,
        date: date_arg,
        timeout,
        quiet,
    } = cmd
    {
        //
        // 1. Date used in the file names
        //
        let day = match date_arg {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?,
            None => date::today(),
        };

        //
        // 2. Device address: flag, config, then ask
        //
        let address = match addr.clone().or_else(|| cfg.device_address.clone()) {
            Some(a) => a,
            None => ask_stdin("Enter wifi address: ")?,
        };
        let target = FetchTarget::parse(&address, cfg.port)?;

        //
        // 3. Output directory
        //
        let out_dir = expand_tilde(&cfg.data_dir);
        fs::create_dir_all(&out_dir)?;

        let opts = FetchOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            read_timeout: Duration::from_secs(timeout.unwrap_or(cfg.read_timeout_secs).max(1)),
            echo: !*quiet,
        };

        info(format!("Connecting to {target}…"));
        let fetcher = Fetcher::new(target, opts);
        let report = fetcher.fetch(&out_dir, day)?;

        success(format!(
            "Raw data: {} lines → {}",
            report.raw_lines,
            report.raw_path.display()
        ));
        success(format!(
            "Summary:  {} lines → {}",
            report.summary_lines,
            report.summary_path.display()
        ));
    }

    Ok(())
}
