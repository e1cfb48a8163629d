pub mod config;
pub mod fetch;
pub mod init;
pub mod sessions;
pub mod show;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::prompt::{choose_file, raw_dumps};
use std::io;
use std::path::PathBuf;

/// Input file for `show` / `sessions`: the given path, or a pick among the
/// raw dumps of the data directory.
pub(crate) fn resolve_input(file: &Option<String>, cfg: &Config) -> AppResult<PathBuf> {
    if let Some(f) = file {
        return Ok(PathBuf::from(f));
    }

    let dir = crate::utils::path::expand_tilde(&cfg.data_dir);
    let candidates = raw_dumps(&dir).unwrap_or_default();
    if candidates.is_empty() {
        return Err(AppError::Other(format!(
            "no raw dumps (U*.csv) in {}; pass a file path",
            dir.display()
        )));
    }

    let path = choose_file(&mut io::stdin().lock(), &mut io::stdout(), &candidates)?;
    println!("File = {}", path.display());
    Ok(path)
}
