//! Interactive console input: device address, file selection, confirmations.

use crate::errors::{AppError, AppResult};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Print `label` and read one trimmed line from `input`.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> AppResult<String> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(AppError::from(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no input",
        )));
    }
    Ok(answer.trim().to_string())
}

pub fn ask_stdin(label: &str) -> AppResult<String> {
    ask(&mut io::stdin().lock(), &mut io::stdout(), label)
}

/// Yes/no question on the terminal; anything but y/yes is a no.
pub fn confirm(label: &str) -> AppResult<bool> {
    let ans = ask_stdin(label)?.to_ascii_lowercase();
    Ok(ans == "y" || ans == "yes")
}

/// Raw dumps (`U*.csv`) in `dir`, newest name first.
pub fn raw_dumps(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('U') && n.ends_with(".csv"))
        })
        .collect();
    files.sort();
    files.reverse();
    Ok(files)
}

/// Let the user pick one of `candidates` by number, or type a path.
pub fn choose_file<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    candidates: &[PathBuf],
) -> AppResult<PathBuf> {
    for (i, p) in candidates.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, p.display())?;
    }

    let answer = ask(input, out, "Select a file (number or path): ")?;
    if let Ok(n) = answer.parse::<usize>() {
        return candidates
            .get(n.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| AppError::Other(format!("no file number {n}")));
    }
    if answer.is_empty() {
        return Err(AppError::Other("no file selected".into()));
    }
    Ok(PathBuf::from(answer))
}
