use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

/// Colours are dropped when `NO_COLOR` is set.
fn styled(color: &str, icon: &str) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        icon.to_string()
    } else {
        format!("{color}{BOLD}{icon}{RESET}")
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", styled(FG_BLUE, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", styled(FG_GREEN, ICON_OK), msg);
}

/// Warnings go to stderr so that stdout stays clean for piped output.
pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", styled(FG_YELLOW, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", styled(FG_RED, ICON_ERR), msg);
}
