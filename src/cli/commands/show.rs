use crate::cli::commands::resolve_input;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::histogram::BinPolicy;
use crate::core::parser::SessionReader;
use crate::core::viewer::build_charts;
use crate::errors::{AppError, AppResult};
use crate::export::{
    ChartSurface, CsvSurface, ExportFormat, JsonSurface, TextSurface, ensure_writable,
};
use crate::ui::messages::{info, warning};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show {
        file,
        format,
        out,
        force,
        reject_overflow,
        strict,
    } = cmd
    {
        // --out is checked before any prompting or parsing
        let out_path = match (format.needs_file(), out) {
            (true, Some(o)) => Some(Path::new(o).to_path_buf()),
            (true, None) => {
                return Err(AppError::Other(format!(
                    "--out FILE is required for --format {}",
                    format.as_str()
                )));
            }
            (false, _) => None,
        };

        let input = resolve_input(file, cfg)?;

        let policy = if *reject_overflow {
            BinPolicy::Reject
        } else {
            cfg.bin_overflow
        };

        let mut reader = SessionReader::from_path(&input)?;
        let report = build_charts(&mut reader, policy)?;

        for d in &report.diagnostics {
            warning(d);
        }
        if *strict && !report.diagnostics.is_empty() {
            return Err(AppError::Strict(report.diagnostics.len()));
        }
        if report.sessions == 0 {
            return Err(AppError::NoSessions(input.display().to_string()));
        }

        info(format!(
            "{} session(s), {} chart(s){}",
            report.sessions,
            report.charts.len(),
            if report.unbinned > 0 {
                format!(", {} not in histogram", report.unbinned)
            } else {
                String::new()
            }
        ));

        let mut surface: Box<dyn ChartSurface> = match (format, out_path) {
            (ExportFormat::Json, Some(p)) => {
                ensure_writable(&p, *force)?;
                Box::new(JsonSurface::new(p))
            }
            (ExportFormat::Csv, Some(p)) => {
                ensure_writable(&p, *force)?;
                Box::new(CsvSurface::new(p))
            }
            _ => Box::new(TextSurface::stdout()),
        };
        surface.render(&report.charts)?;
    }
    Ok(())
}
