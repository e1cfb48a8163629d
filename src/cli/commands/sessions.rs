use crate::cli::commands::resolve_input;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::parser::SessionReader;
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use crate::ui::messages::warning;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions { file } = cmd {
        let path = resolve_input(file, cfg)?;

        let mut reader = SessionReader::from_path(&path)?;
        let sessions = reader.read_all()?;

        for d in reader.diagnostics() {
            warning(d);
        }

        if sessions.is_empty() {
            return Err(AppError::NoSessions(path.display().to_string()));
        }

        print!("{}", session_table(&sessions).render());
        println!("{} session(s)", sessions.len());
    }
    Ok(())
}

fn session_table(sessions: &[Session]) -> Table {
    let mut table = Table::new(vec![
        Column::right("#", 3),
        Column::left("date", 10),
        Column::left("time", 8),
        Column::right("Qmax", 6),
        Column::right("Tpeak", 6),
        Column::right("Ttotal", 6),
        Column::right("Vscale", 7),
        Column::right("Vvisual", 7),
        Column::right("rescale", 7),
        Column::right("samples", 7),
    ]);

    for (i, s) in sessions.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            s.date_str(),
            s.time_str(),
            format!("{:.1}", s.q_max()),
            format!("{:.1}", s.t_peak()),
            format!("{:.1}", s.t_end()),
            format!("{:.0}", s.volume_scale()),
            format!("{:.0}", s.volume_visual()),
            format!("{:.3}", s.rescale()),
            s.samples().len().to_string(),
        ]);
    }
    table
}
