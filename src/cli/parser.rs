use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for uroflow
#[derive(Parser)]
#[command(
    name = "uroflow",
    version = env!("CARGO_PKG_VERSION"),
    about = "Download uroflow device dumps and chart flow sessions with weekly Qmax histograms",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (where U<date>.csv / S<date>.csv live)
    #[arg(global = true, long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(global = true, short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration and create the data directory
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Download the raw and summary dumps from the device
    Fetch {
        /// Device address (host or host:port); prompted for when missing
        #[arg(long = "addr", value_name = "HOST[:PORT]")]
        addr: Option<String>,

        /// Date used in the output file names (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Seconds without data before giving up
        #[arg(long = "timeout", value_name = "SECS")]
        timeout: Option<u64>,

        /// Do not echo received lines
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Chart the sessions of a raw dump
    Show {
        /// Raw dump file; prompted for among the data directory when missing
        file: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: ExportFormat,

        /// Output file (required for json / csv)
        #[arg(long, value_name = "FILE")]
        out: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,

        /// Leave sessions with Qmax outside 0..30 out of the histogram instead of clamping
        #[arg(long = "reject-overflow")]
        reject_overflow: bool,

        /// Fail when any record had to be skipped
        #[arg(long)]
        strict: bool,
    },

    /// List the sessions found in a raw dump
    Sessions {
        /// Raw dump file; prompted for among the data directory when missing
        file: Option<String>,
    },
}
