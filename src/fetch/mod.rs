//! Device transfer: raw (`X U`) and summary (`X S`) dumps over a Telnet-style socket.

pub mod cancel;
pub mod transcript;

pub use cancel::CancelToken;
pub use transcript::{ReadControl, SENTINEL, copy_until_sentinel};

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 23;

/// Socket read timeout; the read loop wakes up this often to check for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
    Raw,
    Summary,
}

impl DumpKind {
    pub fn command(&self) -> &'static str {
        match self {
            DumpKind::Raw => "X U",
            DumpKind::Summary => "X S",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            DumpKind::Raw => "U",
            DumpKind::Summary => "S",
        }
    }

    /// `U2022-07-27.csv` / `S2022-07-27.csv`
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}{}.csv", self.prefix(), date.format("%Y-%m-%d"))
    }
}

/// Host and port of the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub host: String,
    pub port: u16,
}

impl FetchTarget {
    /// Accepts `host`, `host:port`, `a.b.c.d:port` or `[v6]:port`.
    pub fn parse(input: &str, default_port: u16) -> AppResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::Config("device address is empty".into()));
        }

        if let Ok(addr) = input.parse::<SocketAddr>() {
            return Ok(Self {
                host: addr.ip().to_string(),
                port: addr.port(),
            });
        }

        if let Some((host, port)) = input.rsplit_once(':')
            && !host.contains(':')
        {
            let port = port
                .parse()
                .map_err(|_| AppError::Config(format!("invalid port in '{input}'")))?;
            return Ok(Self {
                host: host.to_string(),
                port,
            });
        }

        Ok(Self {
            host: input.to_string(),
            port: default_port,
        })
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Print every received line on stdout.
    pub echo: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            echo: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub raw_path: PathBuf,
    pub raw_lines: usize,
    pub summary_path: PathBuf,
    pub summary_lines: usize,
}

pub struct Fetcher {
    target: FetchTarget,
    opts: FetchOptions,
    cancel: CancelToken,
}

impl Fetcher {
    pub fn new(target: FetchTarget, opts: FetchOptions) -> Self {
        Self {
            target,
            opts,
            cancel: CancelToken::new(),
        }
    }

    /// Token that aborts a running fetch from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Download both dumps into `out_dir`, files named after `date`.
    pub fn fetch(&self, out_dir: &Path, date: NaiveDate) -> AppResult<FetchReport> {
        let stream = self.connect()?;
        stream.set_read_timeout(Some(POLL_INTERVAL))?;

        let mut cmd_out = stream.try_clone()?;
        let mut input = BufReader::new(stream);

        let raw_path = out_dir.join(DumpKind::Raw.file_name(date));
        let raw_lines = self.run_phase(DumpKind::Raw, &mut input, &mut cmd_out, &raw_path)?;

        let summary_path = out_dir.join(DumpKind::Summary.file_name(date));
        let summary_lines =
            self.run_phase(DumpKind::Summary, &mut input, &mut cmd_out, &summary_path)?;

        Ok(FetchReport {
            raw_path,
            raw_lines,
            summary_path,
            summary_lines,
        })
    }

    fn connect(&self) -> AppResult<TcpStream> {
        let target = self.target.to_string();
        let conn_err = |source: io::Error| AppError::Connection {
            target: target.clone(),
            source,
        };

        let addrs: Vec<SocketAddr> = (self.target.host.as_str(), self.target.port)
            .to_socket_addrs()
            .map_err(conn_err)?
            .collect();

        let mut last = io::Error::new(io::ErrorKind::NotFound, "address did not resolve");
        for addr in addrs {
            debug!("connecting to {addr}");
            match TcpStream::connect_timeout(&addr, self.opts.connect_timeout) {
                Ok(s) => {
                    info!("connected to {target} ({addr})");
                    return Ok(s);
                }
                Err(e) => last = e,
            }
        }
        Err(conn_err(last))
    }

    /// Send the dump command, then copy lines into `path` until the end marker.
    /// The file is closed when this returns, on success or error.
    fn run_phase<R: io::BufRead, W: Write>(
        &self,
        kind: DumpKind,
        input: &mut R,
        cmd_out: &mut W,
        path: &Path,
    ) -> AppResult<usize> {
        info!("requesting {} into {}", kind.command(), path.display());
        cmd_out.write_all(format!("{}\r\n", kind.command()).as_bytes())?;
        cmd_out.flush()?;

        let mut out = BufWriter::new(File::create(path)?);
        let ctl = ReadControl {
            cancel: self.cancel.clone(),
            idle_timeout: self.opts.read_timeout,
        };
        let lines = copy_until_sentinel(input, &mut out, &ctl, self.opts.echo)?;
        out.flush()?;

        info!("{} lines written to {}", lines, path.display());
        Ok(lines)
    }
}
