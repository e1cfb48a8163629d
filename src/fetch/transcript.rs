//! Line copier for one device dump.

use crate::errors::{AppError, AppResult};
use crate::fetch::cancel::CancelToken;
use log::trace;
use std::io::{BufRead, ErrorKind, Write};
use std::time::{Duration, Instant};

/// A response line containing this byte ends a dump.
pub const SENTINEL: u8 = b'!';

/// Limits applied while waiting for the next line.
#[derive(Debug, Clone)]
pub struct ReadControl {
    pub cancel: CancelToken,
    /// Give up when nothing arrives for this long.
    pub idle_timeout: Duration,
}

pub fn is_sentinel(line: &[u8]) -> bool {
    line.contains(&SENTINEL)
}

/// Copy lines from `input` to `out` until a sentinel line.
///
/// Each line is written byte for byte as received, with its `\r\n` or `\n`
/// replaced by `\n`; the sentinel line itself is not written. When `echo` is set every copied line is also printed.
/// Returns the number of lines written.
///
/// A read that times out (`WouldBlock` / `TimedOut`) is retried until the
/// token is cancelled or `idle_timeout` passes without new bytes.
pub fn copy_until_sentinel<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    ctl: &ReadControl,
    echo: bool,
) -> AppResult<usize> {
    let mut written = 0;
    let mut buf: Vec<u8> = Vec::new();
    let mut last_data = Instant::now();

    loop {
        if ctl.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let before = buf.len();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                return Err(AppError::Fetch(
                    "connection closed before end marker".into(),
                ));
            }
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                // partial line bytes stay in `buf` for the next attempt
                if buf.len() > before {
                    last_data = Instant::now();
                } else if last_data.elapsed() >= ctl.idle_timeout {
                    return Err(AppError::FetchTimeout(ctl.idle_timeout.as_secs()));
                }
                continue;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
        last_data = Instant::now();

        let line = line_body(&buf);

        if is_sentinel(line) {
            trace!("end marker: {:?}", String::from_utf8_lossy(line));
            return Ok(written);
        }

        out.write_all(line)?;
        out.write_all(b"\n")?;
        written += 1;
        if echo {
            println!("{}", String::from_utf8_lossy(line));
        }
        buf.clear();
    }
}

/// The line without one trailing `\n` or `\r\n`.
fn line_body(buf: &[u8]) -> &[u8] {
    let body = buf.strip_suffix(b"\n").unwrap_or(buf);
    if body.len() < buf.len() {
        body.strip_suffix(b"\r").unwrap_or(body)
    } else {
        body
    }
}
