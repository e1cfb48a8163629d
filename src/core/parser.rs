//! Session parser: turns the device CSV dump into `Session`s, five at a time.

use crate::core::schema::{HeaderField, HeaderRecord, is_header};
use crate::errors::{AppError, AppResult};
use crate::models::{Sample, Session, SessionBatch, SessionSummary};
use chrono::NaiveDate;
use csv::{ByteRecord, Position, StringRecord};
use log::{debug, error, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A problem that was recovered from while parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Header could not be used; the whole session was dropped.
    SkippedSession { line: u64, reason: String },
    /// Session kept, but without a date.
    MissingDate { line: u64, raw: String },
    /// One sample line dropped.
    SkippedSample { line: u64, value: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::SkippedSession { line, reason } => {
                write!(f, "line {line}: session skipped ({reason})")
            }
            Diagnostic::MissingDate { line, raw } => {
                write!(f, "line {line}: bad date '{raw}', session kept without date")
            }
            Diagnostic::SkippedSample { line, value } => {
                write!(f, "line {line}: bad rate value '{value}', sample skipped")
            }
        }
    }
}

/// Split one dump line (without its terminator) into fields, text kept
/// exactly as written. A blank line is a single empty field.
pub fn tokenize(line: &[u8]) -> AppResult<StringRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(line);

    let mut rec = ByteRecord::new();
    if rdr.read_byte_record(&mut rec)? {
        Ok(StringRecord::from_byte_record_lossy(rec))
    } else {
        Ok(StringRecord::from(vec![""]))
    }
}

fn strip_eol(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// True when the text parses as a number (surrounding blanks allowed).
pub fn is_numeric(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}

pub struct SessionReader<R: Read> {
    input: BufReader<R>,
    line: u64,
    // record that ended a sample block, to be looked at again as a header
    pending: Option<StringRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl SessionReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(file))
    }
}

impl<R: Read> SessionReader<R> {
    pub fn new(rdr: R) -> Self {
        Self {
            input: BufReader::new(rdr),
            line: 0,
            pending: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Read up to five sessions. A batch with fewer than five means the
    /// input is exhausted; calling again then yields an empty batch.
    pub fn next_batch(&mut self) -> AppResult<SessionBatch> {
        let mut sessions = Vec::with_capacity(SessionBatch::SIZE);
        while sessions.len() < SessionBatch::SIZE {
            match self.next_session()? {
                Some(s) => sessions.push(s),
                None => break,
            }
        }
        debug!("Got {} sessions", sessions.len());
        Ok(SessionBatch::new(sessions))
    }

    /// Drain the input into a flat list of sessions.
    pub fn read_all(&mut self) -> AppResult<Vec<Session>> {
        let mut all = Vec::new();
        loop {
            let batch = self.next_batch()?;
            let last = batch.is_final();
            all.extend(batch.into_sessions());
            if last {
                return Ok(all);
            }
        }
    }

    fn next_record(&mut self) -> AppResult<Option<StringRecord>> {
        if let Some(rec) = self.pending.take() {
            return Ok(Some(rec));
        }
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut rec = tokenize(strip_eol(&buf))?;
        let mut pos = Position::new();
        pos.set_line(self.line);
        rec.set_position(Some(pos));
        Ok(Some(rec))
    }

    fn next_session(&mut self) -> AppResult<Option<Session>> {
        while let Some(record) = self.next_record()? {
            if !is_header(&record) {
                continue;
            }
            let line = line_of(&record);

            match self.read_header(&record, line) {
                Ok((label, summary)) => {
                    let samples = self.read_samples()?;
                    return Ok(Some(Session::new(label, summary, samples)));
                }
                Err(e) => {
                    error!("Header error on line {line}: {e} {:?}", fields(&record));
                    self.diagnostics.push(Diagnostic::SkippedSession {
                        line,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(None)
    }

    fn read_header(
        &mut self,
        record: &StringRecord,
        line: u64,
    ) -> AppResult<(String, SessionSummary)> {
        let header = HeaderRecord::validate(record)?;

        let hour = header.parse_u32(HeaderField::Hour)?;
        let minute = header.parse_u32(HeaderField::Minute)?;
        let second = header.parse_u32(HeaderField::Second)?;
        let q_max = header.parse_f32(HeaderField::QMax)?;
        let t_peak = header.parse_f32(HeaderField::TPeak)?;
        let t_end = header.parse_f32(HeaderField::TEnd)?;
        let volume_scale = header.parse_f32(HeaderField::VolumeScale)?;
        let volume_visual = header.parse_f32(HeaderField::VolumeVisual)?;

        let date_text = header.date_text();
        let date = match NaiveDate::parse_from_str(date_text, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                // kept without date: the flow chart can still show it
                error!(
                    "{} on line {line}: {:?}",
                    AppError::DateParse(date_text.into()),
                    fields(record)
                );
                self.diagnostics.push(Diagnostic::MissingDate {
                    line,
                    raw: date_text.to_string(),
                });
                None
            }
        };

        let summary = SessionSummary {
            date,
            hour,
            minute,
            second,
            q_max,
            t_peak,
            t_end,
            volume_scale,
            volume_visual,
        };

        let label = format!(
            "{}:{}{}{}",
            date_text,
            header.get(HeaderField::Hour),
            header.get(HeaderField::Minute),
            header.get(HeaderField::Second)
        );

        Ok((label, summary))
    }

    fn read_samples(&mut self) -> AppResult<Vec<Sample>> {
        let mut samples = Vec::new();

        while let Some(record) = self.next_record()? {
            let first = record.get(0).unwrap_or("");
            if !is_numeric(first) {
                self.pending = Some(record);
                break;
            }

            let rate_raw = record.get(3).unwrap_or("");
            match (first.trim().parse::<f32>(), rate_raw.trim().parse::<f32>()) {
                (Ok(time), Ok(rate)) => samples.push(Sample { time, rate }),
                _ => {
                    let line = line_of(&record);
                    warn!("Bad rate value on line {line}: '{rate_raw}'");
                    self.diagnostics.push(Diagnostic::SkippedSample {
                        line,
                        value: rate_raw.to_string(),
                    });
                }
            }
        }

        Ok(samples)
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn fields(record: &StringRecord) -> Vec<&str> {
    record.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(date: &str, hms: (u32, u32, u32), qmax: &str, tpeak: &str, tend: &str) -> String {
        format!(
            "Ver 2.1,17,DATE, {date},TIME,{},{},{},Qmax,{qmax},Tpeak,{tpeak},Ttotal,{tend},Volscale,312,Volvisual,320,Calib,1.02\n",
            hms.0, hms.1, hms.2
        )
    }

    fn samples(n: usize) -> String {
        (0..n)
            .map(|i| format!("{:.1},{},{},{:.1}\n", i as f32 * 0.1, i, i, i as f32 * 0.5))
            .collect()
    }

    fn dump(sessions: usize) -> String {
        let mut out = String::from("Uroflow dump\n");
        for i in 0..sessions {
            out.push_str(&header(
                &format!("2022-07-{:02}", i + 1),
                (10, 15, 42),
                "18.4",
                "6.3",
                "24.9",
            ));
            out.push_str(&samples(3));
        }
        out
    }

    #[test]
    fn header_values_are_reconstructed_exactly() {
        let text = header("2022-07-27", (9, 5, 59), "18.4", "6.3", "24.9") + &samples(2);
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();
        assert_eq!(batch.count(), 1);

        let s = &batch.sessions()[0];
        assert_eq!(s.date(), NaiveDate::from_ymd_opt(2022, 7, 27));
        assert_eq!((s.hour(), s.minute(), s.second()), (9, 5, 59));
        assert_eq!(s.q_max(), "18.4".parse::<f32>().unwrap());
        assert_eq!(s.t_peak(), "6.3".parse::<f32>().unwrap());
        assert_eq!(s.t_end(), "24.9".parse::<f32>().unwrap());
        assert_eq!(s.rescale(), 1.0);
        assert_eq!(s.label(), "2022-07-27:9559");
        assert_eq!(s.samples().len(), 2);
    }

    #[test]
    fn batches_of_five_then_remainder_then_empty() {
        let text = dump(7);
        let mut reader = SessionReader::new(text.as_bytes());

        let first = reader.next_batch().unwrap();
        assert_eq!(first.count(), 5);
        assert!(!first.is_final());

        let second = reader.next_batch().unwrap();
        assert_eq!(second.count(), 2);
        assert!(second.is_final());

        assert_eq!(reader.next_batch().unwrap().count(), 0);
    }

    #[test]
    fn exactly_five_gives_full_batch_then_empty() {
        let text = dump(5);
        let mut reader = SessionReader::new(text.as_bytes());
        assert_eq!(reader.next_batch().unwrap().count(), 5);
        assert_eq!(reader.next_batch().unwrap().count(), 0);
    }

    #[test]
    fn sample_block_stops_at_first_non_numeric_record() {
        let text = header("2022-07-27", (10, 0, 0), "12", "4", "20")
            + "0.0,0,0,1.5\n0.1,1,1,2.5\nend of session,,,\n0.2,2,2,9.9\n";
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        let s = &batch.sessions()[0];
        assert_eq!(
            s.samples(),
            &[
                Sample { time: 0.0, rate: 1.5 },
                Sample { time: 0.1, rate: 2.5 }
            ]
        );
    }

    #[test]
    fn terminating_header_starts_the_next_session() {
        // no separator line between the two sessions
        let text = header("2022-07-27", (10, 0, 0), "12", "4", "20")
            + "0.0,0,0,1.5\n"
            + &header("2022-07-28", (11, 0, 0), "14", "5", "22")
            + "0.0,0,0,3.5\n";
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.count(), 2);
        assert_eq!(batch.sessions()[0].samples().len(), 1);
        assert_eq!(batch.sessions()[1].hour(), 11);
        assert_eq!(batch.sessions()[1].samples()[0].rate, 3.5);
    }

    #[test]
    fn bad_sample_is_skipped_and_parsing_continues() {
        let text = header("2022-07-27", (10, 0, 0), "12", "4", "20")
            + "0.0,0,0,1.5\n0.1,1,1,oops\n0.2,2,2,3.5\n";
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.sessions()[0].samples().len(), 2);
        assert!(matches!(
            reader.diagnostics(),
            [Diagnostic::SkippedSample { value, .. }] if value == "oops"
        ));
    }

    #[test]
    fn bad_date_keeps_session_without_date() {
        let text = header("27/07/2022", (10, 0, 0), "12", "4", "20") + &samples(1);
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.count(), 1);
        assert_eq!(batch.sessions()[0].date(), None);
        assert!(matches!(reader.diagnostics(), [Diagnostic::MissingDate { .. }]));
    }

    #[test]
    fn bad_header_number_drops_only_that_session() {
        let text = header("2022-07-27", (10, 0, 0), "n/a", "4", "20")
            + &samples(2)
            + &header("2022-07-28", (11, 0, 0), "14", "5", "22")
            + &samples(2);
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.count(), 1);
        assert_eq!(batch.sessions()[0].q_max(), 14.0);
        assert!(matches!(
            reader.diagnostics(),
            [Diagnostic::SkippedSession { line: 1, .. }]
        ));
    }

    #[test]
    fn blank_line_ends_the_sample_block() {
        let text = header("2022-07-27", (10, 0, 0), "12", "4", "20")
            + "0.0,0,0,1.5\n\n9.9,0,0,7.5\n";
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.count(), 1);
        assert_eq!(batch.sessions()[0].samples(), &[Sample { time: 0.0, rate: 1.5 }]);
    }

    #[test]
    fn blank_line_with_crlf_also_ends_the_block() {
        let text = header("2022-07-27", (10, 0, 0), "12", "4", "20").replace('\n', "\r\n")
            + "0.0,0,0,1.5\r\n\r\n0.1,1,1,2.5\r\n";
        let mut reader = SessionReader::new(text.as_bytes());
        let batch = reader.next_batch().unwrap();

        assert_eq!(batch.sessions()[0].samples().len(), 1);
    }

    #[test]
    fn diagnostics_carry_file_line_numbers() {
        let text = String::from("dump\n\n")
            + &header("2022-07-27", (10, 0, 0), "12", "4", "20")
            + "0.0,0,0,1.5\n0.1,1,1,oops\n";
        let mut reader = SessionReader::new(text.as_bytes());
        reader.next_batch().unwrap();

        assert!(matches!(
            reader.diagnostics(),
            [Diagnostic::SkippedSample { line: 5, .. }]
        ));
    }

    #[test]
    fn tokenizer_keeps_interior_whitespace() {
        let line = "Ver 2.1,  a b ,DATE, 2022-07-27,  ,x";
        let rec = tokenize(line.as_bytes()).unwrap();
        let joined = rec.iter().collect::<Vec<_>>().join(",");
        assert_eq!(joined, line);
        assert_eq!(rec.get(1), Some("  a b "));
    }

    #[test]
    fn tokenizer_maps_blank_line_to_one_empty_field() {
        let rec = tokenize(b"").unwrap();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get(0), Some(""));
        assert!(!is_numeric(&rec[0]));
    }

    #[test]
    fn tokenizer_tolerates_non_utf8_bytes() {
        let rec = tokenize(b"Volvisual,312\xb5L").unwrap();
        assert_eq!(rec.get(0), Some("Volvisual"));
        assert!(rec.get(1).unwrap().starts_with("312"));
    }

    #[test]
    fn numeric_check_matches_float_parsing() {
        assert!(is_numeric("0.1"));
        assert!(is_numeric(" 12 "));
        assert!(is_numeric("-3e2"));
        assert!(!is_numeric("Ver 2.1"));
        assert!(!is_numeric(""));
    }
}
