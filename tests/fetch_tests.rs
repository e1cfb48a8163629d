mod common;
use common::{temp_dir, uf};
use predicates::str::contains;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use uroflow::core::parser::{SessionReader, tokenize};
use uroflow::errors::AppError;
use uroflow::fetch::{FetchOptions, FetchTarget, Fetcher};

const RAW: &[&str] = &[
    "Ver 2.1,17,DATE, 2022-07-27,TIME,10,15,42,Qmax,18.4,Tpeak,1.0,Ttotal,20.5,Volscale,310,Volvisual,312,Calib,1.02",
    "0.0,0,0,0.0",
    "0.1,  3, 3 ,1.5",
    "",
    "   ",
];

const SUMMARY: &[&str] = &["2022-07-27,10:15:42,18.4,1.0,20.5,310,312"];

/// Fake device: answers `X U` and `X S` with the given lines and terminator.
fn spawn_device(raw_end: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut out = stream;

        let mut cmd = String::new();
        loop {
            cmd.clear();
            if reader.read_line(&mut cmd).unwrap_or(0) == 0 {
                return;
            }
            let lines: &[&str] = match cmd.trim() {
                "X U" => RAW,
                "X S" => SUMMARY,
                _ => continue,
            };
            for l in lines {
                write!(out, "{l}\r\n").unwrap();
            }
            let end = if cmd.trim() == "X U" { raw_end } else { "!" };
            write!(out, "{end}\r\n").unwrap();
            out.flush().unwrap();
        }
    });

    port
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 7, 27).unwrap()
}

fn quiet() -> FetchOptions {
    FetchOptions {
        connect_timeout: Duration::from_secs(2),
        read_timeout: Duration::from_secs(2),
        echo: false,
    }
}

#[test]
fn test_fetch_writes_both_dumps_verbatim() {
    let port = spawn_device("done!");
    let dir = temp_dir("fetch_lib");

    let target = FetchTarget::parse(&format!("127.0.0.1:{port}"), 23).unwrap();
    let report = Fetcher::new(target, quiet())
        .fetch(dir.as_ref(), date())
        .expect("fetch");

    assert_eq!(report.raw_lines, RAW.len());
    assert_eq!(report.summary_lines, 1);
    assert!(report.raw_path.ends_with("U2022-07-27.csv"));
    assert!(report.summary_path.ends_with("S2022-07-27.csv"));

    let raw = fs::read_to_string(&report.raw_path).unwrap();
    assert_eq!(raw, RAW.join("\n") + "\n");
    assert!(!raw.contains("done!"));

    let summary = fs::read_to_string(&report.summary_path).unwrap();
    assert_eq!(summary, format!("{}\n", SUMMARY[0]));
}

#[test]
fn test_fetched_dump_parses_back_unchanged() {
    let port = spawn_device("!");
    let dir = temp_dir("fetch_roundtrip");

    let target = FetchTarget::parse(&format!("127.0.0.1:{port}"), 23).unwrap();
    let report = Fetcher::new(target, quiet()).fetch(dir.as_ref(), date()).unwrap();

    let mut reader = SessionReader::from_path(&report.raw_path).unwrap();
    let batch = reader.next_batch().unwrap();
    assert_eq!(batch.count(), 1);
    let s = &batch.sessions()[0];
    assert_eq!(s.q_max(), 18.4);
    assert_eq!(s.samples().len(), 2);
    assert_eq!(s.samples()[1].rate, 1.5);

    // interior blanks survive the trip through the tokenizer
    let raw = fs::read_to_string(&report.raw_path).unwrap();
    let line = raw.lines().nth(2).unwrap();
    let rec = tokenize(line.as_bytes()).unwrap();
    assert_eq!(rec.get(1), Some("  3"));
    assert_eq!(rec.get(2), Some(" 3 "));
}

#[test]
fn test_connection_refused_names_target() {
    // grab a free port, then close it
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let dir = temp_dir("fetch_refused");

    let target = FetchTarget::parse(&format!("127.0.0.1:{port}"), 23).unwrap();
    let err = Fetcher::new(target, quiet())
        .fetch(dir.as_ref(), date())
        .unwrap_err();
    match err {
        AppError::Connection { target, .. } => assert_eq!(target, format!("127.0.0.1:{port}")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_silent_device_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    // accept and keep the socket open without answering
    let _hold = thread::spawn(move || {
        let (s, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(5));
        drop::<TcpStream>(s);
    });

    let dir = temp_dir("fetch_timeout");
    let opts = FetchOptions {
        read_timeout: Duration::from_secs(1),
        ..quiet()
    };
    let target = FetchTarget::parse(&format!("127.0.0.1:{port}"), 23).unwrap();
    let err = Fetcher::new(target, opts).fetch(dir.as_ref(), date()).unwrap_err();
    assert!(matches!(err, AppError::FetchTimeout(1)));
}

#[test]
fn test_cli_fetch_into_data_dir() {
    let port = spawn_device("done!");
    let dir = temp_dir("fetch_cli");

    uf(&dir)
        .args([
            "--data-dir",
            &dir,
            "fetch",
            "--addr",
            &format!("127.0.0.1:{port}"),
            "--date",
            "2022-07-27",
        ])
        .assert()
        .success()
        .stdout(contains("Ver 2.1"))
        .stdout(contains("U2022-07-27.csv"))
        .stdout(contains("S2022-07-27.csv"));

    assert!(fs::metadata(format!("{dir}/U2022-07-27.csv")).is_ok());
    assert!(fs::metadata(format!("{dir}/S2022-07-27.csv")).is_ok());
}

#[test]
fn test_cli_fetch_prompts_for_address() {
    let port = spawn_device("!");
    let dir = temp_dir("fetch_prompt");

    uf(&dir)
        .args(["--data-dir", &dir, "fetch", "-q", "--date", "2022-07-27"])
        .write_stdin(format!("127.0.0.1:{port}\n"))
        .assert()
        .success()
        .stdout(contains("Enter wifi address: "));
}

#[test]
fn test_cli_connection_failure_exit_code() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let dir = temp_dir("fetch_cli_refused");

    uf(&dir)
        .args(["--data-dir", &dir, "fetch", "--addr", &format!("127.0.0.1:{port}")])
        .assert()
        .code(2)
        .stderr(contains(format!("127.0.0.1:{port}")));
}
