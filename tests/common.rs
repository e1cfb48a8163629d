#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary, isolated from the user's real config via HOME.
pub fn uf(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("uroflow");
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Fresh, empty directory inside the system temp dir
pub fn temp_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("uroflow_test_{name}"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path.to_string_lossy().to_string()
}

pub fn header(date: &str, qmax: &str) -> String {
    format!(
        "Ver 2.1,17,DATE, {date},TIME,10,15,42,Qmax,{qmax},Tpeak,1.0,Ttotal,20.5,Volscale,310,Volvisual,312,Calib,1.02\n"
    )
}

/// A small raw dump: one session per (date, qmax) with 40 samples each.
pub fn raw_dump(sessions: &[(&str, &str)]) -> String {
    let mut out = String::from("Uroflow raw dump\n");
    for (date, q) in sessions {
        out.push_str(&header(date, q));
        for i in 0..40 {
            out.push_str(&format!("{:.1},{},{},{:.1}\n", i as f32 * 0.1, i * 3, i * 3, i as f32 * 0.4));
        }
        out.push_str("----\n");
    }
    out
}

/// Write `content` as `name` inside `dir`, returning the full path.
pub fn write_file(dir: &str, name: &str, content: &str) -> String {
    let path = PathBuf::from(dir).join(name);
    fs::write(&path, content).expect("write fixture");
    path.to_string_lossy().to_string()
}
