#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bkpconsensus::{BreakpointRecord, Strand};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("BKPCONSENSUS_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set BKPCONSENSUS_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

fn strand(symbol: char) -> Strand {
    match symbol {
        '+' => Strand::Plus,
        '-' => Strand::Minus,
        other => panic!("bad strand {other}"),
    }
}

/// Shorthand: `bp("A", "destruct", ("1", 100, '+'), ("2", 500, '-'))`.
pub fn bp(
    id: &str,
    caller: &str,
    first: (&str, u64, char),
    second: (&str, u64, char),
) -> BreakpointRecord {
    BreakpointRecord::builder()
        .id(id)
        .caller(caller)
        .first(first.0, first.1, strand(first.2))
        .second(second.0, second.1, strand(second.2))
        .sv_type("translocation")
        .build()
        .expect("valid breakpoint")
}
