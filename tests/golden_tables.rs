#[path = "common/mod.rs"]
mod common;

use bkpconsensus::io::{render_consensus, render_pairs};
use bkpconsensus::{consensus, match_pairs, MatchConfig};
use common::{assert_snapshot, bp};

#[test]
fn consensus_table_matches_golden() {
    let records = vec![
        bp("11_destruct", "destruct", ("1", 1_000, '+'), ("4", 90_000, '-')),
        bp("12_destruct", "destruct", ("2", 5_000, '-'), ("2", 8_000, '+')),
        bp("3_lumpy", "lumpy", ("1", 1_020, '+'), ("4", 90_010, '-')),
        bp("4_lumpy", "lumpy", ("2", 5_010, '-'), ("2", 8_005, '+')),
        bp("4_svaba", "svaba", ("4", 89_990, '-'), ("1", 990, '+')),
        bp("7_gridss", "gridss", ("X", 100, '+'), ("X", 400, '+')),
        bp("8_gridss", "gridss", ("X", 120, '+'), ("X", 410, '+')),
    ];

    let table = consensus(&records, MatchConfig::multi_way()).expect("consensus succeeds");
    let actual = render_consensus(&table).expect("rendering succeeds");
    assert_snapshot("consensus/multi_caller.csv", &actual);
}

#[test]
fn pair_table_matches_golden() {
    let reference = vec![
        bp("r1", "destruct", ("1", 1_000, '+'), ("4", 90_000, '-')),
        bp("r2", "destruct", ("2", 5_000, '-'), ("2", 8_000, '+')),
    ];
    let query = vec![
        bp("q1", "lumpy", ("4", 90_150, '-'), ("1", 1_100, '+')),
        bp("q2", "lumpy", ("2", 9_000, '-'), ("2", 8_000, '+')),
        bp("q3", "lumpy", ("2", 5_150, '-'), ("2", 7_900, '+')),
    ];

    let table = match_pairs(&reference, &query, MatchConfig::pairwise()).expect("matching succeeds");
    let actual = render_pairs(&table).expect("rendering succeeds");
    assert_snapshot("pairs/simple.csv", &actual);
}
