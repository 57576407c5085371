use std::fs;
use std::path::PathBuf;

use ledger_bubbles::ledger::load_sources;
use ledger_bubbles::{LoadFilter, RecordError};

const HEADER: &str = "id,amount,date,category,description,area,account,voucher_type,revenue_sign";

fn write_source(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ledger-bubbles-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write source");
    path
}

#[test]
fn merged_sources_reject_bad_rows_and_apply_filters() {
    let csv = write_source(
        "merge.csv",
        &format!(
            "{HEADER}\n\
             r1,1200.00,2017-02-03 10:00:00.000,Rent,Office rent,North,Operations,AP,1\n\
             r2,80,03/02/2017,Travel,Taxi,South,Sales,AP,1\n\
             r3,55,2015-06-01 08:00:00.000,Travel,Old trip,South,Sales,AP,1\n\
             r4,40,2017-04-01 08:00:00.000,Travel,Receivable,South,Sales,AR,1\n\
             r5,-300,2017-05-01 08:00:00.000,Refund,Deposit back,North,Operations,AP,1\n"
        ),
    );
    let json = write_source(
        "merge.json",
        r#"[
            {"id": "r1", "amount": 99.5, "date": "2017-03-09 12:00:00.000",
             "category": "Supplies", "area": "East", "org": "Marketing",
             "voucher_type": "AP", "revenue_sign": 1},
            {"id": "j2", "amount": "lots", "date": "2017-03-09 12:00:00.000",
             "category": "Supplies", "area": "East", "org": "Marketing",
             "voucher_type": "AP", "revenue_sign": 1}
        ]"#,
    );

    let report = load_sources(&[csv, json], &LoadFilter::default()).expect("sources load");

    let ids = report
        .records
        .iter()
        .map(|record| record.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["r1", "r5", "r1#2"]);
    assert_eq!(report.filtered_out, 2);
    assert_eq!(report.total_seen(), 7);

    assert_eq!(report.rejected.len(), 2);
    assert!(report.rejected.iter().any(|error| matches!(
        error,
        RecordError::InvalidTimestamp { id, .. } if id == "r2"
    )));
    assert!(report.rejected.iter().any(|error| matches!(
        error,
        RecordError::InvalidNumber { id, .. } if id == "j2"
    )));

    let refund = &report.records[1];
    assert_eq!(refund.signed_amount, -300.0);
    assert_eq!(refund.description, "Deposit back");
}

#[test]
fn permissive_filter_keeps_every_valid_row() {
    let csv = write_source(
        "permissive.csv",
        &format!(
            "{HEADER}\n\
             a,10,2014-01-01 00:00:00.000,Rent,,North,Operations,XX,\n\
             b,20,2019-01-01 00:00:00.000,Rent,,North,Operations,AP,-1\n"
        ),
    );

    let report = load_sources(&[csv], &LoadFilter::permissive()).expect("source loads");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.filtered_out, 0);
    assert_eq!(report.records[0].description, "Rent");
}

#[test]
fn unreadable_source_is_an_error() {
    let missing = std::env::temp_dir().join("ledger-bubbles-definitely-missing.csv");
    assert!(load_sources(&[missing], &LoadFilter::default()).is_err());
}
