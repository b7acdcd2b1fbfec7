use cdrview::error::PipelineError;
use cdrview::query;
use cdrview::record::CallRecord;

fn record(caller: &str, called: &str, device: &str, origination: &str) -> CallRecord {
    CallRecord {
        origination_time: origination.to_string(),
        connect_time: "10:30:00".to_string(),
        disconnect_time: "15.06.21 10:35:30".to_string(),
        duration: "00:05:30".to_string(),
        caller_number: caller.to_string(),
        called_number: called.to_string(),
        caller_login_id: "jdoe".to_string(),
        called_login_id: "msmith".to_string(),
        device_name: device.to_string(),
    }
}

fn sample_records() -> Vec<CallRecord> {
    vec![
        record("030123456", "+4940111", "SEP001122334455", "15.06.21 10:30:00"),
        record("0897777", "030999", "SEPAABBCCDDEEFF", "15.06.21 11:00:00"),
        record("0551111", "0897755", "sepffee00112233", "16.06.21 09:00:00"),
    ]
}

#[test]
fn unscoped_terms_match_any_display_column() {
    let records = sample_records();
    let hits = query::filter(&records, "089").expect("filters").expect("applied");
    // caller of record 1 and called number of record 2
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].caller_number, "0897777");
    assert_eq!(hits[1].called_number, "0897755");
}

#[test]
fn login_ids_are_not_searched_unscoped() {
    let records = sample_records();
    let hits = query::filter(&records, "msmith").expect("filters").expect("applied");
    assert!(hits.is_empty());
}

#[test]
fn column_scoped_terms_restrict_the_match() {
    let records = sample_records();
    let hits = query::filter(&records, "Anrufer:030")
        .expect("filters")
        .expect("applied");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].caller_number, "030123456");

    let hits = query::filter(&records, "Gewählte Nummer:030")
        .expect("filters")
        .expect("applied");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].called_number, "030999");
}

#[test]
fn matching_is_case_insensitive() {
    let records = sample_records();
    let hits = query::filter(&records, "Gerät:sep0011")
        .expect("filters")
        .expect("applied");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].device_name, "SEP001122334455");
}

#[test]
fn timestamp_like_terms_search_full_text() {
    let records = sample_records();
    let hits = query::filter(&records, "10:30")
        .expect("filters")
        .expect("applied");
    // connect_time matches every record; origination only for the first
    assert_eq!(hits.len(), 3);
}

#[test]
fn unknown_column_tags_fail_without_fallback() {
    let records = sample_records();
    let err = query::filter(&records, "BadTag:x").expect_err("rejected");
    assert!(matches!(err, PipelineError::InvalidColumnName(tag) if tag == "BadTag"));
}

#[test]
fn whitespace_terms_apply_no_filter() {
    let records = sample_records();
    assert!(query::filter(&records, "   ").expect("parses").is_none());
}

#[test]
fn empty_terms_restore_the_full_view() {
    let records = sample_records();
    let hits = query::filter(&records, "").expect("filters").expect("applied");
    assert_eq!(hits.len(), records.len());
}

#[test]
fn filtering_is_idempotent() {
    let records = sample_records();
    let once = query::filter(&records, "089").expect("filters").expect("applied");
    let twice = query::filter(&once, "089").expect("filters").expect("applied");
    assert_eq!(once, twice);
}

#[test]
fn metacharacters_in_terms_match_literally() {
    let records = sample_records();
    let hits = query::filter(&records, "+4940")
        .expect("filters")
        .expect("applied");
    assert_eq!(hits.len(), 1);
    let none = query::filter(&records, ".*").expect("filters").expect("applied");
    assert!(none.is_empty());
}
