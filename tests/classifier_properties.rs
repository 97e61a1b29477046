use p4bridge::protocol::classify::{classify, CLIENT_ERROR_BANNER, NO_OPENED_FILES_ERROR};
use p4bridge::protocol::{parse_opened_files, parse_pending_changelists};
use p4bridge::runner::RawResult;

#[test]
fn banner_fails_regardless_of_exit_code() {
    let output = format!("{CLIENT_ERROR_BANNER}\nConnect to server failed; check $P4PORT.\nTCP connect to perforce:1666 failed.\n");
    for exit_code in [0, 1, 255] {
        let result = classify(&RawResult::new(output.clone(), exit_code), &[]);
        assert!(!result.success);
        assert!(result.message.starts_with(CLIENT_ERROR_BANNER));
        assert!(result.message.contains("TCP connect to perforce:1666 failed."));
    }
}

#[test]
fn clean_output_preserves_line_order() {
    let lines = ["info: first", "text: second", "untagged third", "info2: fourth"];
    let raw = format!("{}\nexit: 0\n", lines.join("\n"));

    let result = classify(&RawResult::new(raw, 0), &[]);

    assert!(result.success);
    assert_eq!(result.message, "first\nsecond\nuntagged third\nfourth");
}

#[test]
fn allow_list_is_the_only_switch() {
    let raw = RawResult::new(format!("error: {NO_OPENED_FILES_ERROR}\nexit: 1\n"), 0);

    let allowed = classify(&raw, &[NO_OPENED_FILES_ERROR.to_string()]);
    let strict = classify(&raw, &[]);

    assert!(allowed.success);
    assert!(!strict.success);
    assert_eq!(allowed.message, strict.message);
}

#[test]
fn non_zero_exit_without_error_line_fails() {
    let result = classify(&RawResult::new("info: looks fine\nexit: 0\n", 1), &[]);
    assert!(!result.success);
}

#[test]
fn changelist_parsing_counts_well_formed_records() {
    let records: Vec<String> = (1..=5)
        .map(|n| format!("Change {n}0 on 2012/10/0{n} by alice@ws *pending* '  item {n}  '"))
        .collect();
    let output = records.join("\nnoise between records\n");

    let changelists = parse_pending_changelists(&output);

    assert_eq!(changelists.len(), 5);
    for (n, cl) in (1..=5).zip(&changelists) {
        assert_eq!(cl.number, format!("{n}0"));
        assert_eq!(cl.description, format!("item {n}"));
    }
}

#[test]
fn opened_line_fields() {
    let files = parse_opened_files("//depot/foo/bar.txt#3 - edit change 117 (text)");
    assert_eq!(files[0].path, "foo/bar.txt");
    assert_eq!(files[0].action, "edit");
    assert_eq!(files[0].changelist, "117");
}
