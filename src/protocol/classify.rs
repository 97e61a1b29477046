use crate::runner::RawResult;

/// First line printed by `p4` when it cannot even talk to the server.
pub const CLIENT_ERROR_BANNER: &str = "Perforce client error";

pub const ERROR_TAG: &str = "error";

/// Line tags emitted by `p4 -s`.
pub const OUTPUT_TAGS: [&str; 5] = [ERROR_TAG, "info", "info1", "info2", "text"];

/// Reported by `p4 opened` for a changelist with no files.
pub const NO_OPENED_FILES_ERROR: &str = "File(s) not opened on this client.";

pub const EMPTY_OUTPUT_MESSAGE: &str = "<no output from p4>";

/// Outcome of interpreting one command's raw output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub success: bool,
    /// Output with the synthetic exit line removed and line tags stripped.
    pub message: String,
}

impl ClassifiedResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Split `tag: message` when the tag is one `p4 -s` emits.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let (tag, rest) = line.split_once(':')?;
    if !OUTPUT_TAGS.contains(&tag) {
        return None;
    }
    Some((tag, rest.strip_prefix(' ').unwrap_or(rest)))
}

/// Classify the raw output of a `p4 -s` invocation.
///
/// Fails on a client-error banner, on any `error:` line whose message is not in
/// `allowed_errors`, on a non-zero exit code, and on empty output (a silent crash).
pub fn classify(raw: &RawResult, allowed_errors: &[String]) -> ClassifiedResult {
    if raw.output.trim().is_empty() {
        return ClassifiedResult::failed(EMPTY_OUTPUT_MESSAGE);
    }

    let mut lines: Vec<&str> = raw.output.lines().collect();

    if lines
        .first()
        .is_some_and(|first| first.starts_with(CLIENT_ERROR_BANNER))
    {
        return ClassifiedResult::failed(raw.output.trim_end());
    }

    // `exit: <code>` appended by -s
    lines.pop();

    let mut failed = false;
    let mut cleaned = Vec::with_capacity(lines.len());

    for line in lines {
        match split_tag(line) {
            Some((tag, message)) => {
                if tag == ERROR_TAG && !allowed_errors.iter().any(|a| a == message) {
                    failed = true;
                }
                cleaned.push(message);
            }
            None => cleaned.push(line),
        }
    }

    ClassifiedResult {
        success: !failed && raw.exit_code == 0,
        message: cleaned.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(output: &str, exit_code: i32) -> RawResult {
        RawResult::new(output, exit_code)
    }

    #[test]
    fn test_strips_tags_and_exit_line() {
        let result = classify(
            &raw(
                "info: //depot/a.txt#1 - opened for edit\ninfo1: detail\ntext: body\nplain line\nexit: 0\n",
                0,
            ),
            &[],
        );
        assert!(result.success);
        assert_eq!(
            result.message,
            "//depot/a.txt#1 - opened for edit\ndetail\nbody\nplain line"
        );
    }

    #[test]
    fn test_error_line_fails() {
        let result = classify(&raw("error: a.txt - file(s) not on client.\nexit: 1\n", 0), &[]);
        assert!(!result.success);
        assert_eq!(result.message, "a.txt - file(s) not on client.");
    }

    #[test]
    fn test_later_info_line_does_not_clear_earlier_error() {
        let result = classify(
            &raw("error: first failed\ninfo: second fine\nexit: 1\n", 0),
            &[],
        );
        assert!(!result.success);
    }

    #[test]
    fn test_allowed_error_is_informational() {
        let output = format!("error: {NO_OPENED_FILES_ERROR}\nexit: 0\n");
        let allowed = vec![NO_OPENED_FILES_ERROR.to_string()];

        let with_allow = classify(&raw(&output, 0), &allowed);
        assert!(with_allow.success);
        assert_eq!(with_allow.message, NO_OPENED_FILES_ERROR);

        let without_allow = classify(&raw(&output, 0), &[]);
        assert!(!without_allow.success);
        assert_eq!(without_allow.message, with_allow.message);
    }

    #[test]
    fn test_client_error_banner_fails_regardless_of_exit_code() {
        let output = "Perforce client error:\n\tConnect to server failed; check $P4PORT.\n";
        let result = classify(&raw(output, 0), &[]);
        assert!(!result.success);
        assert!(result.message.starts_with(CLIENT_ERROR_BANNER));
        assert!(result.message.contains("check $P4PORT."));
    }

    #[test]
    fn test_nonzero_exit_without_error_lines_fails() {
        let result = classify(&raw("info: looks fine\nexit: 0\n", 1), &[]);
        assert!(!result.success);
        assert_eq!(result.message, "looks fine");
    }

    #[test]
    fn test_empty_output_is_not_success() {
        assert!(!classify(&raw("", 0), &[]).success);
        assert!(!classify(&raw("\n", 0), &[]).success);
        assert_eq!(classify(&raw("", 0), &[]).message, EMPTY_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_unknown_prefix_passes_through() {
        let result = classify(&raw("Change: new\nwarning: odd\nexit: 0\n", 0), &[]);
        assert!(result.success);
        assert_eq!(result.message, "Change: new\nwarning: odd");
    }

    #[test]
    fn test_crlf_output() {
        let result = classify(&raw("info: one\r\ninfo: two\r\nexit: 0\r\n", 0), &[]);
        assert_eq!(result.message, "one\ntwo");
    }
}
