use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_CHANGELIST: &str = "default";

/// Start of a record. Descriptions can wrap, so a record runs until the next one.
static RECORD_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Change \d+ on ").expect("valid changelist record start regex")
});

/// Matched against a single record, never across two.
static PENDING_CHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ms)\AChange (?P<number>\d+) on (?P<date>\S+) by (?P<author>\S+) \*pending\* '(?P<description>.*?)'$",
    )
    .expect("valid pending changelist regex")
});

static CREATED_CHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Change (?P<number>\d+) created").expect("valid created changelist regex")
});

/// One pending changelist as listed by `p4 changes -s pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelist {
    /// Changelist number, or `default`.
    pub number: String,
    pub date: String,
    pub author: String,
    pub description: String,
}

impl Changelist {
    /// The synthetic entry standing for the client's default changelist.
    pub fn default_changelist() -> Self {
        Self {
            number: DEFAULT_CHANGELIST.to_string(),
            date: String::new(),
            author: String::new(),
            description: "<no description>".to_string(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.number == DEFAULT_CHANGELIST
    }

    /// `"<number> - <description>"`, the submit pick-list label.
    pub fn label(&self) -> String {
        format!("{} - {}", self.number, self.description)
    }
}

/// Parse pending changelists in output order. Lines that do not match are skipped.
pub fn parse_pending_changelists(output: &str) -> Vec<Changelist> {
    let starts: Vec<usize> = RECORD_START_RE.find_iter(output).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(output.len());
            let caps = PENDING_CHANGE_RE.captures(&output[start..end])?;
            Some(Changelist {
                number: caps["number"].to_string(),
                date: caps["date"].to_string(),
                author: caps["author"].to_string(),
                // p4 pads descriptions inconsistently on both ends
                description: caps["description"].trim().to_string(),
            })
        })
        .collect()
}

/// Number from `Change <n> created ...`, the reply to `p4 change -i`.
pub fn parse_created_changelist(output: &str) -> Option<String> {
    CREATED_CHANGE_RE
        .captures(output)
        .map(|caps| caps["number"].to_string())
}
