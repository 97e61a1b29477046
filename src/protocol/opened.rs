use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::changes::DEFAULT_CHANGELIST;

static OPENED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?P<depot_path>//[^/\s]+/(?P<path>[^#\n]+))#(?P<revision>\d+|none) - (?P<action>\S+) (?:(?P<default>default) change|change (?P<change>\d+))",
    )
    .expect("valid opened file regex")
});

/// One file listed by `p4 opened`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    /// Full depot path, e.g. `//depot/foo/bar.txt`.
    pub depot_path: String,
    /// Depot path with the depot name removed, e.g. `foo/bar.txt`.
    pub path: String,
    pub revision: String,
    /// `edit`, `add`, `delete`, `branch`, `integrate`, ...
    pub action: String,
    /// Owning changelist number, or `default`.
    pub changelist: String,
}

impl OpenedFile {
    /// Last path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Location on disk, assuming the depot root maps onto the client root.
    pub fn local_path(&self, client_root: &Path) -> PathBuf {
        self.path
            .split('/')
            .fold(client_root.to_path_buf(), |acc, part| acc.join(part))
    }
}

/// Parse `p4 opened` output. Lines that do not match are skipped.
pub fn parse_opened_files(output: &str) -> Vec<OpenedFile> {
    OPENED_RE
        .captures_iter(output)
        .map(|caps| OpenedFile {
            depot_path: caps["depot_path"].to_string(),
            path: caps["path"].to_string(),
            revision: caps["revision"].to_string(),
            action: caps["action"].to_string(),
            changelist: match caps.name("change") {
                Some(number) => number.as_str().to_string(),
                None => DEFAULT_CHANGELIST.to_string(),
            },
        })
        .collect()
}
