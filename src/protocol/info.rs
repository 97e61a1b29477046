use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Key/value view of `p4 info`.
///
/// Keys are lowercased with spaces replaced by underscores, so
/// `User name: alice` is available as `user_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct P4Info {
    fields: HashMap<String, String>,
}

impl P4Info {
    pub fn parse(output: &str) -> Self {
        let fields = output
            .lines()
            .filter_map(|line| line.split_once(": "))
            .map(|(key, value)| {
                (
                    key.trim().replace(' ', "_").to_lowercase(),
                    value.trim().to_string(),
                )
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.get("user_name")
    }

    /// `None` when no client workspace is configured (`*unknown*`).
    pub fn client_root(&self) -> Option<PathBuf> {
        self.get("client_root")
            .filter(|root| !root.is_empty() && *root != "*unknown*")
            .map(PathBuf::from)
    }

    pub fn server_version(&self) -> Option<ServerVersion> {
        self.get("server_version")?.parse().ok()
    }
}

/// Server release as `YEAR.MINOR`, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServerVersion {
    pub year: u32,
    pub minor: u32,
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.minor)
    }
}

fn parse_release(release: &str) -> Option<ServerVersion> {
    let (year, minor) = release.split_once('.')?;
    Some(ServerVersion {
        year: year.parse().ok()?,
        minor: minor.parse().ok()?,
    })
}

impl FromStr for ServerVersion {
    type Err = AppError;

    /// Accepts a bare release (`2009.1`) or a full server version string
    /// (`P4D/LINUX26X86_64/2012.2/536738 (2012/10/16)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_release(s)
            .or_else(|| s.split('/').find_map(parse_release))
            .ok_or_else(|| AppError::Parse(format!("unrecognized server version: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = "User name: alice\n\
                        Client name: alice-ws\n\
                        Client root: /home/alice/ws\n\
                        Current directory: /home/alice/ws/src\n\
                        Server version: P4D/LINUX26X86_64/2012.2/536738 (2012/10/16)";

    #[test]
    fn test_parses_fields() {
        let info = P4Info::parse(INFO);
        assert_eq!(info.user_name(), Some("alice"));
        assert_eq!(info.get("client_name"), Some("alice-ws"));
        assert_eq!(info.client_root(), Some(PathBuf::from("/home/alice/ws")));
    }

    #[test]
    fn test_unknown_client_root() {
        let info = P4Info::parse("User name: alice\nClient root: *unknown*");
        assert_eq!(info.client_root(), None);
    }

    #[test]
    fn test_server_version_from_info() {
        let info = P4Info::parse(INFO);
        assert_eq!(
            info.server_version(),
            Some(ServerVersion { year: 2012, minor: 2 })
        );
    }

    #[test]
    fn test_server_version_ordering() {
        let threshold: ServerVersion = "2009.1".parse().unwrap();
        let old: ServerVersion = "P4D/NTX86/2008.2/179173 (2009/01/08)".parse().unwrap();
        let new: ServerVersion = "2009.2".parse().unwrap();
        assert!(old < threshold);
        assert!(new >= threshold);
        assert_eq!(threshold.to_string(), "2009.1");
    }

    #[test]
    fn test_bad_server_version() {
        assert!("P4D/unknown".parse::<ServerVersion>().is_err());
    }
}
