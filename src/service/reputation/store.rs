//! Local allow/deny lists of publisher domains

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::domain::registrable_domain;

#[derive(Debug, Default, Deserialize)]
struct SourceListFile {
    #[serde(default, alias = "whitelist")]
    allow: Vec<String>,
    #[serde(default, alias = "blacklist")]
    deny: Vec<String>,
}

/// Membership of a domain in the local lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalListing {
    Denied,
    Allowed,
}

/// In-memory allow/deny lists, keyed by registrable domain
#[derive(Debug, Clone, Default)]
pub struct LocalSourceList {
    allow: HashSet<String>,
    deny: HashSet<String>,
}

impl LocalSourceList {
    pub fn new<A, D>(allow: A, deny: D) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let normalize = |entry: &str| registrable_domain(entry);
        Self {
            allow: allow.into_iter().map(|d| normalize(d.as_ref())).collect(),
            deny: deny.into_iter().map(|d| normalize(d.as_ref())).collect(),
        }
    }

    /// Load the lists from a JSON file; any failure yields two empty lists
    pub fn load(path: &str) -> Self {
        let path = Path::new(path);

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read source lists, using empty lists");
                return Self::default();
            }
        };

        match serde_json::from_str::<SourceListFile>(&contents) {
            Ok(file) => {
                let lists = Self::new(file.allow, file.deny);
                tracing::info!(
                    path = %path.display(),
                    allowed = lists.allow.len(),
                    denied = lists.deny.len(),
                    "Loaded local source lists"
                );
                lists
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse source lists, using empty lists");
                Self::default()
            }
        }
    }

    /// Look a domain up; the deny-list wins when a domain appears in both lists
    pub fn lookup(&self, domain: &str) -> Option<LocalListing> {
        if self.deny.contains(domain) {
            Some(LocalListing::Denied)
        } else if self.allow.contains(domain) {
            Some(LocalListing::Allowed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_deny_wins_over_allow() {
        let lists = LocalSourceList::new(["both.com", "good.fr"], ["both.com"]);
        assert_eq!(lists.lookup("both.com"), Some(LocalListing::Denied));
        assert_eq!(lists.lookup("good.fr"), Some(LocalListing::Allowed));
        assert_eq!(lists.lookup("other.org"), None);
    }

    #[test]
    fn test_entries_are_normalized() {
        let lists = LocalSourceList::new(["https://www.LeMonde.fr/"], Vec::<String>::new());
        assert_eq!(lists.lookup("lemonde.fr"), Some(LocalListing::Allowed));
    }

    #[test]
    fn test_load_legacy_field_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"whitelist": ["lemonde.fr"], "blacklist": ["fake.net"]}}"#).unwrap();

        let lists = LocalSourceList::load(file.path().to_str().unwrap());
        assert_eq!(lists.lookup("lemonde.fr"), Some(LocalListing::Allowed));
        assert_eq!(lists.lookup("fake.net"), Some(LocalListing::Denied));
    }

    #[test]
    fn test_missing_or_malformed_file_yields_empty_lists() {
        let missing = LocalSourceList::load("/nonexistent/sources.json");
        assert_eq!(missing.lookup("lemonde.fr"), None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let malformed = LocalSourceList::load(file.path().to_str().unwrap());
        assert_eq!(malformed.lookup("lemonde.fr"), None);
    }
}
