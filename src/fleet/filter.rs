//! Client-side filtering of machine records

use super::record::{CheckKind, MachineRecord};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// OS names offered by the OS filter even before any machine reports them.
pub const KNOWN_OS: [&str; 3] = ["Windows", "Linux", "Darwin"];

/// Failed-check categories the issue filter can select.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IssueKind {
    UnencryptedDisk,
    OutdatedOs,
    NoAntivirus,
    SleepNonCompliant,
}

impl IssueKind {
    pub const ALL: [IssueKind; 4] = [
        IssueKind::UnencryptedDisk,
        IssueKind::OutdatedOs,
        IssueKind::NoAntivirus,
        IssueKind::SleepNonCompliant,
    ];

    /// Query-string value understood by the collection endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::UnencryptedDisk => "unencrypted_disk",
            IssueKind::OutdatedOs => "outdated_os",
            IssueKind::NoAntivirus => "no_antivirus",
            IssueKind::SleepNonCompliant => "sleep_noncompliant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::UnencryptedDisk => "Unencrypted disk",
            IssueKind::OutdatedOs => "Outdated OS",
            IssueKind::NoAntivirus => "No antivirus",
            IssueKind::SleepNonCompliant => "Sleep non-compliant",
        }
    }

    pub fn check(&self) -> CheckKind {
        match self {
            IssueKind::UnencryptedDisk => CheckKind::DiskEncryption,
            IssueKind::OutdatedOs => CheckKind::OsUpdate,
            IssueKind::NoAntivirus => CheckKind::Antivirus,
            IssueKind::SleepNonCompliant => CheckKind::SleepSettings,
        }
    }

    /// Only an explicit `false` verdict counts; unknown is not an issue.
    pub fn has_issue(&self, record: &MachineRecord) -> bool {
        record.check_value(self.check()) == Some(false)
    }
}

impl FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown issue '{}', expected one of: unencrypted_disk, outdated_os, no_antivirus, sleep_noncompliant",
                    s
                )
            })
    }
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Active filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact OS name; `None` shows every OS.
    pub os: Option<String>,
    pub issue: Option<IssueKind>,
    /// Case-insensitive substring of the machine ID.
    pub search: String,
}

impl FilterCriteria {
    pub fn matches(&self, record: &MachineRecord) -> bool {
        if let Some(os) = &self.os {
            if record.os.as_deref() != Some(os.as_str()) {
                return false;
            }
        }

        if let Some(issue) = self.issue {
            if !issue.has_issue(record) {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !record.machine_id.to_lowercase().contains(&needle) {
            return false;
        }

        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.os.is_some() || self.issue.is_some() || !self.search.trim().is_empty()
    }

    /// Advance the OS filter through `All -> options... -> All`.
    pub fn cycle_os(&mut self, options: &[String]) {
        self.os = match &self.os {
            None => options.first().cloned(),
            Some(current) => options
                .iter()
                .position(|o| o == current)
                .and_then(|i| options.get(i + 1))
                .cloned(),
        };
    }

    /// Advance the issue filter through `All -> each issue -> All`.
    pub fn cycle_issue(&mut self) {
        self.issue = match self.issue {
            None => Some(IssueKind::ALL[0]),
            Some(current) => IssueKind::ALL
                .iter()
                .position(|k| *k == current)
                .and_then(|i| IssueKind::ALL.get(i + 1))
                .copied(),
        };
    }
}

/// OS filter choices: the well-known names plus anything else in the data.
pub fn os_options(records: &[MachineRecord]) -> Vec<String> {
    let mut options: Vec<String> = KNOWN_OS.iter().map(|s| s.to_string()).collect();
    for record in records {
        if let Some(os) = record.os.as_deref() {
            if !os.is_empty() && !options.iter().any(|o| o == os) {
                options.push(os.to_string());
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn machine(id: &str, os: &str, encrypted: Option<bool>) -> MachineRecord {
        MachineRecord::from_value(json!({
            "machine_id": id,
            "os": os,
            "disk_encryption": { "encrypted": encrypted },
            "os_update": { "up_to_date": true },
        }))
        .unwrap()
    }

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.matches(&machine("a", "Linux", None)));
        assert!(!criteria.is_active());
    }

    #[test]
    fn os_filter_is_exact() {
        let criteria = FilterCriteria {
            os: Some("Linux".to_string()),
            ..Default::default()
        };
        assert!(criteria.matches(&machine("a", "Linux", None)));
        assert!(!criteria.matches(&machine("b", "linux", None)));
        assert!(!criteria.matches(&machine("c", "Windows", None)));
    }

    #[test]
    fn issue_filter_requires_explicit_failure() {
        let criteria = FilterCriteria {
            issue: Some(IssueKind::UnencryptedDisk),
            ..Default::default()
        };
        assert!(criteria.matches(&machine("a", "Linux", Some(false))));
        assert!(!criteria.matches(&machine("b", "Linux", Some(true))));
        assert!(!criteria.matches(&machine("c", "Linux", None)));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            search: "LAB-0".to_string(),
            ..Default::default()
        };
        assert!(criteria.matches(&machine("win-lab-07", "Windows", None)));
        assert!(!criteria.matches(&machine("win-office-1", "Windows", None)));
    }

    #[test]
    fn criteria_combine_and_clear() {
        let mut criteria = FilterCriteria {
            os: Some("Windows".to_string()),
            issue: Some(IssueKind::UnencryptedDisk),
            search: "lab".to_string(),
        };
        assert!(criteria.matches(&machine("lab-1", "Windows", Some(false))));
        assert!(!criteria.matches(&machine("lab-1", "Linux", Some(false))));
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn cycling_wraps_back_to_all() {
        let options = vec!["Windows".to_string(), "Linux".to_string()];
        let mut criteria = FilterCriteria::default();
        criteria.cycle_os(&options);
        assert_eq!(criteria.os.as_deref(), Some("Windows"));
        criteria.cycle_os(&options);
        assert_eq!(criteria.os.as_deref(), Some("Linux"));
        criteria.cycle_os(&options);
        assert_eq!(criteria.os, None);

        for expected in IssueKind::ALL {
            criteria.cycle_issue();
            assert_eq!(criteria.issue, Some(expected));
        }
        criteria.cycle_issue();
        assert_eq!(criteria.issue, None);
    }

    #[test]
    fn os_options_include_unseen_known_names_and_extras() {
        let records = vec![machine("a", "FreeBSD", None), machine("b", "Linux", None)];
        assert_eq!(
            os_options(&records),
            vec!["Windows", "Linux", "Darwin", "FreeBSD"]
        );
    }

    #[test]
    fn issue_kind_parses_query_values() {
        assert_eq!("outdated_os".parse::<IssueKind>(), Ok(IssueKind::OutdatedOs));
        assert_eq!(
            "SLEEP_NONCOMPLIANT".parse::<IssueKind>(),
            Ok(IssueKind::SleepNonCompliant)
        );
        assert!("bad".parse::<IssueKind>().is_err());
        assert_eq!(IssueKind::NoAntivirus.to_string(), "no_antivirus");
    }
}
