use crate::api::error::ApiError;
use crate::consts::cli_consts::EXPORT_FILE_STEM;
use crate::environment::Environment;
use crate::fleet::{IssueKind, MachineRecord};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub(crate) mod client;
pub use client::ComplianceClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Server-side filters accepted by the collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineQuery {
    pub os: Option<String>,
    pub issue: Option<IssueKind>,
}

impl MachineQuery {
    /// Query string for `/machines`, empty when no filter is set.
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(os) = &self.os {
            params.push(format!("os={}", urlencoding::encode(os)));
        }
        if let Some(issue) = self.issue {
            params.push(format!("issue={}", issue.as_str()));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Export document formats offered by the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// File name the server suggests for this export.
    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unsupported export format '{}', expected json or csv", other)),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ComplianceApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetch every machine's latest report, optionally filtered by the server.
    async fn list_machines(&self, query: &MachineQuery) -> Result<Vec<MachineRecord>, ApiError>;

    /// Fetch the latest report for one machine.
    async fn get_machine(&self, machine_id: &str) -> Result<MachineRecord, ApiError>;

    /// Download location of the export document.
    fn export_url(&self, format: ExportFormat) -> String;

    /// Download the export document.
    async fn download_export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_encodes_filters() {
        assert_eq!(MachineQuery::default().to_query_string(), "");
        let query = MachineQuery {
            os: Some("Windows 11".to_string()),
            issue: Some(IssueKind::NoAntivirus),
        };
        assert_eq!(query.to_query_string(), "?os=Windows%2011&issue=no_antivirus");
    }

    #[test]
    fn export_formats() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.file_name(), "machines_data.json");
        assert_eq!(ExportFormat::Csv.to_string(), "CSV");
    }
}
