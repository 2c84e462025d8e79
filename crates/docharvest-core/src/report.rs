//! Serializable summary of a run for callers that present or store results.

use serde::Serialize;

use crate::error::FailureKind;
use crate::model::RunResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Archived,
    Failed,
}

/// One input item's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// 1-based input position.
    pub index: usize,
    pub url: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub archive_name: String,
    pub archive_mime_type: String,
    pub rows: Vec<ReportRow>,
}

impl RunReport {
    pub fn from_result(result: &RunResult) -> Self {
        let rows = result
            .outcomes
            .iter()
            .map(|o| {
                let mut row = ReportRow {
                    index: o.item.position(),
                    url: o.item.url.clone(),
                    status: RowStatus::Archived,
                    entry_name: None,
                    asset_url: None,
                    size_bytes: None,
                    sha256: None,
                    failure_kind: None,
                    reason: None,
                };
                match &o.result {
                    Ok(entry) => {
                        row.entry_name = Some(entry.entry_name.clone());
                        row.asset_url = Some(entry.asset_url.clone());
                        row.size_bytes = Some(entry.size_bytes);
                        row.sha256 = Some(entry.sha256.clone());
                    }
                    Err(e) => {
                        row.status = RowStatus::Failed;
                        row.failure_kind = Some(e.kind());
                        row.reason = Some(e.to_string());
                    }
                }
                row
            })
            .collect();

        Self {
            total: result.total(),
            succeeded: result.success_count,
            failed: result.failure_count,
            cancelled: result.cancelled,
            archive_name: result.archive.suggested_filename.clone(),
            archive_mime_type: result.archive.mime_type().to_string(),
            rows,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
