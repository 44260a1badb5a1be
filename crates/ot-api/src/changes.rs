//! Change log endpoints (`/changes`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OrthancClient, error::ApiError};

/// Level of the DICOM hierarchy a change refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Patient,
    Study,
    Series,
    Instance,
}

impl ResourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Study => "Study",
            Self::Series => "Series",
            Self::Instance => "Instance",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the server's change log.
///
/// Serializes to the same shape Orthanc returns, which is also the record
/// handed to external actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeEntry {
    /// Position in the log. Strictly increasing, never reused.
    pub seq: u64,
    /// Kind of change (`NewInstance`, `StablePatient`, `Deleted`, ...).
    pub change_type: String,
    pub resource_type: ResourceType,
    #[serde(rename = "ID")]
    pub resource_id: String,
    /// REST path of the resource, e.g. `/studies/<id>`.
    #[serde(default)]
    pub path: String,
    /// Server-local timestamp, `YYYYMMDDTHHMMSS`.
    #[serde(rename = "Date")]
    pub timestamp: String,
}

/// One page of the change log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogPage {
    pub entries: Vec<ChangeEntry>,
    /// Highest sequence number in the log when the page was served.
    pub last_seq: u64,
    /// No entries exist beyond this page (yet).
    pub is_at_end: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangesResponse {
    #[serde(default)]
    changes: Vec<ChangeEntry>,
    done: bool,
    last: u64,
}

impl From<ChangesResponse> for LogPage {
    fn from(resp: ChangesResponse) -> Self {
        Self {
            entries: resp.changes,
            last_seq: resp.last,
            is_at_end: resp.done,
        }
    }
}

impl OrthancClient {
    /// Fetch up to `limit` changes with a sequence number greater than `since`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails, the server returns a
    /// non-success status, or the body cannot be decoded.
    pub async fn changes(&self, since: u64, limit: u32) -> Result<LogPage, ApiError> {
        let url = self.endpoint("changes", Some(&format!("since={since}&limit={limit}")))?;
        let resp: ChangesResponse = self.get_json(url).await?;
        tracing::debug!(
            since,
            count = resp.changes.len(),
            last = resp.last,
            done = resp.done,
            "fetched changes"
        );
        Ok(resp.into())
    }

    /// Fetch the most recent change and the current tail of the log.
    ///
    /// The entry is `None` when the log is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails, the server returns a
    /// non-success status, or the body cannot be decoded.
    pub async fn last_change(&self) -> Result<(Option<ChangeEntry>, u64), ApiError> {
        let url = self.endpoint("changes", Some("last"))?;
        let resp: ChangesResponse = self.get_json(url).await?;
        Ok((resp.changes.into_iter().last(), resp.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "Changes": [
            {
                "ChangeType": "NewInstance",
                "Date": "20240312T101500",
                "ID": "19816330-cb02e1cf-df3a8fe8-bf510623-ccefe9f5",
                "Path": "/instances/19816330-cb02e1cf-df3a8fe8-bf510623-ccefe9f5",
                "ResourceType": "Instance",
                "Seq": 921
            },
            {
                "ChangeType": "StableStudy",
                "Date": "20240312T101600",
                "ID": "27f7126f-4f66fb14-03f4081b-f9341db2-53925988",
                "Path": "/studies/27f7126f-4f66fb14-03f4081b-f9341db2-53925988",
                "ResourceType": "Study",
                "Seq": 922
            }
        ],
        "Done": false,
        "Last": 4012
    }"#;

    #[test]
    fn parse_changes_response() {
        let page: LogPage = serde_json::from_str::<ChangesResponse>(FIXTURE).unwrap().into();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.last_seq, 4012);
        assert!(!page.is_at_end);

        let first = &page.entries[0];
        assert_eq!(first.seq, 921);
        assert_eq!(first.change_type, "NewInstance");
        assert_eq!(first.resource_type, ResourceType::Instance);
        assert_eq!(first.timestamp, "20240312T101500");
        assert_eq!(page.entries[1].resource_type, ResourceType::Study);
    }

    #[test]
    fn parse_empty_log() {
        let resp: ChangesResponse =
            serde_json::from_str(r#"{"Changes": [], "Done": true, "Last": 0}"#).unwrap();
        let page = LogPage::from(resp);
        assert!(page.entries.is_empty());
        assert!(page.is_at_end);
    }

    #[test]
    fn entry_serializes_in_orthanc_shape() {
        let entry = ChangeEntry {
            seq: 7,
            change_type: "NewPatient".into(),
            resource_type: ResourceType::Patient,
            resource_id: "abc".into(),
            path: "/patients/abc".into(),
            timestamp: "20240101T000000".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Seq": 7,
                "ChangeType": "NewPatient",
                "ResourceType": "Patient",
                "ID": "abc",
                "Path": "/patients/abc",
                "Date": "20240101T000000"
            })
        );
    }

    #[test]
    fn unknown_resource_type_is_rejected() {
        let raw = r#"{"ChangeType":"X","Date":"","ID":"1","ResourceType":"Frame","Seq":1}"#;
        assert!(serde_json::from_str::<ChangeEntry>(raw).is_err());
    }
}
