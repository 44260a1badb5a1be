//! Patient endpoints (`/patients`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{OrthancClient, error::ApiError};

/// Expanded patient resource as returned by `patients/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientDetail {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub is_stable: bool,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub main_dicom_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub studies: Vec<String>,
    #[serde(rename = "Type", default)]
    pub kind: String,
}

impl OrthancClient {
    /// List up to `limit` patients starting at offset `since`, expanded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails, the server returns a
    /// non-success status, or the body cannot be decoded.
    pub async fn patient_details_since(
        &self,
        since: u64,
        limit: u32,
    ) -> Result<Vec<PatientDetail>, ApiError> {
        let url = self.endpoint(
            "patients",
            Some(&format!("since={since}&limit={limit}&expand")),
        )?;
        self.get_json(url).await
    }

    /// Fetch a single patient by Orthanc identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 if the patient does not
    /// exist, or another [`ApiError`] on transport and decode failures.
    pub async fn patient(&self, id: &str) -> Result<PatientDetail, ApiError> {
        let url = self.endpoint(&format!("patients/{}", urlencoding::encode(id)), None)?;
        self.get_json(url).await
    }
}
