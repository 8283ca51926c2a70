use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::ApiClientError;
use super::types::MatchStatus;
use crate::input::CompilerInput;

/// File name under which the compiler metadata is submitted.
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Deserialize)]
pub struct Error {
    pub error: String,
}

/// Body of a verification submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    pub address: String,
    pub chain: String,
    /// Bare file name to file content.
    pub files: BTreeMap<String, String>,
}

impl VerificationRequest {
    /// Flattens the sources of `input` into bare file names and attaches
    /// the compiler metadata.
    ///
    /// Sources sharing a file name in different directories overwrite
    /// each other; the last one in submission order wins.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `metadata` isn't valid JSON.
    pub fn new(
        address: impl Into<String>,
        chain_id: u64,
        input: &CompilerInput,
        metadata: &str,
    ) -> Result<Self, ApiClientError> {
        let mut files: BTreeMap<String, String> = input
            .sources
            .iter()
            .map(|(path, source)| (file_name(path).to_owned(), source.content.clone()))
            .collect();

        let metadata: serde_json::Value =
            serde_json::from_str(metadata).map_err(ApiClientError::Encode)?;
        files.insert(
            METADATA_FILE.to_owned(),
            serde_json::to_string(&metadata).map_err(ApiClientError::Encode)?,
        );

        Ok(Self {
            address: address.into(),
            chain: chain_id.to_string(),
            files,
        })
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

#[derive(Debug, Deserialize)]
pub struct VerificationResponse {
    pub result: Vec<VerificationResult>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub address: String,
    pub status: MatchStatus,
    /// Set when the contract had been verified by an earlier submission.
    pub storage_timestamp: Option<String>,
}
