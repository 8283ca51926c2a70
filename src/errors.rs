use itertools::Itertools;
use reqwest::StatusCode;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

use crate::contract_pair::ContractPair;

#[derive(Debug, Error)]
pub struct RequestFailure {
    pub url: Url,
    pub status: StatusCode,
    pub msg: String,
}

impl RequestFailure {
    pub fn new(url: Url, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            url,
            status,
            msg: msg.into(),
        }
    }

    fn suggestions(&self) -> &'static [&'static str] {
        match self.status {
            StatusCode::NOT_FOUND => &[
                "Check that the URL is correct",
                "Verify the service exposes the verification endpoint",
            ],
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => &[
                "Check that the address is deployed on the selected chain",
                "Verify the sources haven't changed since deployment",
                "Confirm the chain is supported by the verification service",
            ],
            StatusCode::PAYLOAD_TOO_LARGE => &["Remove unused imports to reduce the number of submitted files"],
            StatusCode::TOO_MANY_REQUESTS => &[
                "Wait a moment before retrying",
                "Consider reducing request frequency",
            ],
            status if status.is_server_error() => &[
                "The verification service is having problems, try again later",
            ],
            _ => &["Check the server response above for details"],
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[E302] Request to {} failed with status {}",
            self.url, self.status
        )?;
        writeln!(formatter, "\nServer response: {}", self.msg)?;
        writeln!(formatter, "\nSuggestions:")?;
        for suggestion in self.suggestions() {
            writeln!(formatter, "  • {suggestion}")?;
        }
        Ok(())
    }
}

/// Contracts that could not be verified during a run.
#[derive(Debug, Error)]
pub struct FailedContracts {
    pub failed: Vec<ContractPair>,
}

impl FailedContracts {
    #[must_use]
    pub const fn new(failed: Vec<ContractPair>) -> Self {
        Self { failed }
    }
}

impl fmt::Display for FailedContracts {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "Failed to verify {} contract(s): {}",
            self.failed.len(),
            self.failed.iter().join(", ")
        )
    }
}
