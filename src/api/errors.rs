use thiserror::Error;
use url::Url;

use crate::errors::RequestFailure;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("[E301] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://sourcify.dev/server\n  • Ensure the URL includes the protocol (http:// or https://)")]
    CannotBeBase(Url),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Failure(#[from] RequestFailure),

    #[error("[E303] Failed to encode verification payload: {0}\n\nSuggestions:\n  • Recompile the project, the embedded metadata may be corrupted")]
    Encode(serde_json::Error),

    #[error("[E304] Verification service returned no result for {0}\n\nSuggestions:\n  • Check that the address is deployed on the selected network\n  • Try again later, the service may be degraded")]
    EmptyResult(Url),

    #[error("[E305] Failed to decode verification response: {0}\n\nSuggestions:\n  • Check that --api-url points at a Sourcify server\n  • Run with --debug to see the raw response")]
    Decode(serde_json::Error),
}

impl ApiClientError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E301",
            Self::Reqwest(_) => "E999", // Network errors get generic code
            Self::Failure(_) => "E302",
            Self::Encode(_) => "E303",
            Self::EmptyResult(_) => "E304",
            Self::Decode(_) => "E305",
        }
    }
}
