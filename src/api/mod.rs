// Re-export the API module components
pub use self::{
    client::{ApiClient, DEFAULT_API_URL, DEFAULT_REPOSITORY_URL},
    errors::ApiClientError,
    models::{VerificationRequest, VerificationResponse, VerificationResult, METADATA_FILE},
    types::MatchStatus,
};

// Module declarations
mod client;
mod errors;
mod models;
mod types;
