use log::debug;
use reqwest::{
    blocking::{self, Client},
    StatusCode,
};
use url::Url;

use crate::errors::RequestFailure;

use super::errors::ApiClientError;
use super::models::{Error, VerificationRequest, VerificationResponse};
use super::types::MatchStatus;

pub const DEFAULT_API_URL: &str = "https://sourcify.dev/server";
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo.sourcify.dev";

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    repository: Url,
    client: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Fails if either provided `Url` cannot be a base. We rely on that
    /// invariant in other methods.
    pub fn new(base: Url, repository: Url) -> Result<Self, ApiClientError> {
        // Test here so that we are sure path_segments_mut succeeds
        for url in [&base, &repository] {
            if url.cannot_be_a_base() {
                return Err(ApiClientError::CannotBeBase(url.clone()));
            }
        }

        Ok(Self {
            base,
            repository,
            client: blocking::Client::new(),
        })
    }

    /// Where the verified sources can be browsed once the service accepted
    /// them.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn lookup_url(
        &self,
        chain_id: u64,
        address: &str,
        status: MatchStatus,
    ) -> Result<Url, ApiClientError> {
        let chain = chain_id.to_string();
        let mut url = self.repository.clone();
        let url_clone = url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::CannotBeBase(url_clone))?
            .pop_if_empty()
            .extend(&[
                "contracts",
                status.repository_dir(),
                chain.as_str(),
                address,
                "",
            ]);
        Ok(url)
    }

    /// Submits `request` to the verification service.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network failure, on any status other than
    /// 200 (carrying the service's error message), or when the service
    /// answers without a result.
    pub fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse, ApiClientError> {
        let url = self.base.clone();
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .map_err(ApiClientError::Reqwest)?;

        let status = response.status();
        let body = response.text()?;
        debug!("Raw API Response: {body}");

        if status != StatusCode::OK {
            let msg = serde_json::from_str::<Error>(&body).map_or(body, |error| error.error);
            return Err(ApiClientError::from(RequestFailure::new(url, status, msg)));
        }

        let data: VerificationResponse =
            serde_json::from_str(&body).map_err(ApiClientError::Decode)?;
        if data.result.is_empty() {
            return Err(ApiClientError::EmptyResult(url));
        }
        Ok(data)
    }
}
