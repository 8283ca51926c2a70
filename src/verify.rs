use camino::Utf8PathBuf;
use itertools::Itertools;
use log::{debug, error, info};
use thiserror::Error;

use crate::{
    api::{ApiClient, ApiClientError, VerificationRequest, VerificationResult},
    artifact::{Artifact, ArtifactError},
    contract_pair::ContractPair,
    errors::FailedContracts,
    input::{CompilerInput, InputError, Metadata},
    network::NetworkIds,
};

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Api(#[from] ApiClientError),
}

impl VerifyError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Artifact(e) => e.error_code(),
            Self::Input(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
        }
    }
}

/// Everything a run needs to know about the project and target network.
#[derive(Clone, Debug)]
pub struct Options {
    pub project_dir: Utf8PathBuf,
    pub build_dir: Utf8PathBuf,
    pub network: NetworkIds,
    /// Build payloads without submitting them.
    pub dry_run: bool,
}

/// What happened to one contract.
#[derive(Debug)]
pub enum Outcome {
    Verified(Vec<VerificationResult>),
    DryRun(VerificationRequest),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: Vec<ContractPair>,
}

impl Summary {
    /// # Errors
    ///
    /// Will return `Err` listing the failed contracts if there are any.
    pub fn into_result(self) -> Result<usize, FailedContracts> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(FailedContracts::new(self.failed))
        }
    }
}

pub struct Verifier {
    options: Options,
    client: ApiClient,
}

impl Verifier {
    #[must_use]
    pub const fn new(options: Options, client: ApiClient) -> Self {
        Self { options, client }
    }

    /// Builds the verification payload for `pair` without sending it.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the artifact is missing, has no deployment on
    /// the target network, or its sources can't be collected.
    pub fn prepare(&self, pair: &ContractPair) -> Result<VerificationRequest, VerifyError> {
        let Options {
            project_dir,
            build_dir,
            network,
            ..
        } = &self.options;

        let artifact = Artifact::read(&pair.name, build_dir)?;
        let deployment = artifact.deployment(network.network_id)?;

        let metadata = Metadata::from_artifact(&artifact)?;
        debug!(
            "{} was compiled with {}",
            artifact.contract_name,
            metadata.compiler_version()
        );

        let input = CompilerInput::from_metadata(
            &artifact,
            metadata,
            project_dir,
            build_dir,
            network.network_id,
        )?;
        debug!("Collected sources: {}", input.sources.keys().join(", "));

        Ok(VerificationRequest::new(
            deployment.address.clone(),
            network.chain_id,
            &input,
            &artifact.metadata,
        )?)
    }

    /// Verifies a single contract.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the payload can't be built or the service
    /// rejects it.
    pub fn verify(&self, pair: &ContractPair) -> Result<Outcome, VerifyError> {
        let request = self.prepare(pair)?;
        if self.options.dry_run {
            return Ok(Outcome::DryRun(request));
        }

        let response = self.client.verify(&request)?;
        Ok(Outcome::Verified(response.result))
    }

    /// Verifies every contract in turn. A failing contract doesn't stop
    /// the remaining ones.
    pub fn verify_all(&self, pairs: &[ContractPair]) -> Summary {
        let mut summary = Summary::default();

        for pair in pairs {
            info!("Verifying {pair}");
            match self.verify(pair) {
                Ok(outcome) => {
                    self.report(&pair.name, &outcome);
                    summary.succeeded += 1;
                }
                Err(err) => {
                    error!("{err}");
                    summary.failed.push(pair.clone());
                }
            }
        }

        summary
    }

    fn report(&self, name: &str, outcome: &Outcome) {
        match outcome {
            Outcome::DryRun(request) => {
                info!(
                    "Dry run: would submit {} for chain {} with files:",
                    request.address, request.chain
                );
                for file in request.files.keys() {
                    info!("  {file}");
                }
            }
            Outcome::Verified(results) => {
                for result in results {
                    info!("{}", status_line(name, result));
                    match self
                        .client
                        .lookup_url(self.options.network.chain_id, &result.address, result.status)
                    {
                        Ok(url) => info!("View at: {url}"),
                        Err(err) => debug!("Couldn't build lookup URL: {err}"),
                    }
                }
            }
        }
    }
}

/// Human readable outcome of one verification result.
#[must_use]
pub fn status_line(name: &str, result: &VerificationResult) -> String {
    match &result.storage_timestamp {
        Some(timestamp) => format!(
            "{name} at {} is already verified, verification date: {timestamp}",
            result.address
        ),
        None => format!(
            "{name} at {} verified succesfully ({}_match)",
            result.address, result.status
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MatchStatus;

    #[test]
    fn test_status_line_new_verification() {
        let result = VerificationResult {
            address: "0xabc".to_owned(),
            status: MatchStatus::Perfect,
            storage_timestamp: None,
        };
        assert_eq!(
            status_line("Token", &result),
            "Token at 0xabc verified succesfully (perfect_match)"
        );
    }

    #[test]
    fn test_status_line_already_verified() {
        let result = VerificationResult {
            address: "0xabc".to_owned(),
            status: MatchStatus::Partial,
            storage_timestamp: Some("2021-01-12T15:41:56.502Z".to_owned()),
        };
        assert_eq!(
            status_line("Token", &result),
            "Token at 0xabc is already verified, verification date: 2021-01-12T15:41:56.502Z"
        );
    }

    #[test]
    fn test_summary_into_result() {
        assert_eq!(Summary { succeeded: 2, failed: vec![] }.into_result().unwrap(), 2);

        let failed = Summary {
            succeeded: 1,
            failed: vec![ContractPair::new("Token").unwrap()],
        }
        .into_result()
        .unwrap_err();
        assert_eq!(failed.to_string(), "Failed to verify 1 contract(s): Token");
    }
}
