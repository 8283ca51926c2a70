//! # Sourcify Verify
//!
//! Submits contracts deployed from a build tool project to a Sourcify
//! verification service. The compiler input of each contract is rebuilt
//! from the metadata embedded in its build artifact, its sources are read
//! from disk and the result is posted together with the deployed address.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sourcify_verify::{
//!     api::{ApiClient, DEFAULT_API_URL, DEFAULT_REPOSITORY_URL},
//!     contract_pair::ContractPair,
//!     network::NetworkIds,
//!     verify::{Options, Verifier},
//! };
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(
//!     Url::parse(DEFAULT_API_URL)?,
//!     Url::parse(DEFAULT_REPOSITORY_URL)?,
//! )?;
//! let options = Options {
//!     project_dir: "/home/dev/metacoin".into(),
//!     build_dir: "/home/dev/metacoin/build/contracts".into(),
//!     network: NetworkIds::fallback(5),
//!     dry_run: false,
//! };
//!
//! let summary = Verifier::new(options, client).verify_all(&[ContractPair::new("MetaCoin")?]);
//! println!("verified {} contract(s)", summary.into_result()?);
//! # Ok(())
//! # }
//! ```

/// Sourcify API client and payload types
pub mod api;

/// Build artifact loading
pub mod artifact;

/// Project configuration file
pub mod config;

/// `Name@Address` command line arguments
pub mod contract_pair;

/// Errors shared between modules
pub mod errors;

/// Compiler input reconstruction from artifact metadata
pub mod input;

/// Chain and network id resolution
pub mod network;

/// Source path normalization
pub mod paths;

/// Verification of a list of contracts
pub mod verify;
