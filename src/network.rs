use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Chain and network identifiers of the target network. They usually
/// match, but nothing guarantees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkIds {
    pub chain_id: u64,
    pub network_id: u64,
}

impl NetworkIds {
    #[must_use]
    pub const fn fallback(id: u64) -> Self {
        Self {
            chain_id: id,
            network_id: id,
        }
    }
}

impl fmt::Display for NetworkIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain id {}, network id {}", self.chain_id, self.network_id)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{method} returned no result")]
    EmptyResult { method: String },

    #[error("{method} returned an unparsable value: {value}")]
    Unparsable { method: String, value: Value },
}

/// Anything able to answer Ethereum JSON-RPC requests.
pub trait Provider {
    /// # Errors
    ///
    /// Will return `Err` on transport failure or when the node answers
    /// with an RPC error.
    fn send_request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC over HTTP.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    url: Url,
    client: Client,
}

impl HttpProvider {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: Client::new(),
        }
    }
}

impl Provider for HttpProvider {
    fn send_request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response: RpcResponse = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(RpcError { code, message }) = response.error {
            return Err(ProviderError::Rpc { code, message });
        }

        response.result.ok_or_else(|| ProviderError::EmptyResult {
            method: method.to_owned(),
        })
    }
}

/// Asks the node for its chain and network ids.
///
/// # Errors
///
/// Will return `Err` if either call fails or returns a zero, empty or
/// unparsable value.
pub fn query_network_ids(provider: &dyn Provider) -> Result<NetworkIds, ProviderError> {
    let chain_id = request_id(provider, "eth_chainId", |raw| {
        u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok()
    })?;
    let network_id = request_id(provider, "net_version", |raw| raw.parse().ok())?;

    Ok(NetworkIds {
        chain_id,
        network_id,
    })
}

fn request_id(
    provider: &dyn Provider,
    method: &str,
    decode: impl Fn(&str) -> Option<u64>,
) -> Result<u64, ProviderError> {
    let value = provider.send_request(method, json!([]))?;
    match value.as_str().and_then(decode) {
        Some(id) if id != 0 => Ok(id),
        _ => Err(ProviderError::Unparsable {
            method: method.to_owned(),
            value,
        }),
    }
}

/// Determines the ids of the target network. The live provider is
/// preferred; without one, or when it misbehaves, both ids fall back to
/// the configured `static_id`.
#[must_use]
pub fn resolve_network_ids(provider: Option<&dyn Provider>, static_id: u64) -> NetworkIds {
    let Some(provider) = provider else {
        debug!("No provider configured, using network id {static_id}");
        return NetworkIds::fallback(static_id);
    };

    match query_network_ids(provider) {
        Ok(ids) => {
            debug!("Resolved {ids} from provider");
            ids
        }
        Err(err) => {
            debug!("Failed to query network ids ({err}), using network id {static_id}");
            NetworkIds::fallback(static_id)
        }
    }
}
