mod args;
use crate::args::Args;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use std::env;
use sourcify_verify::{
    api::ApiClient,
    config::{Config, ConfigError, NetworkConfig, CONFIG_FILE},
    contract_pair::{ContractPair, ContractPairError},
    network::{resolve_network_ids, HttpProvider, Provider},
    verify::{Options, Verifier},
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        "info,sourcify_verify=debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.contracts.is_empty() {
        return Err(ConfigError::NoContracts.into());
    }
    let contracts = parse_contracts(&args.contracts)?;

    let project_dir = absolute(&args.working_directory)?;
    let config_path = args
        .config
        .unwrap_or_else(|| project_dir.join(CONFIG_FILE));
    let config = Config::load(&config_path)?;

    let network = config.network(&args.network)?;
    let provider = rpc_provider(network);
    let ids = resolve_network_ids(
        provider.as_ref().map(|p| p as &dyn Provider),
        network.network_id,
    );
    info!("Using network '{}' ({ids})", args.network);

    let build_dir = args
        .build_dir
        .map_or_else(|| config.build_dir(&project_dir), |dir| project_dir.join(dir));
    let api_url = match args.api_url {
        Some(url) => url,
        None => config.api_url()?,
    };
    let client = ApiClient::new(api_url, config.repository_url()?)?;

    let verifier = Verifier::new(
        Options {
            project_dir,
            build_dir,
            network: ids,
            dry_run: args.dry_run,
        },
        client,
    );

    let succeeded = verifier.verify_all(&contracts).into_result()?;
    info!("Successfully verified {succeeded} contract(s).");
    Ok(())
}

/// Malformed tokens are reported through `run` so the exit code is 1
/// rather than clap's usage code.
fn parse_contracts(raw: &[String]) -> Result<Vec<ContractPair>, ContractPairError> {
    raw.iter().map(String::as_str).map(ContractPair::new).collect()
}

fn rpc_provider(network: &NetworkConfig) -> Option<HttpProvider> {
    match network.rpc_url() {
        Ok(url) => url.map(HttpProvider::new),
        Err(err) => {
            debug!("Ignoring RPC endpoint of network: {err}");
            None
        }
    }
}

fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = Utf8PathBuf::try_from(env::current_dir()?)?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sourcify-verify").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_malformed_contract_fails_run() {
        let args = args(&["Token@0x12"]);
        assert_eq!(args.contracts, vec!["Token@0x12"]);

        let err = run(args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContractPairError>(),
            Some(&ContractPairError::Address("0x12".to_owned()))
        );
    }

    #[test]
    fn test_no_contracts_fails_run() {
        let err = run(args(&[])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NoContracts)
        ));
    }

    #[test]
    fn test_parse_contracts() {
        let pairs = parse_contracts(&["MetaCoin".to_owned(), "ConvertLib".to_owned()]).unwrap();
        assert_eq!(pairs[0].name, "MetaCoin");
        assert_eq!(pairs[1].name, "ConvertLib");
        assert!(parse_contracts(&["MetaCoin".to_owned(), "1Bad".to_owned()]).is_err());
    }

    fn network(url: Option<&str>, host: Option<&str>) -> NetworkConfig {
        NetworkConfig {
            network_id: 5,
            url: url.map(str::to_owned),
            host: host.map(str::to_owned),
            port: None,
        }
    }

    #[test]
    fn test_invalid_rpc_url_means_no_provider() {
        let network = network(Some("not a url"), None);
        let provider = rpc_provider(&network);
        assert!(provider.is_none());

        let ids = resolve_network_ids(
            provider.as_ref().map(|p| p as &dyn Provider),
            network.network_id,
        );
        assert_eq!(ids.chain_id, 5);
        assert_eq!(ids.network_id, 5);
    }

    #[test]
    fn test_valid_rpc_endpoint_builds_provider() {
        assert!(rpc_provider(&network(Some("http://127.0.0.1:8545"), None)).is_some());
        assert!(rpc_provider(&network(None, Some("127.0.0.1"))).is_some());
        assert!(rpc_provider(&network(None, None)).is_none());
    }
}
