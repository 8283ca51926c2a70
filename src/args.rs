use camino::Utf8PathBuf;
use reqwest::Url;

#[derive(clap::Parser)]
#[command(name = "sourcify-verify")]
#[command(author = "Nethermind")]
#[command(version)]
#[command(about = "Verify deployed smart contracts on Sourcify")]
#[command(long_about = "
A command-line tool for verifying deployed smart contracts on Sourcify.

The compiler input of every contract is rebuilt from its build artifact and
submitted together with the address the contract is deployed at on the
selected network. Networks are declared in sourcify.toml.

Examples:
  # Verify two contracts deployed on goerli
  sourcify-verify MetaCoin ConvertLib --network goerli

  # Name the address explicitly
  sourcify-verify MetaCoin@0x5FbDB2315678afecb367f032d93F642f64180aa3 --network goerli

  # Preview the submitted files without sending anything
  sourcify-verify MetaCoin --network goerli --dry-run
")]
pub struct Args {
    /// Contracts to verify, as Name or Name@Address
    #[arg(value_name = "NAME[@ADDRESS]")]
    pub contracts: Vec<String>,

    /// Network to verify on, as named in the config file
    #[arg(long, default_value = "development")]
    pub network: String,

    /// Print debug output
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Path to the config file (default: <working directory>/sourcify.toml)
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<Utf8PathBuf>,

    /// Project root that sources are resolved against
    #[arg(
        long,
        value_name = "DIR",
        value_hint = clap::ValueHint::DirPath,
        default_value = "."
    )]
    pub working_directory: Utf8PathBuf,

    /// Directory holding the build artifacts, overrides the config file
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub build_dir: Option<Utf8PathBuf>,

    /// Verification API endpoint, overrides the config file
    #[arg(long, value_name = "URL", value_hint = clap::ValueHint::Url, value_parser = Url::parse)]
    pub api_url: Option<Url>,

    /// Perform dry run (preview what would be submitted without sending)
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
