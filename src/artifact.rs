use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, io};
use thiserror::Error;

/// Per-contract JSON file written by the build tool into the contracts
/// build directory.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,

    /// Compiler metadata, embedded as a JSON encoded string.
    #[serde(default)]
    pub metadata: String,

    #[serde(default)]
    pub networks: BTreeMap<String, Deployment>,

    pub ast: Option<Ast>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ast {
    pub absolute_path: String,
}

/// A deployed instance of the contract on one network.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: String,

    /// Library name to deployed library address.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("[E101] Artifact for contract '{name}' not found at: {path}\n\nSuggestions:\n  • Compile the project before verifying\n  • Check the contract name spelling, it is case sensitive\n  • Use --build-dir if artifacts are written somewhere else")]
    NotFound { name: String, path: Utf8PathBuf },

    #[error("[E102] Failed to read artifact {path}: {source}\n\nSuggestions:\n  • Check file permissions\n  • Verify the build directory is accessible")]
    Io { path: Utf8PathBuf, source: io::Error },

    #[error("[E103] Artifact {path} is not valid JSON: {source}\n\nSuggestions:\n  • Recompile the project to regenerate build artifacts\n  • Verify the file was produced by a supported build tool")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("No instance of contract {name} found for network id {network_id}")]
    NoDeployment { name: String, network_id: u64 },

    #[error("[E105] Artifact for contract '{0}' has no source AST\n\nSuggestions:\n  • Recompile the project, the AST is required to locate the main source file")]
    MissingAst(String),
}

impl ArtifactError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E101",
            Self::Io { .. } => "E102",
            Self::Parse { .. } => "E103",
            Self::NoDeployment { .. } => "E104",
            Self::MissingAst(_) => "E105",
        }
    }
}

impl Artifact {
    /// Loads `<build_dir>/<name>.json`.
    ///
    /// Each call parses the file again and returns an owned value, so
    /// callers are free to modify it.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the artifact doesn't exist or can't be parsed.
    pub fn read(name: &str, build_dir: &Utf8Path) -> Result<Self, ArtifactError> {
        let path = artifact_path(name, build_dir);
        let raw = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ArtifactError::NotFound {
                name: name.to_owned(),
                path: path.clone(),
            },
            _ => ArtifactError::Io {
                path: path.clone(),
                source,
            },
        })?;

        serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse { path, source })
    }

    /// # Errors
    ///
    /// Returns [`ArtifactError::NoDeployment`] when the contract was never
    /// deployed on `network_id`.
    pub fn deployment(&self, network_id: u64) -> Result<&Deployment, ArtifactError> {
        self.networks
            .get(&network_id.to_string())
            .ok_or_else(|| ArtifactError::NoDeployment {
                name: self.contract_name.clone(),
                network_id,
            })
    }

    /// Absolute source path of the file declaring this contract, as
    /// recorded by the compiler.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the artifact carries no AST.
    pub fn absolute_path(&self) -> Result<&str, ArtifactError> {
        self.ast
            .as_ref()
            .map(|ast| ast.absolute_path.as_str())
            .ok_or_else(|| ArtifactError::MissingAst(self.contract_name.clone()))
    }
}

#[must_use]
pub fn artifact_path(name: &str, build_dir: &Utf8Path) -> Utf8PathBuf {
    build_dir.join(format!("{name}.json"))
}
