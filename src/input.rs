use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fs, io};
use thiserror::Error;

use crate::{
    artifact::{Artifact, ArtifactError},
    paths,
};

/// Source file → library name → library address.
pub type Libraries = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("[E201] Metadata of contract '{name}' is not valid: {source}\n\nSuggestions:\n  • Recompile the project so the artifact embeds compiler metadata\n  • Check that the artifact was not edited by hand")]
    Metadata {
        name: String,
        source: serde_json::Error,
    },

    #[error("[E202] Source file '{path}' not found (looked at {resolved})\n\nSuggestions:\n  • Verify sources haven't moved since compilation\n  • Install project dependencies so imported packages are available\n  • Run the tool from the project root or pass --working-directory")]
    MissingSource { path: String, resolved: Utf8PathBuf },

    #[error("[E203] Failed to read source file {path}: {source}\n\nSuggestions:\n  • Check file permissions\n  • Ensure the file is valid UTF-8")]
    Io { path: Utf8PathBuf, source: io::Error },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl InputError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Metadata { .. } => "E201",
            Self::MissingSource { .. } => "E202",
            Self::Io { .. } => "E203",
            Self::Artifact(e) => e.error_code(),
        }
    }
}

/// Compiler metadata as embedded in a build artifact. Only the parts
/// needed to rebuild the compiler input are kept.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Metadata {
    pub language: String,
    pub compiler: CompilerInfo,
    /// Sources in the order the compiler declared them.
    pub sources: IndexMap<String, Value>,
    pub settings: MetadataSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CompilerInfo {
    pub version: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSettings {
    #[serde(default)]
    pub remappings: Vec<String>,
    #[serde(default)]
    pub optimizer: Value,
    #[serde(default)]
    pub evm_version: Option<String>,
}

impl Metadata {
    /// # Errors
    ///
    /// Will return `Err` if the embedded metadata isn't valid JSON or
    /// lacks the language, compiler, sources or settings entries.
    pub fn from_artifact(artifact: &Artifact) -> Result<Self, InputError> {
        serde_json::from_str(&artifact.metadata).map_err(|source| InputError::Metadata {
            name: artifact.contract_name.clone(),
            source,
        })
    }

    /// Compiler version in the `v<version>` form used by the compiler
    /// release list, e.g. `v0.8.17+commit.8df45f5f`.
    #[must_use]
    pub fn compiler_version(&self) -> String {
        match semver::Version::parse(&self.compiler.version) {
            Ok(version) => format!("v{version}"),
            Err(_) => format!("v{}", self.compiler.version),
        }
    }
}

/// Standard JSON input the compiler accepts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompilerInput {
    pub language: String,
    pub sources: IndexMap<String, Source>,
    pub settings: Settings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Source {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub remappings: Vec<String>,
    pub optimizer: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
    pub libraries: Libraries,
}

impl CompilerInput {
    /// Rebuilds the compiler input that produced `artifact` from its
    /// embedded metadata, reading every source from disk.
    ///
    /// # Errors
    ///
    /// Fails if the metadata is invalid, a source file is missing or one
    /// of the linked libraries has no artifact in `build_dir`.
    pub fn from_artifact(
        artifact: &Artifact,
        project_dir: &Utf8Path,
        build_dir: &Utf8Path,
        network_id: u64,
    ) -> Result<Self, InputError> {
        let metadata = Metadata::from_artifact(artifact)?;
        Self::from_metadata(artifact, metadata, project_dir, build_dir, network_id)
    }

    /// Same as [`CompilerInput::from_artifact`] for metadata that was
    /// already parsed.
    ///
    /// # Errors
    ///
    /// Fails if a source file is missing or one of the linked libraries
    /// has no artifact in `build_dir`.
    pub fn from_metadata(
        artifact: &Artifact,
        metadata: Metadata,
        project_dir: &Utf8Path,
        build_dir: &Utf8Path,
        network_id: u64,
    ) -> Result<Self, InputError> {
        let main_source = artifact.absolute_path()?;

        let mut sources = IndexMap::with_capacity(metadata.sources.len());
        for path in order_sources(metadata.sources.keys().map(String::as_str), main_source) {
            let content = read_source(path, project_dir)?;
            sources.insert(
                paths::strip_project_prefix(path).to_owned(),
                Source { content },
            );
        }

        let links = &artifact.deployment(network_id)?.links;
        let libraries = resolve_libraries(links, build_dir)?;

        Ok(Self {
            language: metadata.language,
            sources,
            settings: Settings {
                remappings: metadata.settings.remappings,
                optimizer: metadata.settings.optimizer,
                evm_version: metadata.settings.evm_version,
                libraries,
            },
        })
    }
}

/// Orders declared sources for submission: the file declaring the
/// contract goes first, every other file keeps the reverse of its declared
/// position.
pub fn order_sources<'a>(
    declared: impl DoubleEndedIterator<Item = &'a str>,
    main_source: &str,
) -> Vec<&'a str> {
    let mut ordered: Vec<&str> = declared.rev().collect();
    // stable, so only the main source moves
    ordered.sort_by_key(|path| *path != main_source);
    ordered
}

fn read_source(path: &str, project_dir: &Utf8Path) -> Result<String, InputError> {
    let normalized = paths::normalize_source_path(path, project_dir);
    let located =
        paths::locate_source(&normalized, project_dir).ok_or_else(|| InputError::MissingSource {
            path: path.to_owned(),
            resolved: normalized.clone(),
        })?;

    debug!("Reading source {path} from {located}");
    fs::read_to_string(&located).map_err(|source| InputError::Io {
        path: located,
        source,
    })
}

/// Groups linked library addresses by the source file that declares each
/// library, looked up through the library's own artifact.
///
/// # Errors
///
/// Will return `Err` if a linked library has no readable artifact.
pub fn resolve_libraries(
    links: &BTreeMap<String, String>,
    build_dir: &Utf8Path,
) -> Result<Libraries, InputError> {
    let mut libraries = Libraries::new();
    for (name, address) in links {
        let library = Artifact::read(name, build_dir)?;
        let source = paths::strip_project_prefix(library.absolute_path()?).to_owned();
        libraries
            .entry(source)
            .or_default()
            .insert(name.clone(), address.clone());
    }
    Ok(libraries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_main_source_first() {
        let declared = ["project:/contracts/A.sol", "project:/contracts/Main.sol", "project:/contracts/B.sol"];
        let ordered = order_sources(declared.into_iter(), "project:/contracts/Main.sol");
        assert_eq!(
            ordered,
            vec!["project:/contracts/Main.sol", "project:/contracts/B.sol", "project:/contracts/A.sol"]
        );
    }

    #[test]
    fn test_order_without_main_source_is_reversed() {
        let declared = ["a.sol", "b.sol", "c.sol"];
        let ordered = order_sources(declared.into_iter(), "other.sol");
        assert_eq!(ordered, vec!["c.sol", "b.sol", "a.sol"]);
    }

    #[test]
    fn test_order_is_deterministic() {
        let declared = ["x.sol", "main.sol", "y.sol", "z.sol"];
        let first = order_sources(declared.into_iter(), "main.sol");
        let second = order_sources(declared.into_iter(), "main.sol");
        assert_eq!(first, second);
    }

    #[test]
    fn test_metadata_keeps_declared_order() {
        let artifact = Artifact {
            contract_name: "Token".to_owned(),
            metadata: r#"{
                "language": "Solidity",
                "compiler": { "version": "0.8.17+commit.8df45f5f" },
                "sources": { "z.sol": {}, "a.sol": {}, "m.sol": {} },
                "settings": { "optimizer": { "enabled": true, "runs": 200 } }
            }"#
            .to_owned(),
            networks: BTreeMap::new(),
            ast: None,
        };

        let metadata = Metadata::from_artifact(&artifact).unwrap();
        let keys: Vec<&str> = metadata.sources.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z.sol", "a.sol", "m.sol"]);
        assert_eq!(metadata.compiler_version(), "v0.8.17+commit.8df45f5f");
        assert!(metadata.settings.remappings.is_empty());
        assert_eq!(metadata.settings.evm_version, None);
    }

    #[test]
    fn test_invalid_metadata() {
        let artifact = Artifact {
            contract_name: "Broken".to_owned(),
            metadata: "not json".to_owned(),
            networks: BTreeMap::new(),
            ast: None,
        };

        let err = Metadata::from_artifact(&artifact).unwrap_err();
        assert_eq!(err.error_code(), "E201");
        assert!(err.to_string().contains("Broken"));
    }
}
