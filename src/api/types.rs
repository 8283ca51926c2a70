use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How closely the recompiled bytecode matches the deployed one.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Bytecode and metadata hash both match.
    Perfect,
    /// Bytecode matches but the metadata hash differs.
    Partial,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    /// Directory of the contract repository holding matches of this kind.
    pub const fn repository_dir(self) -> &'static str {
        match self {
            Self::Perfect | Self::Unknown => "full_match",
            Self::Partial => "partial_match",
        }
    }
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Partial => write!(f, "partial"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
