use regex::Regex;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A contract to verify, given on the command line as `Name` or
/// `Name@0xAddress`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContractPair {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractPairError {
    #[error("[E501] '{0}' is not a valid contract name\n\nSuggestions:\n  • Use the contract name exactly as declared in the source file\n  • Expected format: Name or Name@0x<40 hexadecimal characters>")]
    Name(String),
    #[error("[E502] '{0}' is not a valid contract address\n\nSuggestions:\n  • Check that the address starts with '0x'\n  • Expected format: 0x followed by 40 hexadecimal characters")]
    Address(String),
    #[error("Contract pair regex error")]
    Regex(#[from] regex::Error),
}

impl ContractPairError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Name(_) => "E501",
            Self::Address(_) => "E502",
            Self::Regex(_) => "E999",
        }
    }
}

impl ContractPair {
    const NAME_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*$";
    const ADDRESS_PATTERN: &str = r"^0x[a-fA-F0-9]{40}$";

    /// # Errors
    ///
    /// Will fail if the name isn't a valid identifier or the address, when
    /// present, isn't `0x` followed by 40 hexadecimal digits.
    pub fn new(raw: &str) -> Result<Self, ContractPairError> {
        let (name, address) = match raw.split_once('@') {
            Some((name, address)) => (name, Some(address)),
            None => (raw, None),
        };

        if !Regex::new(Self::NAME_PATTERN)?.is_match(name) {
            return Err(ContractPairError::Name(name.to_owned()));
        }

        if let Some(address) = address {
            if !Regex::new(Self::ADDRESS_PATTERN)?.is_match(address) {
                return Err(ContractPairError::Address(address.to_owned()));
            }
        }

        Ok(Self {
            name: name.to_owned(),
            address: address.map(str::to_owned),
        })
    }
}

impl FromStr for ContractPair {
    type Err = ContractPairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ContractPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{}@{}", self.name, address),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_name_and_address() {
        let pair = ContractPair::new(&format!("Token@{ADDRESS}")).unwrap();
        assert_eq!(pair.name, "Token");
        assert_eq!(pair.address.as_deref(), Some(ADDRESS));
        assert_eq!(pair.to_string(), format!("Token@{ADDRESS}"));
    }

    #[test]
    fn test_name_only() {
        let pair: ContractPair = "MetaCoin".parse().unwrap();
        assert_eq!(pair.address, None);
        assert_eq!(pair.to_string(), "MetaCoin");
    }

    #[test]
    fn test_invalid_name() {
        assert_eq!(
            ContractPair::new("1Token"),
            Err(ContractPairError::Name("1Token".to_owned()))
        );
        assert!(ContractPair::new(&format!("@{ADDRESS}")).is_err());
        assert!(ContractPair::new("").is_err());
    }

    #[test]
    fn test_invalid_address() {
        assert_eq!(
            ContractPair::new("Token@0x123"),
            Err(ContractPairError::Address("0x123".to_owned()))
        );
        assert!(ContractPair::new("Token@").is_err());
    }
}
