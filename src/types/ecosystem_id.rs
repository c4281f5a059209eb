// ABOUTME: Validated ecosystem identifier (python, java, js, ...).
// ABOUTME: Doubles as the recipe suffix and the LANG_NAME build argument.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcosystemIdError {
    #[error("ecosystem identifier cannot be empty")]
    Empty,

    #[error("ecosystem identifier exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("ecosystem identifier must start with a letter")]
    LeadingNonLetter,

    #[error("ecosystem identifier must be lowercase")]
    NotLowercase,

    #[error("invalid character in ecosystem identifier: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EcosystemId(String);

impl EcosystemId {
    pub fn new(value: &str) -> Result<Self, EcosystemIdError> {
        let Some(first) = value.chars().next() else {
            return Err(EcosystemIdError::Empty);
        };

        if value.len() > MAX_LEN {
            return Err(EcosystemIdError::TooLong);
        }

        if !first.is_ascii_alphabetic() {
            return Err(EcosystemIdError::LeadingNonLetter);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(EcosystemIdError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' && c != '-' {
                return Err(EcosystemIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EcosystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EcosystemId {
    type Err = EcosystemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for EcosystemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EcosystemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}
