//! Random identifiers and the generator that produces them.
//!
//! An identifier is a 36-character string laid out like a hyphenated UUID:
//! `xxxxxxxx-xxxx-4xxx-Yxxx-xxxxxxxxxxxx`, lowercase hex, with `Y` one of
//! `8`, `9`, `a` or `b`.

mod entropy;
mod generator;
mod monitor;

pub use entropy::{EntropySource, OsEntropy, SequenceEntropy};
pub use generator::{
    generate_identifier, render, IdentifierGenerator, BYTES_PER_IDENTIFIER, TEMPLATE,
};
pub use monitor::{CollisionMonitor, IdentifierEvent, IdentifierEventListener};

use crate::errors::IdentifierParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of an identifier in characters.
pub const IDENTIFIER_LEN: usize = 36;

/// Zero-based positions of the hyphen separators.
pub const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A generated identifier.
///
/// Values can only be built by the generator or by parsing, so every
/// `Identifier` has the 36-character layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Wraps a string already known to have the identifier layout.
    pub(crate) const fn from_rendered(value: String) -> Self {
        Self(value)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier and returns the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the hex digit at the version position (`4` for generated values).
    #[must_use]
    pub fn version_digit(&self) -> char {
        char::from(self.0.as_bytes()[14])
    }

    /// Returns the hex digit at the variant position.
    #[must_use]
    pub fn variant_digit(&self) -> char {
        char::from(self.0.as_bytes()[19])
    }

    /// Interprets the identifier as a UUID.
    pub fn to_uuid(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(self.as_str())
    }

    /// Checks that `value` has the identifier layout.
    pub fn validate(value: &str) -> Result<(), IdentifierParseError> {
        if value.len() != IDENTIFIER_LEN {
            return Err(IdentifierParseError::InvalidLength {
                length: value.len(),
            });
        }

        for (position, found) in value.chars().enumerate() {
            if HYPHEN_POSITIONS.contains(&position) {
                if found != '-' {
                    return Err(IdentifierParseError::MissingHyphen { position, found });
                }
            } else if !matches!(found, '0'..='9' | 'a'..='f') {
                return Err(IdentifierParseError::InvalidDigit { position, found });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The payload-less signal a host sends on its request port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentifierRequest;
