use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CadastralNumberError {
    #[error("cadastral number must have the form RR:DD:BBBBBBB, got {0:?}")]
    Malformed(String),
}

/// Cadastral block number, e.g. `47:14:1203001`.
///
/// Three colon-separated segments: two-digit region, two-digit district and a
/// six- or seven-digit block. The block number is the identity of an extract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CadastralNumber(String);

impl CadastralNumber {
    pub fn parse(raw: &str) -> Result<Self, CadastralNumberError> {
        let segments: Vec<&str> = raw.split(':').collect();
        if segments.len() != 3 {
            return Err(CadastralNumberError::Malformed(raw.to_string()));
        }

        let [region, district, block] = [segments[0], segments[1], segments[2]];
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if region.len() != 2 || !digits(region) {
            return Err(CadastralNumberError::Malformed(raw.to_string()));
        }
        if district.len() != 2 || !digits(district) {
            return Err(CadastralNumberError::Malformed(raw.to_string()));
        }
        if !(6..=7).contains(&block.len()) || !digits(block) {
            return Err(CadastralNumberError::Malformed(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    /// Two-digit region prefix of the number.
    pub fn region_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CadastralNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CadastralNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
