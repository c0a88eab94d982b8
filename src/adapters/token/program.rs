use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

use super::TokenError;

/// Token program the test mints live under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenProgram {
    /// Token-2022 with extensions (metadata stored on the mint)
    #[default]
    #[serde(rename = "token-2022")]
    Token2022,
    /// Original SPL Token program
    #[serde(rename = "token")]
    Legacy,
}

impl TokenProgram {
    pub fn id(&self) -> Pubkey {
        match self {
            TokenProgram::Token2022 => spl_token_2022::ID,
            TokenProgram::Legacy => spl_token::ID,
        }
    }

    pub fn supports_metadata(&self) -> bool {
        matches!(self, TokenProgram::Token2022)
    }
}

impl FromStr for TokenProgram {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token-2022" | "token2022" => Ok(TokenProgram::Token2022),
            "token" | "spl-token" | "legacy" => Ok(TokenProgram::Legacy),
            other => Err(TokenError::UnknownProgram(other.to_string())),
        }
    }
}

impl fmt::Display for TokenProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenProgram::Token2022 => write!(f, "token-2022"),
            TokenProgram::Legacy => write!(f, "token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids() {
        assert_eq!(
            TokenProgram::Token2022.id().to_string(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
        assert_eq!(
            TokenProgram::Legacy.id().to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("token-2022".parse::<TokenProgram>().unwrap(), TokenProgram::Token2022);
        assert_eq!("token".parse::<TokenProgram>().unwrap(), TokenProgram::Legacy);
        assert!("token-3000".parse::<TokenProgram>().is_err());
        assert_eq!(TokenProgram::Legacy.to_string(), "token");
    }

    #[test]
    fn test_default_is_token_2022() {
        assert_eq!(TokenProgram::default(), TokenProgram::Token2022);
        assert!(TokenProgram::default().supports_metadata());
        assert!(!TokenProgram::Legacy.supports_metadata());
    }
}
