//! Cluster Selection
//!
//! Resolves a cluster moniker ("localnet", "devnet", ...) or a raw RPC URL into
//! an endpoint and builds Solana Explorer links for transactions and addresses.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::form_urlencoded;

/// Local test validator RPC endpoint
pub const LOCALNET_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
pub const TESTNET_RPC_URL: &str = "https://api.testnet.solana.com";
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// `customUrl` the explorer is pointed at for a local validator
const LOCALNET_EXPLORER_RPC: &str = "http://localhost:8899";

const EXPLORER_BASE_URL: &str = "https://explorer.solana.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClusterError {
    #[error("Unknown cluster moniker: {0} (expected mainnet, devnet, testnet, localnet or an http(s) URL)")]
    UnknownMoniker(String),
}

/// Target cluster for RPC calls and explorer links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    Mainnet,
    Devnet,
    Testnet,
    Localnet,
    /// Any other RPC endpoint
    Custom(String),
}

impl Cluster {
    /// RPC endpoint for this cluster
    pub fn rpc_url(&self) -> &str {
        match self {
            Cluster::Mainnet => MAINNET_RPC_URL,
            Cluster::Devnet => DEVNET_RPC_URL,
            Cluster::Testnet => TESTNET_RPC_URL,
            Cluster::Localnet => LOCALNET_RPC_URL,
            Cluster::Custom(url) => url,
        }
    }

    /// Explorer link for a transaction signature
    pub fn explorer_tx_link(&self, signature: impl fmt::Display) -> String {
        self.explorer_link("tx", &signature.to_string())
    }

    /// Explorer link for an account address
    pub fn explorer_address_link(&self, address: impl fmt::Display) -> String {
        self.explorer_link("address", &address.to_string())
    }

    fn explorer_link(&self, kind: &str, id: &str) -> String {
        let base = format!("{}/{}/{}", EXPLORER_BASE_URL, kind, id);
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self {
            Cluster::Mainnet => return base,
            Cluster::Devnet => query.append_pair("cluster", "devnet"),
            Cluster::Testnet => query.append_pair("cluster", "testnet"),
            Cluster::Localnet => query
                .append_pair("cluster", "custom")
                .append_pair("customUrl", LOCALNET_EXPLORER_RPC),
            Cluster::Custom(url) => query
                .append_pair("cluster", "custom")
                .append_pair("customUrl", url),
        };
        format!("{}?{}", base, query.finish())
    }
}

impl FromStr for Cluster {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Cluster::Custom(trimmed.to_string()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            _ => Err(ClusterError::UnknownMoniker(s.to_string())),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Mainnet => write!(f, "mainnet"),
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{}", url),
        }
    }
}
