//! Server configuration.
//!
//! Loads a TOML file with `$VAR` / `${VAR}` environment expansion in
//! string values.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 5175
//! rpc_url = "https://api.devnet.solana.com"
//! ipfs_gateway = "https://gateway.pinata.cloud/ipfs/"
//!
//! [custodial]
//! enabled = true
//! keypair_path = "$TREASURY_KEYPAIR"
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` — Path to the configuration file (default: `config.toml`)
//! - `HOST` — Override server bind address
//! - `PORT` — Override server port
//! - `RPC_URL` — Override the ledger RPC endpoint

use std::net::IpAddr;
use std::path::Path;

use mintgate::uri::DEFAULT_IPFS_GATEWAY;
use serde::{Deserialize, Serialize};

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (default: `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Server port (default: `5175`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Ledger RPC endpoint (default: devnet).
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Gateway that `ipfs://` metadata URIs resolve through.
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,

    /// Custodial minting, off unless explicitly enabled.
    #[serde(default)]
    pub custodial: CustodialConfig,
}

/// Configuration for the treasury-signed mint path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustodialConfig {
    /// Whether `/api/mint` is served at all.
    #[serde(default)]
    pub enabled: bool,

    /// Path to the treasury keypair file (JSON byte array). Supports
    /// `$VAR` / `${VAR}` expansion.
    #[serde(default)]
    pub keypair_path: Option<String>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    5175
}

fn default_rpc_url() -> String {
    "https://api.devnet.solana.com".to_owned()
}

fn default_ipfs_gateway() -> String {
    DEFAULT_IPFS_GATEWAY.to_owned()
}

impl ServerConfig {
    /// Loads configuration from the path in the `CONFIG` environment
    /// variable, falling back to `config.toml`. A missing file means
    /// all defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = std::env::var("CONFIG").unwrap_or_else(|_| "config.toml".to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file path, then applies
    /// `HOST`, `PORT`, and `RPC_URL` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = if Path::new(path).exists() {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };

        let mut config: Self = toml::from_str(&expand_env_vars(&content))?;

        if let Ok(host) = std::env::var("HOST")
            && let Ok(addr) = host.parse()
        {
            config.host = addr;
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(url) = std::env::var("RPC_URL") {
            config.rpc_url = url;
        }

        Ok(config)
    }
}

/// Expands `$VAR` and `${VAR}` references from the process
/// environment. Unresolved references stay as written.
fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        rest = &rest[dollar + 1..];

        let (name, consumed, braced) = if let Some(stripped) = rest.strip_prefix('{') {
            match stripped.find('}') {
                Some(close) => (&stripped[..close], close + 2, true),
                None => ("", 0, true),
            }
        } else {
            let end = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            (&rest[..end], end, false)
        };

        if name.is_empty() {
            out.push('$');
        } else if let Ok(value) = std::env::var(name) {
            out.push_str(&value);
            rest = &rest[consumed..];
        } else {
            out.push('$');
            if braced {
                out.push('{');
                out.push_str(name);
                out.push('}');
            } else {
                out.push_str(name);
            }
            rest = &rest[consumed..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 5175);
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.ipfs_gateway, DEFAULT_IPFS_GATEWAY);
        assert!(!config.custodial.enabled);
        assert!(config.custodial.keypair_path.is_none());
    }

    #[test]
    fn test_custodial_section_parses() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 8080
            rpc_url = "https://api.mainnet-beta.solana.com"

            [custodial]
            enabled = true
            keypair_path = "/var/lib/mintgate/treasury.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.custodial.enabled);
        assert_eq!(
            config.custodial.keypair_path.as_deref(),
            Some("/var/lib/mintgate/treasury.json")
        );
    }

    #[test]
    fn test_env_expansion_resolves_known_variables() {
        // SAFETY: test-local variable name, no concurrent reader
        // depends on it.
        unsafe { std::env::set_var("MINTGATE_TEST_GATEWAY", "https://ipfs.io/ipfs/") };
        let expanded = expand_env_vars("gateway = \"$MINTGATE_TEST_GATEWAY\"");
        assert_eq!(expanded, "gateway = \"https://ipfs.io/ipfs/\"");

        let braced = expand_env_vars("gateway = \"${MINTGATE_TEST_GATEWAY}\"");
        assert_eq!(braced, "gateway = \"https://ipfs.io/ipfs/\"");
    }

    #[test]
    fn test_env_expansion_leaves_unknown_variables() {
        assert_eq!(
            expand_env_vars("path = \"$MINTGATE_NO_SUCH_VAR\""),
            "path = \"$MINTGATE_NO_SUCH_VAR\""
        );
        assert_eq!(
            expand_env_vars("path = \"${MINTGATE_NO_SUCH_VAR}\""),
            "path = \"${MINTGATE_NO_SUCH_VAR}\""
        );
        assert_eq!(expand_env_vars("just a $ sign"), "just a $ sign");
    }
}
