//! Metadata pointer normalization.
//!
//! On-chain metadata embeds an HTTPS-fetchable URI. Clients usually
//! hand over a content-addressed `ipfs://` pointer, which is rewritten
//! against a configured gateway before it lands on chain. Pure; no
//! side effects.

/// Default IPFS gateway used when the server config does not name one.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs/";

const IPFS_SCHEME: &str = "ipfs://";

/// Rewrites an `ipfs://CID` pointer to an HTTPS gateway URL.
///
/// Any other URI passes through unchanged.
#[must_use]
pub fn normalize(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix(IPFS_SCHEME) {
        Some(cid) => format!("{gateway}{cid}"),
        None => uri.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_ipfs_scheme() {
        assert_eq!(
            normalize("ipfs://abc123", DEFAULT_IPFS_GATEWAY),
            "https://gateway.pinata.cloud/ipfs/abc123"
        );
    }

    #[test]
    fn test_passes_through_https() {
        let uri = "https://example.com/meta.json";
        assert_eq!(normalize(uri, DEFAULT_IPFS_GATEWAY), uri);
    }

    #[test]
    fn test_custom_gateway() {
        assert_eq!(
            normalize("ipfs://Qm1", "https://ipfs.io/ipfs/"),
            "https://ipfs.io/ipfs/Qm1"
        );
    }
}
