use std::net::IpAddr;

use async_trait::async_trait;

/// Abstracts system DNS resolution so the validator is testable without a
/// network. Production code uses [`SystemResolver`]; tests supply a fixed
/// mapping.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> std::io::Result<Vec<IpAddr>>;
}

/// Resolves via the operating system resolver, same as `tokio::net::lookup_host`.
pub struct SystemResolver;

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|sa| sa.ip()).collect())
    }
}
