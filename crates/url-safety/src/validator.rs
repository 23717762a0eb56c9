use std::net::IpAddr;

use tracing::warn;
use url::Url;

use crate::errors::UrlSafetyError;
use crate::policy::AllowBlockPolicy;
use crate::private_ranges::{is_forbidden_hostname, is_private_or_reserved};
use crate::resolver::{DnsResolver, SystemResolver};

/// Validate `raw` against the policy in §4.1, in order, fail-closed. On
/// success returns the URL's canonical string form.
pub async fn validate(raw: &str, policy: &AllowBlockPolicy) -> Result<String, UrlSafetyError> {
    validate_with_resolver(raw, policy, &SystemResolver).await
}

pub async fn validate_with_resolver(
    raw: &str,
    policy: &AllowBlockPolicy,
    resolver: &dyn DnsResolver,
) -> Result<String, UrlSafetyError> {
    let url = Url::parse(raw).map_err(|e| UrlSafetyError::Unparseable(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlSafetyError::ProtocolNotAllowed(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| UrlSafetyError::Unparseable("missing host".into()))?
        .to_string();

    if is_forbidden_hostname(&host) {
        return Err(UrlSafetyError::Loopback(host));
    }

    // If the host is itself an IP literal, classify it directly.
    if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
        if is_private_or_reserved(&ip) {
            return Err(UrlSafetyError::PrivateNetwork(host));
        }
    }

    if !policy.is_allowed(&host) {
        return Err(UrlSafetyError::NotAllowed(host));
    }
    if policy.is_blocked(&host) {
        return Err(UrlSafetyError::Blocked(host));
    }

    // DNS-rebinding protection: resolve at validation time and reject if any
    // answer lands in private space. Resolution failure is itself fatal.
    let addrs = resolver
        .resolve(&host)
        .await
        .map_err(|e| UrlSafetyError::DnsFailure(host.clone(), e.to_string()))?;

    if addrs.is_empty() {
        return Err(UrlSafetyError::DnsFailure(
            host,
            "no addresses returned".into(),
        ));
    }

    for addr in &addrs {
        if is_private_or_reserved(addr) {
            warn!(host = %host, ip = %addr, "rejecting URL: resolves to private address");
            return Err(UrlSafetyError::PrivateNetwork(host));
        }
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedResolver(Vec<IpAddr>);

    #[async_trait]
    impl DnsResolver for FixedResolver {
        async fn resolve(&self, _host: &str) -> std::io::Result<Vec<IpAddr>> {
            Ok(self.0.clone())
        }
    }

    fn public_resolver() -> FixedResolver {
        FixedResolver(vec!["93.184.216.34".parse().unwrap()])
    }

    #[tokio::test]
    async fn accepts_public_https_url() {
        let policy = AllowBlockPolicy::default();
        let resolver = public_resolver();
        let result = validate_with_resolver("https://example.com/", &policy, &resolver).await;
        assert_eq!(result.unwrap(), "https://example.com/");
    }

    #[tokio::test]
    async fn rejects_non_http_schemes() {
        let policy = AllowBlockPolicy::default();
        let resolver = public_resolver();
        for url in ["javascript:alert(1)", "file:///etc/passwd", "data:text/html,x", "ftp://host"] {
            let result = validate_with_resolver(url, &policy, &resolver).await;
            assert!(result.is_err(), "{url} should be rejected");
        }
    }

    #[tokio::test]
    async fn rejects_literal_private_ips() {
        let policy = AllowBlockPolicy::default();
        let resolver = public_resolver();
        for url in [
            "http://127.0.0.1",
            "http://10.0.0.1",
            "http://192.168.1.1",
            "http://172.16.0.1",
            "http://172.31.0.1",
            "http://169.254.169.254",
            "http://localhost",
            "http://[::1]",
            "http://[::ffff:127.0.0.1]",
        ] {
            let result = validate_with_resolver(url, &policy, &resolver).await;
            assert!(result.is_err(), "{url} should be rejected");
        }
    }

    #[tokio::test]
    async fn rejects_dns_rebinding_to_private_range() {
        let policy = AllowBlockPolicy::default();
        let resolver = FixedResolver(vec!["10.1.2.3".parse().unwrap()]);
        let result = validate_with_resolver("https://rebinder.test/", &policy, &resolver).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fails_closed_on_dns_error() {
        struct FailingResolver;
        #[async_trait]
        impl DnsResolver for FailingResolver {
            async fn resolve(&self, _host: &str) -> std::io::Result<Vec<IpAddr>> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "nxdomain"))
            }
        }
        let policy = AllowBlockPolicy::default();
        let result = validate_with_resolver("https://nowhere.test/", &policy, &FailingResolver).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn honors_allow_and_block_lists() {
        let policy = AllowBlockPolicy::new(vec!["example.com".into()], vec![]);
        let resolver = public_resolver();
        assert!(validate_with_resolver("https://example.com/", &policy, &resolver).await.is_ok());
        assert!(validate_with_resolver("https://other.com/", &policy, &resolver).await.is_err());

        let policy = AllowBlockPolicy::new(vec![], vec!["evil.com".into()]);
        assert!(validate_with_resolver("https://evil.com/", &policy, &resolver).await.is_err());
    }

    #[tokio::test]
    async fn validate_is_idempotent() {
        let policy = AllowBlockPolicy::default();
        let resolver = public_resolver();
        let once = validate_with_resolver("https://example.com/path?q=1", &policy, &resolver)
            .await
            .unwrap();
        let twice = validate_with_resolver(&once, &policy, &resolver).await.unwrap();
        assert_eq!(once, twice);
    }
}
