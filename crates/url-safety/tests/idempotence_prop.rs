//! Property test for §8: `validate(validate(u)) == validate(u)` for public
//! hostnames — validating a URL's own canonical form must be a no-op.

use std::net::IpAddr;

use async_trait::async_trait;
use auspex_url_safety::{validate_with_resolver, AllowBlockPolicy, DnsResolver};
use proptest::prelude::*;

struct PublicResolver;

#[async_trait]
impl DnsResolver for PublicResolver {
    async fn resolve(&self, _host: &str) -> std::io::Result<Vec<IpAddr>> {
        Ok(vec!["93.184.216.34".parse().unwrap()])
    }
}

fn public_url() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", "[a-z]{0,12}").prop_map(|(label, path)| {
        if path.is_empty() {
            format!("https://{label}.test/")
        } else {
            format!("https://{label}.test/{path}")
        }
    })
}

proptest! {
    #[test]
    fn validate_is_idempotent_for_public_urls(url in public_url()) {
        let policy = AllowBlockPolicy::default();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let once = rt
            .block_on(validate_with_resolver(&url, &policy, &PublicResolver))
            .expect("public url should validate");
        let twice = rt
            .block_on(validate_with_resolver(&once, &policy, &PublicResolver))
            .expect("canonical form should re-validate");
        prop_assert_eq!(once, twice);
    }
}
