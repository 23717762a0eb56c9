//! Private/loopback/link-local address classification (§4.1 step 4, 7).
//!
//! Grounded on the same `IpAddr::is_loopback`/`is_private` std checks the
//! pack's `web_fetch` SSRF guard uses, extended with the IPv6 ranges and
//! IPv4-mapped-IPv6 forms the spec calls out explicitly.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// True if `addr` falls in any of the ranges the spec requires blocking:
/// loopback, RFC1918 private space, link-local, "this network" (0/8), and
/// their IPv6/IPv4-mapped equivalents.
pub fn is_private_or_reserved(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => is_private_v6(v6),
    }
}

fn is_private_v4(v4: &Ipv4Addr) -> bool {
    if v4.is_loopback() || v4.is_private() || v4.is_link_local() {
        return true;
    }
    // 0.0.0.0/8 ("this network")
    if v4.octets()[0] == 0 {
        return true;
    }
    false
}

fn is_private_v6(v6: &Ipv6Addr) -> bool {
    if v6.is_loopback() {
        return true;
    }
    // fc00::/7 (unique local)
    if (v6.segments()[0] & 0xfe00) == 0xfc00 {
        return true;
    }
    // fe80::/10 (link-local)
    if (v6.segments()[0] & 0xffc0) == 0xfe80 {
        return true;
    }
    // ::ffff:a.b.c.d — IPv4-mapped; check the embedded v4 address.
    if let Some(mapped) = to_ipv4_mapped(v6) {
        return is_private_v4(&mapped);
    }
    false
}

fn to_ipv4_mapped(v6: &Ipv6Addr) -> Option<Ipv4Addr> {
    let segments = v6.segments();
    if segments[0..5] == [0, 0, 0, 0, 0] && segments[5] == 0xffff {
        let [a, b] = segments[6].to_be_bytes();
        let [c, d] = segments[7].to_be_bytes();
        Some(Ipv4Addr::new(a, b, c, d))
    } else {
        None
    }
}

/// Hostnames that are always rejected regardless of DNS (§4.1 step 3).
pub fn is_forbidden_hostname(host: &str) -> bool {
    let host = host.trim_matches(['[', ']']);
    host.eq_ignore_ascii_case("localhost") || host == "::1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_v4_ranges() {
        for ip in ["127.0.0.1", "10.0.0.1", "192.168.1.1", "172.16.0.1", "172.31.0.1", "169.254.169.254", "0.1.2.3"] {
            let addr: IpAddr = ip.parse().unwrap();
            assert!(is_private_or_reserved(&addr), "{ip} should be private");
        }
        let public: IpAddr = "93.184.216.34".parse().unwrap();
        assert!(!is_private_or_reserved(&public));
    }

    #[test]
    fn classifies_v6_ranges() {
        for ip in ["::1", "fc00::1", "fe80::1", "::ffff:127.0.0.1", "::ffff:10.0.0.1"] {
            let addr: IpAddr = ip.parse().unwrap();
            assert!(is_private_or_reserved(&addr), "{ip} should be private");
        }
    }

    #[test]
    fn rejects_localhost_hostname_before_dns() {
        assert!(is_forbidden_hostname("localhost"));
        assert!(is_forbidden_hostname("[::1]"));
        assert!(!is_forbidden_hostname("example.com"));
    }
}
