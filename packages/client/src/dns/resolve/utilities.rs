//! Address ordering and hostname helpers
//!
//! Contains the ordering-policy partition, RFC 8305 family interleaving,
//! IP literal detection and hostname validation.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};

use super::types::{AddressFamily, OrderingPolicy};

/// Apply an ordering policy in place.
///
/// `PreferIpv4` is a stable partition: every IPv4 address moves ahead of
/// every IPv6 address and the relative order inside each family is kept.
/// `SystemOrder` leaves the list untouched.
pub fn apply_ordering(addrs: &mut [IpAddr], policy: OrderingPolicy) {
    match policy {
        OrderingPolicy::SystemOrder => {}
        // `sort_by_key` is stable, so this only moves addresses across families.
        OrderingPolicy::PreferIpv4 => addrs.sort_by_key(IpAddr::is_ipv6),
    }
}

/// Interleave address families, starting with the family of the first address.
///
/// Follows RFC 8305 section 4: alternate between families while both have
/// addresses left, then append the remainder. Order within a family is kept.
pub fn interleave_families(addrs: &[SocketAddr]) -> Vec<SocketAddr> {
    let Some(first) = addrs.first() else {
        return Vec::new();
    };
    let leading = AddressFamily::of_socket(first);

    let (mut preferred, mut other): (VecDeque<SocketAddr>, VecDeque<SocketAddr>) = addrs
        .iter()
        .partition(|addr| AddressFamily::of_socket(addr) == leading);

    let mut out = Vec::with_capacity(addrs.len());
    loop {
        match (preferred.pop_front(), other.pop_front()) {
            (Some(a), Some(b)) => {
                out.push(a);
                out.push(b);
            }
            (Some(a), None) => {
                out.push(a);
                out.extend(preferred.drain(..));
                break;
            }
            (None, Some(b)) => {
                out.push(b);
                out.extend(other.drain(..));
                break;
            }
            (None, None) => break,
        }
    }
    out
}

/// Check if a hostname is an IP literal (brackets allowed around IPv6).
pub fn is_ip_address(hostname: &str) -> bool {
    parse_ip_literal(hostname).is_some()
}

/// Parse an IP literal, accepting the bracketed IPv6 form used in URLs.
pub fn parse_ip_literal(hostname: &str) -> Option<IpAddr> {
    let trimmed = hostname
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(hostname);
    trimmed.parse::<IpAddr>().ok()
}

/// Validate hostname format according to RFC 1123.
///
/// A single trailing dot (fully qualified form) is accepted.
pub fn validate_hostname(hostname: &str) -> Result<(), &'static str> {
    if hostname.is_empty() {
        return Err("hostname cannot be empty");
    }

    if hostname.len() > 253 {
        return Err("hostname too long (max 253 characters)");
    }

    if !hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
    {
        return Err("hostname contains invalid characters");
    }

    let labels = hostname.strip_suffix('.').unwrap_or(hostname);
    for label in labels.split('.') {
        if label.is_empty() {
            return Err("hostname contains an empty label");
        }
        if label.len() > 63 {
            return Err("hostname label too long (max 63 characters)");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("hostname label cannot start or end with hyphen");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    fn v4(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, last))
    }

    fn v6(last: u16) -> IpAddr {
        IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, last))
    }

    #[test]
    fn test_prefer_ipv4_is_stable_partition() {
        let mut addrs = vec![v6(1), v4(1), v6(2), v4(2), v6(3), v4(3)];
        apply_ordering(&mut addrs, OrderingPolicy::PreferIpv4);
        assert_eq!(addrs, vec![v4(1), v4(2), v4(3), v6(1), v6(2), v6(3)]);
    }

    #[test]
    fn test_system_order_is_untouched() {
        let original = vec![v6(1), v4(1), v6(2)];
        let mut addrs = original.clone();
        apply_ordering(&mut addrs, OrderingPolicy::SystemOrder);
        assert_eq!(addrs, original);
    }

    #[test]
    fn test_prefer_ipv4_law_over_every_family_pattern() {
        // Every family pattern up to length 8, with unique addresses per slot.
        for len in 0..=8u16 {
            for mask in 0..(1u32 << len) {
                let input: Vec<IpAddr> = (0..len)
                    .map(|i| if mask & (1 << i) == 0 { v4(i as u8) } else { v6(i) })
                    .collect();
                let mut ordered = input.clone();
                apply_ordering(&mut ordered, OrderingPolicy::PreferIpv4);

                let first_v6 = ordered.iter().position(IpAddr::is_ipv6).unwrap_or(ordered.len());
                assert!(ordered[..first_v6].iter().all(IpAddr::is_ipv4));
                assert!(ordered[first_v6..].iter().all(IpAddr::is_ipv6));

                let in_v4: Vec<_> = input.iter().filter(|a| a.is_ipv4()).collect();
                let out_v4: Vec<_> = ordered.iter().filter(|a| a.is_ipv4()).collect();
                assert_eq!(in_v4, out_v4);
                let in_v6: Vec<_> = input.iter().filter(|a| a.is_ipv6()).collect();
                let out_v6: Vec<_> = ordered.iter().filter(|a| a.is_ipv6()).collect();
                assert_eq!(in_v6, out_v6);
            }
        }
    }

    #[test]
    fn test_interleave_families() {
        let sock = |ip: IpAddr| SocketAddr::new(ip, 443);
        let addrs = vec![sock(v6(1)), sock(v6(2)), sock(v6(3)), sock(v4(1))];
        assert_eq!(
            interleave_families(&addrs),
            vec![sock(v6(1)), sock(v4(1)), sock(v6(2)), sock(v6(3))]
        );

        let addrs = vec![sock(v4(1)), sock(v4(2)), sock(v6(1)), sock(v6(2))];
        assert_eq!(
            interleave_families(&addrs),
            vec![sock(v4(1)), sock(v6(1)), sock(v4(2)), sock(v6(2))]
        );

        assert!(interleave_families(&[]).is_empty());
    }

    #[test]
    fn test_hostname_validation() {
        assert!(validate_hostname("example.com").is_ok());
        assert!(validate_hostname("sub.example.com.").is_ok());
        assert!(validate_hostname("_srv.example.com").is_ok());
        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("-invalid").is_err());
        assert!(validate_hostname("invalid-").is_err());
        assert!(validate_hostname("invalid..hostname").is_err());
        assert!(validate_hostname("host name").is_err());
        assert!(validate_hostname(&"a".repeat(254)).is_err());
    }

    #[test]
    fn test_ip_literal_detection() {
        assert!(is_ip_address("127.0.0.1"));
        assert!(is_ip_address("::1"));
        assert!(is_ip_address("[2001:db8::1]"));
        assert!(!is_ip_address("example.com"));
        assert_eq!(parse_ip_literal("[::1]"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }
}
