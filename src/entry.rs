//! Allow-list entry classification and per-family matching.
//!
//! Entries are plain strings in one of four notations:
//!
//! - **Exact**: `192.168.178.8`
//! - **Dash range**: `192.168.178.0-50` (last octet only, inclusive)
//! - **CIDR**: `192.168.178.0/24`
//! - **Wildcard**: `192.168.178.*` or `192.168.*` (literal string prefix)
//!
//! Classification is purely syntactic: a `-` in the last dotted component
//! makes a range, a `/` makes a CIDR block, a trailing `*` makes a
//! wildcard, anything else is an exact address. A malformed entry never
//! matches and never raises an error.

use std::net::Ipv4Addr;

/// The syntactic family of an allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A literal address, matched by string equality.
    Exact,
    /// A dash range over the last dotted component.
    Range {
        /// Everything up to and including the last `.`.
        prefix: String,
        /// First value of the range (inclusive).
        start: u32,
        /// Last value of the range (inclusive).
        end: u32,
    },
    /// A CIDR block, `network/mask_bits`.
    Cidr {
        /// The network address as written (compared unmasked).
        network: Ipv4Addr,
        /// Prefix length, 0-32.
        mask_bits: u32,
    },
    /// A trailing-`*` pattern, matched as a literal string prefix.
    Wildcard {
        /// The pattern with the trailing `*` stripped.
        prefix: String,
    },
    /// Shape recognized but unparseable; only eligible for exact matching.
    Malformed,
}

/// One configured allow-list pattern.
///
/// The raw string is kept alongside the classified kind because the
/// exact-match step tests verbatim equality against every entry,
/// whatever its shape.
///
/// # Example
/// ```
/// use axum_ip_allow::{AllowEntry, EntryKind};
///
/// let entry = AllowEntry::new("192.168.1.0/24");
/// assert!(matches!(entry.kind(), EntryKind::Cidr { .. }));
/// assert!(entry.matches_cidr("192.168.1.200"));
/// ```
#[derive(Debug, Clone)]
pub struct AllowEntry {
    raw: String,
    kind: EntryKind,
}

impl AllowEntry {
    /// Classify a pattern string. Never fails; unparseable shapes become
    /// [`EntryKind::Malformed`] and simply never match.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify(&raw);
        Self { raw, kind }
    }

    /// The pattern string as configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classified family of this entry.
    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// Verbatim string equality. Every entry is eligible here; entries
    /// containing `-`, `/` or `*` just never equal a literal IP.
    pub fn matches_exact(&self, ip: &str) -> bool {
        self.raw == ip
    }

    /// Dash-range match: `ip == prefix + i` for some `i` in `start..=end`.
    ///
    /// Bounds are compared as plain integers, so a zero-padded bound like
    /// `050` behaves as `50`. A reversed range (`start > end`) never
    /// matches.
    pub fn matches_range(&self, ip: &str) -> bool {
        let EntryKind::Range { prefix, start, end } = &self.kind else {
            return false;
        };
        let Some(rest) = ip.strip_prefix(prefix.as_str()) else {
            return false;
        };
        let Ok(value) = rest.parse::<u32>() else {
            return false;
        };
        // Only the canonical decimal form can equal "prefix + i", so a
        // zero-padded or sign-prefixed candidate never matches.
        rest == value.to_string() && (*start..=*end).contains(&value)
    }

    /// CIDR match: the client address ANDed with the prefix mask must
    /// equal the configured network address as written (unmasked).
    ///
    /// A client IP that does not parse as dotted-quad IPv4 never matches.
    pub fn matches_cidr(&self, ip: &str) -> bool {
        let EntryKind::Cidr { network, mask_bits } = &self.kind else {
            return false;
        };
        let Ok(addr) = ip.parse::<Ipv4Addr>() else {
            return false;
        };
        let mask = if *mask_bits == 0 {
            0
        } else {
            u32::MAX << (32 - mask_bits)
        };
        (u32::from(addr) & mask) == u32::from(*network)
    }

    /// Wildcard match: literal string prefix test, with no octet-boundary
    /// awareness. `192.168.1*` matches `192.168.10.5` as well as
    /// `192.168.1.5`.
    pub fn matches_wildcard(&self, ip: &str) -> bool {
        let EntryKind::Wildcard { prefix } = &self.kind else {
            return false;
        };
        ip.starts_with(prefix.as_str())
    }
}

/// Classify a pattern string by shape.
///
/// Precedence: dash range (`-` in the last dotted component), then CIDR
/// (`/`), then wildcard (trailing `*`), then exact. The notations are
/// mutually exclusive in practice, so the order is rarely observable.
fn classify(raw: &str) -> EntryKind {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    if last.contains('-') {
        return classify_range(raw, last);
    }
    if raw.contains('/') {
        return classify_cidr(raw);
    }
    if let Some(prefix) = raw.strip_suffix('*') {
        return EntryKind::Wildcard {
            prefix: prefix.to_string(),
        };
    }
    EntryKind::Exact
}

fn classify_range(raw: &str, last: &str) -> EntryKind {
    let prefix = &raw[..raw.len() - last.len()];
    let Some((start, end)) = last.split_once('-') else {
        return EntryKind::Malformed;
    };
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(start), Ok(end)) => EntryKind::Range {
            prefix: prefix.to_string(),
            start,
            end,
        },
        _ => EntryKind::Malformed,
    }
}

fn classify_cidr(raw: &str) -> EntryKind {
    let Some((network, mask)) = raw.split_once('/') else {
        return EntryKind::Malformed;
    };
    match (network.parse::<Ipv4Addr>(), mask.parse::<u32>()) {
        // Masks beyond 32 bits would shift out of range; such entries
        // are fail-closed rather than left to wrap.
        (Ok(network), Ok(mask_bits)) if mask_bits <= 32 => EntryKind::Cidr { network, mask_bits },
        _ => EntryKind::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact() {
        let entry = AllowEntry::new("10.0.0.5");
        assert_eq!(*entry.kind(), EntryKind::Exact);
        assert!(entry.matches_exact("10.0.0.5"));
        assert!(!entry.matches_exact("10.0.0.6"));
    }

    #[test]
    fn test_classify_range() {
        let entry = AllowEntry::new("192.168.1.50-100");
        match entry.kind() {
            EntryKind::Range { prefix, start, end } => {
                assert_eq!(prefix, "192.168.1.");
                assert_eq!((*start, *end), (50, 100));
            }
            other => panic!("expected Range, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_cidr() {
        let entry = AllowEntry::new("192.168.1.0/24");
        match entry.kind() {
            EntryKind::Cidr { network, mask_bits } => {
                assert_eq!(*network, "192.168.1.0".parse::<Ipv4Addr>().unwrap());
                assert_eq!(*mask_bits, 24);
            }
            other => panic!("expected Cidr, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_wildcard() {
        let entry = AllowEntry::new("192.168.*");
        assert_eq!(
            *entry.kind(),
            EntryKind::Wildcard {
                prefix: "192.168.".to_string()
            }
        );
    }

    #[test]
    fn test_classify_malformed() {
        // Non-numeric range bound
        assert_eq!(*AllowEntry::new("192.168.1.a-10").kind(), EntryKind::Malformed);
        // Non-numeric mask
        assert_eq!(*AllowEntry::new("192.168.1.0/abc").kind(), EntryKind::Malformed);
        // Unparseable network
        assert_eq!(*AllowEntry::new("not-an-ip/24").kind(), EntryKind::Malformed);
        // Mask out of range is fail-closed
        assert_eq!(*AllowEntry::new("192.168.1.0/33").kind(), EntryKind::Malformed);
    }

    #[test]
    fn test_dash_outside_last_component_is_not_a_range() {
        // Only the last dotted component is eligible for range syntax.
        let entry = AllowEntry::new("192.168-5.1");
        assert_eq!(*entry.kind(), EntryKind::Exact);
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let entry = AllowEntry::new("192.168.1.50-100");
        assert!(entry.matches_range("192.168.1.50"));
        assert!(entry.matches_range("192.168.1.75"));
        assert!(entry.matches_range("192.168.1.100"));
        assert!(!entry.matches_range("192.168.1.49"));
        assert!(!entry.matches_range("192.168.1.101"));
    }

    #[test]
    fn test_range_zero_padded_bounds() {
        // "050" parses as 50; candidates are compared against the
        // canonical decimal form.
        let entry = AllowEntry::new("10.0.0.050-60");
        assert!(entry.matches_range("10.0.0.55"));
        assert!(!entry.matches_range("10.0.0.055"));
    }

    #[test]
    fn test_range_wide_bounds() {
        // A full-width range must not be iterated to answer membership.
        let entry = AllowEntry::new("10.0.0.0-4294967295");
        assert!(entry.matches_range("10.0.0.7"));
        assert!(!entry.matches_range("10.0.0.+7"));
        assert!(!entry.matches_range("10.0.1.7"));
    }

    #[test]
    fn test_range_reversed_never_matches() {
        let entry = AllowEntry::new("10.0.0.100-50");
        assert!(!entry.matches_range("10.0.0.75"));
    }

    #[test]
    fn test_cidr_match() {
        let entry = AllowEntry::new("192.168.1.0/24");
        assert!(entry.matches_cidr("192.168.1.1"));
        assert!(entry.matches_cidr("192.168.1.200"));
        assert!(!entry.matches_cidr("192.168.2.1"));
    }

    #[test]
    fn test_cidr_mask_edges() {
        // /0 masks everything away; only matches a 0.0.0.0 network literal.
        let entry = AllowEntry::new("0.0.0.0/0");
        assert!(entry.matches_cidr("8.8.8.8"));

        // /32 is an exact-address block.
        let entry = AllowEntry::new("10.0.0.5/32");
        assert!(entry.matches_cidr("10.0.0.5"));
        assert!(!entry.matches_cidr("10.0.0.6"));
    }

    #[test]
    fn test_cidr_network_compared_unmasked() {
        // The network literal is compared as written; a host address with
        // set bits below the mask never equals a masked client address.
        let entry = AllowEntry::new("192.168.1.5/24");
        assert!(!entry.matches_cidr("192.168.1.5"));
    }

    #[test]
    fn test_cidr_non_ipv4_client() {
        let entry = AllowEntry::new("192.168.1.0/24");
        assert!(!entry.matches_cidr("::1"));
        assert!(!entry.matches_cidr("not an ip"));
    }

    #[test]
    fn test_wildcard_prefix() {
        let entry = AllowEntry::new("192.168.*");
        assert!(entry.matches_wildcard("192.168.55.5"));
        assert!(!entry.matches_wildcard("192.169.1.1"));
    }

    #[test]
    fn test_wildcard_is_a_loose_string_prefix() {
        // No octet-boundary awareness: 192.168.1* matches 192.168.10.5.
        let entry = AllowEntry::new("192.168.1*");
        assert!(entry.matches_wildcard("192.168.1.5"));
        assert!(entry.matches_wildcard("192.168.10.5"));
        assert!(!entry.matches_wildcard("192.168.2.5"));
    }

    #[test]
    fn test_family_matchers_reject_other_kinds() {
        let exact = AllowEntry::new("10.0.0.5");
        assert!(!exact.matches_range("10.0.0.5"));
        assert!(!exact.matches_cidr("10.0.0.5"));
        assert!(!exact.matches_wildcard("10.0.0.5"));

        let malformed = AllowEntry::new("192.168.1.0/33");
        assert!(!malformed.matches_cidr("192.168.1.1"));
        // Still eligible for verbatim equality.
        assert!(malformed.matches_exact("192.168.1.0/33"));
    }
}
