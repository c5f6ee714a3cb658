//! Classification of IANA special-purpose address space
//!
//! Addresses inside one of the ranges in [`ranges`] are never globally
//! routed, so they are answered locally instead of being sent to the WHOIS
//! service.

pub mod ranges;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub use ranges::{IPV4_RANGES, IPV6_RANGES};

/// Category label of a special-purpose range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// RFC 1918 and RFC 6890 private space
    PrivateUse,
    /// IPv4 and IPv6 multicast
    Multicast,
    /// Link-local unicast
    LinkLocal,
    /// IPv6 unique local addresses
    UniqueLocal,
    /// Loopback
    Loopback,
    /// The unspecified address
    Default,
    /// NAT64 well-known prefix
    Embedded,
    /// Deprecated ORCHID prefix
    OrchidV1,
    /// ORCHIDv2 prefix
    OrchidV2,
    /// Documentation ranges
    Documentation,
    /// Reserved for future use (240.0.0.0/4)
    Reserved,
    /// "This network" (0.0.0.0/8)
    ThisNetwork,
    /// AS112 DNS sinks
    As112,
    /// 6to4 relay anycast
    SixToFour,
    /// Drone Remote ID Protocol Entity Tags
    Dets,
    /// Teredo tunneling
    Teredo,
    /// IPv6 discard-only prefix
    Discard,
    /// Benchmarking
    Benchmarking,
    /// Automatic Multicast Tunneling
    Amt,
    /// Shared address space / carrier-grade NAT
    SharedAddressSpace,
}

impl Category {
    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Category::PrivateUse => "Private Use",
            Category::Multicast => "Multicast",
            Category::LinkLocal => "Link Local",
            Category::UniqueLocal => "Unique Local",
            Category::Loopback => "Loopback",
            Category::Default => "Unspecified/Default",
            Category::Embedded => "Embedded IPv4-IPv6 Translation (RFC6052)",
            Category::OrchidV1 => "ORCHIDv1 (Deprecated)",
            Category::OrchidV2 => "ORCHIDv2 (RFC7343)",
            Category::Documentation => "Documentation",
            Category::Reserved => "Reserved",
            Category::ThisNetwork => "This Network",
            Category::As112 => "AS112",
            Category::SixToFour => "6to4 Relay",
            Category::Dets => "Drone Remote ID Protocol Entity Tags",
            Category::Teredo => "TEREDO (RFC4380, RFC8190)",
            Category::Discard => "Discard-Only Block",
            Category::Benchmarking => "Benchmarking (RFC5180)",
            Category::Amt => "Automatic Multicast Tunneling (RFC7450)",
            Category::SharedAddressSpace => "Shared Address Space/Carrier-Grade NAT",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a range is tested against an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The address lies inside the prefix
    Contains,
    /// The address equals the prefix's network address
    Exact,
}

/// A named special-purpose prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRange {
    /// The reserved prefix
    pub net: IpNet,
    /// Its category
    pub category: Category,
    /// How the prefix is matched
    pub mode: MatchMode,
}

impl SpecialRange {
    /// Whether `ip` falls under this range
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self.mode {
            MatchMode::Contains => self.net.contains(ip),
            MatchMode::Exact => self.net.addr() == *ip,
        }
    }
}

/// Classify an address against the special-purpose tables.
///
/// The table for the address family is walked in order and the first match
/// wins. `None` means the address is globally routable. IPv4-mapped IPv6
/// addresses are checked against the IPv4 table.
pub fn classify(ip: IpAddr) -> Option<&'static SpecialRange> {
    let ip = ip.to_canonical();
    let table: &[SpecialRange] = match ip {
        IpAddr::V4(_) => IPV4_RANGES.as_slice(),
        IpAddr::V6(_) => IPV6_RANGES.as_slice(),
    };
    let found = table.iter().find(|range| range.matches(&ip));
    if let Some(range) = found {
        log::trace!("{ip} is special-purpose: {} ({})", range.category, range.net);
    }
    found
}

/// Checks whether an address is globally routable
pub fn is_global(ip: IpAddr) -> bool {
    classify(ip).is_none()
}
