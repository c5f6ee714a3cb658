//! Special-purpose prefix tables, in evaluation order

use super::{Category, MatchMode, SpecialRange};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use std::net::{Ipv4Addr, Ipv6Addr};

fn v4(octets: [u8; 4], len: u8, category: Category, mode: MatchMode) -> SpecialRange {
    let net = Ipv4Net::new(Ipv4Addr::from(octets), len).expect("valid IPv4 prefix length");
    SpecialRange {
        net: IpNet::V4(net),
        category,
        mode,
    }
}

fn v6(segments: [u16; 8], len: u8, category: Category, mode: MatchMode) -> SpecialRange {
    let net = Ipv6Net::new(Ipv6Addr::from(segments), len).expect("valid IPv6 prefix length");
    SpecialRange {
        net: IpNet::V6(net),
        category,
        mode,
    }
}

use Category::*;
use MatchMode::{Contains, Exact};

/// IPv4 special-purpose ranges. Order matters: 0.0.0.0 must hit
/// "This Network" before the exact default-route entry.
pub static IPV4_RANGES: Lazy<[SpecialRange; 19]> = Lazy::new(|| {
    [
        v4([169, 254, 0, 0], 16, LinkLocal, Contains),
        v4([10, 0, 0, 0], 8, PrivateUse, Contains),
        v4([172, 16, 0, 0], 12, PrivateUse, Contains),
        v4([192, 168, 0, 0], 16, PrivateUse, Contains),
        v4([100, 64, 0, 0], 10, SharedAddressSpace, Contains),
        v4([192, 0, 0, 0], 24, PrivateUse, Contains),
        v4([192, 31, 196, 0], 24, As112, Contains),
        v4([192, 175, 48, 0], 24, As112, Contains),
        v4([192, 52, 193, 0], 24, Amt, Contains),
        v4([192, 88, 99, 0], 24, SixToFour, Contains),
        v4([198, 18, 0, 0], 15, Benchmarking, Contains),
        v4([192, 0, 2, 0], 24, Documentation, Contains),
        v4([198, 51, 100, 0], 24, Documentation, Contains),
        v4([203, 0, 113, 0], 24, Documentation, Contains),
        v4([240, 0, 0, 0], 4, Reserved, Contains),
        v4([0, 0, 0, 0], 8, ThisNetwork, Contains),
        v4([224, 0, 0, 0], 4, Multicast, Contains),
        v4([127, 0, 0, 0], 8, Loopback, Contains),
        v4([0, 0, 0, 0], 0, Default, Exact),
    ]
});

/// IPv6 special-purpose ranges, in evaluation order
pub static IPV6_RANGES: Lazy<[SpecialRange; 17]> = Lazy::new(|| {
    [
        v6([0xff00, 0, 0, 0, 0, 0, 0, 0], 8, Multicast, Contains),
        v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10, LinkLocal, Contains),
        v6([0xfc00, 0, 0, 0, 0, 0, 0, 0], 7, UniqueLocal, Contains),
        v6([0, 0, 0, 0, 0, 0, 0, 1], 128, Loopback, Exact),
        v6([0, 0, 0, 0, 0, 0, 0, 0], 0, Default, Exact),
        v6([0x2001, 0x0db8, 0, 0, 0, 0, 0, 0], 32, Documentation, Contains),
        v6([0x0064, 0xff9b, 0, 0, 0, 0, 0, 0], 96, Embedded, Contains),
        v6([0x2001, 0x0010, 0, 0, 0, 0, 0, 0], 28, OrchidV1, Contains),
        v6([0x2001, 0x0020, 0, 0, 0, 0, 0, 0], 28, OrchidV2, Contains),
        v6([0x2001, 0x0030, 0, 0, 0, 0, 0, 0], 28, Dets, Contains),
        v6([0x2001, 0, 0, 0, 0, 0, 0, 0], 32, Teredo, Contains),
        v6([0x0100, 0, 0, 0, 0, 0, 0, 0], 64, Discard, Contains),
        v6([0x2001, 0x0002, 0, 0, 0, 0, 0, 0], 48, Benchmarking, Contains),
        v6([0x2002, 0, 0, 0, 0, 0, 0, 0], 16, SixToFour, Contains),
        v6([0x2001, 0x0004, 0x0112, 0, 0, 0, 0, 0], 48, As112, Contains),
        v6([0x2620, 0x004f, 0x8000, 0, 0, 0, 0, 0], 48, As112, Contains),
        v6([0x2001, 0x0003, 0, 0, 0, 0, 0, 0], 32, Amt, Contains),
    ]
});
