//! Autonomous System Number parsing and formatting

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepts `14525`, `AS14525`, `as14525` and the asdot form `AS1.10`.
static ASN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:as)?([0-9]+)(?:\.([0-9]+))?$").expect("ASN pattern is a valid regex")
});

/// Error returned when text cannot be read as an ASN
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse '{input}' as ASN")]
pub struct AsnParseError {
    /// The text that failed to parse
    pub input: String,
}

/// A 32-bit Autonomous System Number.
///
/// Zero is reserved and is used to mean "no ASN", e.g. for locally
/// classified special-purpose addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asn(u32);

impl Asn {
    /// The reserved zero ASN
    pub const NONE: Asn = Asn(0);

    /// Create an ASN from its numeric value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value of the ASN
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved zero ASN
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// asplain notation (RFC 5396), e.g. `14525`
    pub fn as_plain(self) -> String {
        self.0.to_string()
    }

    /// asdot notation (RFC 5396); 16-bit ASNs are rendered as plain numbers
    pub fn as_dot(self) -> String {
        let high = self.0 >> 16;
        let low = self.0 & 0xffff;
        if high == 0 {
            low.to_string()
        } else {
            format!("{high}.{low}")
        }
    }

    /// The WHOIS query text for this ASN, e.g. `as14525`
    pub fn whois_query(self) -> String {
        format!("as{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl FromStr for Asn {
    type Err = AsnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AsnParseError {
            input: s.to_string(),
        };
        let caps = ASN_PATTERN.captures(s.trim()).ok_or_else(err)?;

        match caps.get(2) {
            Some(low) => {
                let high: u16 = caps[1].parse().map_err(|_| err())?;
                let low: u16 = low.as_str().parse().map_err(|_| err())?;
                Ok(Asn((u32::from(high) << 16) | u32::from(low)))
            }
            None => caps[1].parse::<u32>().map(Asn).map_err(|_| err()),
        }
    }
}

/// Parse an ASN from any of its accepted text forms
pub fn parse_asn(input: &str) -> Result<Asn, AsnParseError> {
    input.parse()
}

/// Checks whether the text looks like an ASN
pub fn is_asn(input: &str) -> bool {
    parse_asn(input).is_ok()
}
