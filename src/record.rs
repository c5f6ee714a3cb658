//! The unified result of an IP or ASN resolution

use crate::asn::Asn;
use chrono::NaiveDate;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Allocation date reported for locally classified special-purpose addresses
pub const DEFAULT_ALLOCATED_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1981, 9, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Two-letter ISO 3166-1 country code, stored uppercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// United States, used for IANA-held special-purpose space
    pub const US: CountryCode = CountryCode(*b"US");

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Regional indicator flag emoji for the code
    pub fn flag(&self) -> String {
        self.0
            .iter()
            .filter_map(|b| char::from_u32(0x1F1E6 + u32::from(b - b'A')))
            .collect()
    }
}

impl FromStr for CountryCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(CountryCode([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(()),
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|()| serde::de::Error::custom(format!("invalid country code '{s}'")))
    }
}

/// Registry responsible for an allocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Registry {
    /// American Registry for Internet Numbers
    Arin,
    /// RIPE Network Coordination Centre
    Ripe,
    /// Asia-Pacific Network Information Centre
    Apnic,
    /// Latin America and Caribbean Network Information Centre
    Lacnic,
    /// African Network Information Centre
    Afrinic,
    /// Internet Assigned Numbers Authority (special-purpose space)
    Iana,
    /// Any other value reported by the WHOIS service
    Other(String),
}

impl Registry {
    /// Display name of the registry
    pub fn as_str(&self) -> &str {
        match self {
            Registry::Arin => "ARIN",
            Registry::Ripe => "RIPE",
            Registry::Apnic => "APNIC",
            Registry::Lacnic => "LACNIC",
            Registry::Afrinic => "AFRINIC",
            Registry::Iana => "IANA",
            Registry::Other(name) => name,
        }
    }
}

impl From<&str> for Registry {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARIN" => Registry::Arin,
            "RIPE" | "RIPENCC" | "RIPE NCC" => Registry::Ripe,
            "APNIC" => Registry::Apnic,
            "LACNIC" => Registry::Lacnic,
            "AFRINIC" => Registry::Afrinic,
            "IANA" => Registry::Iana,
            _ => Registry::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Registry {
    fn from(s: String) -> Self {
        Registry::from(s.as_str())
    }
}

impl From<Registry> for String {
    fn from(registry: Registry) -> Self {
        registry.as_str().to_string()
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifying and ownership information for an IP address, prefix or ASN.
///
/// Produced either by local special-purpose classification
/// (`from_query == false`) or by a live WHOIS query (`from_query == true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    /// Origin ASN; [`Asn::NONE`] for local classification or unadvertised space
    pub asn: Asn,
    /// The queried IP address, if any
    pub ip: Option<IpAddr>,
    /// The special-purpose range or the BGP-advertised prefix
    pub prefix: Option<IpNet>,
    /// Country of registration
    pub country: Option<CountryCode>,
    /// Responsible registry
    pub registry: Registry,
    /// Allocation date
    pub allocated: NaiveDate,
    /// Organization / AS name, or the special-purpose category label
    pub name: String,
    /// Whether the record came from a live WHOIS query
    pub from_query: bool,
}
