//! addr - IP address and ASN ownership lookup
//!
//! This library resolves IP addresses, CIDR prefixes and autonomous system
//! numbers to their routing and registration details. Special-purpose
//! addresses (private, loopback, documentation, ...) are answered from a
//! built-in table of IANA registrations; everything else is looked up with
//! the bgp.tools WHOIS service. Forward and reverse DNS helpers complete the
//! picture for the command-line tool.
//!
//! # Example
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), addr::ResolveError> {
//!     let record = addr::resolve_ip("10.1.2.3").await?;
//!     assert_eq!(record.name, "Private Use");
//!     assert!(!record.from_query);
//!
//!     let record = addr::resolve_asn("AS13335").await?;
//!     println!("{} {}", record.asn, record.name);
//!     Ok(())
//! }
//! ```

pub mod asn;
pub mod config;
pub mod dns;
pub mod record;
pub mod resolve;
pub mod special;
pub mod whois;

#[cfg(test)]
mod test_utils;

// Re-export core types for library users
pub use asn::{Asn, AsnParseError};
pub use config::{Config, ConfigBuilder, ConfigError, DnsConfig, WhoisConfig};
pub use dns::{DnsClient, DnsError};
pub use record::{CountryCode, Registry, ResolvedRecord, DEFAULT_ALLOCATED_DATE};
pub use resolve::{resolve_asn, resolve_ip, QueryKind, ResolveError, Resolver};
pub use special::{classify, is_global, Category, MatchMode, SpecialRange};
pub use whois::{ParseError, WhoisClient, WhoisError};
