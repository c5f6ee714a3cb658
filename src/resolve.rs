//! Resolution of IP addresses, prefixes and ASNs
//!
//! IP queries are first checked against the special-purpose tables and only
//! sent to the WHOIS service when the address is globally routable. ASN
//! queries always go to the WHOIS service.

use crate::asn::{parse_asn, AsnParseError};
use crate::config::Config;
use crate::dns::{DnsClient, DnsError};
use crate::record::{CountryCode, Registry, ResolvedRecord, DEFAULT_ALLOCATED_DATE};
use crate::special::{classify, SpecialRange};
use crate::whois::{parse_response, ParseError, WhoisClient, WhoisError};
use crate::Asn;
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Errors from resolving a query
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The input is not an ASN
    #[error(transparent)]
    InvalidAsn(#[from] AsnParseError),

    /// The input is neither an IP address nor a CIDR prefix
    #[error("invalid IP address or prefix '{0}'")]
    InvalidAddress(String),

    /// The WHOIS exchange failed
    #[error(transparent)]
    Whois(#[from] WhoisError),

    /// The WHOIS response could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A DNS lookup failed
    #[error(transparent)]
    Dns(#[from] DnsError),
}

/// What a free-form query argument refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// An IP address or CIDR prefix
    Ip,
    /// An autonomous system number
    Asn,
}

impl QueryKind {
    /// Detect the kind of a query; addresses take precedence over ASNs
    pub fn detect(input: &str) -> Option<QueryKind> {
        if parse_ip_or_prefix(input).is_some() {
            Some(QueryKind::Ip)
        } else if crate::asn::is_asn(input) {
            Some(QueryKind::Asn)
        } else {
            None
        }
    }
}

/// Parse an address or CIDR prefix, returning the address as written
fn parse_ip_or_prefix(input: &str) -> Option<IpAddr> {
    let input = input.trim();
    input
        .parse::<IpAddr>()
        .ok()
        .or_else(|| input.parse::<IpNet>().ok().map(|net| net.addr()))
}

/// Build the record for a locally classified address
pub fn special_purpose_record(ip: IpAddr, range: &SpecialRange) -> ResolvedRecord {
    ResolvedRecord {
        asn: Asn::NONE,
        ip: Some(ip),
        prefix: Some(range.net),
        country: Some(CountryCode::US),
        registry: Registry::Iana,
        allocated: DEFAULT_ALLOCATED_DATE,
        name: range.category.label().to_string(),
        from_query: false,
    }
}

/// Resolution service holding the WHOIS and DNS configuration
///
/// # Examples
///
/// ```no_run
/// use addr::Resolver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = Resolver::new();
///
///     let record = resolver.resolve_ip("1.1.1.1").await?;
///     println!("{} {}", record.asn, record.name);
///
///     if let Some(ip) = record.ip {
///         for name in resolver.reverse_lookup(ip).await? {
///             println!("{name}");
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: Config,
    dns: DnsClient,
}

impl Resolver {
    /// Create a resolver with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with a specific configuration
    pub fn with_config(config: Config) -> Self {
        let dns = DnsClient::new(config.dns.clone());
        Self { config, dns }
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve an ASN such as `AS14525` or `14525`.
    ///
    /// The input is validated before any connection is made.
    pub async fn resolve_asn(&self, input: &str) -> Result<ResolvedRecord, ResolveError> {
        let asn = parse_asn(input)?;
        self.query(&asn.whois_query()).await
    }

    /// Resolve an IP address or CIDR prefix.
    ///
    /// Special-purpose addresses are answered without network access;
    /// anything else is sent to the WHOIS service verbatim.
    pub async fn resolve_ip(&self, input: &str) -> Result<ResolvedRecord, ResolveError> {
        let ip = parse_ip_or_prefix(input)
            .ok_or_else(|| ResolveError::InvalidAddress(input.to_string()))?;

        if let Some(range) = classify(ip) {
            log::debug!("{input} is in {} ({}), not querying", range.net, range.category);
            return Ok(special_purpose_record(ip, range));
        }
        self.query(input.trim()).await
    }

    /// A and AAAA addresses of a host name
    pub async fn forward_lookup(
        &self,
        host: &str,
    ) -> Result<(Vec<Ipv4Addr>, Vec<Ipv6Addr>), ResolveError> {
        Ok(self.dns.forward_lookup(host).await?)
    }

    /// PTR names of an address
    pub async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, ResolveError> {
        Ok(self.dns.reverse_lookup(ip).await?)
    }

    async fn query(&self, text: &str) -> Result<ResolvedRecord, ResolveError> {
        let client = WhoisClient::open(self.config.whois.clone()).await?;
        let raw = client.query(text).await?;
        Ok(parse_response(&raw)?)
    }
}

/// Resolve an ASN with the default configuration
pub async fn resolve_asn(input: &str) -> Result<ResolvedRecord, ResolveError> {
    Resolver::new().resolve_asn(input).await
}

/// Resolve an IP address or prefix with the default configuration
pub async fn resolve_ip(input: &str) -> Result<ResolvedRecord, ResolveError> {
    Resolver::new().resolve_ip(input).await
}
