//! Parser for the pipe-delimited verbose WHOIS output
//!
//! A response looks like:
//!
//! ```text
//! AS      | IP               | BGP Prefix          | CC | Registry | Allocated  | AS Name
//! 13335   | 1.1.1.0          | 1.1.1.0/24          | US | ARIN     | 2010-07-14 | Cloudflare, Inc.
//! ```
//!
//! optionally preceded by a free-text line containing `Warning`.

use crate::asn::Asn;
use crate::record::{CountryCode, Registry, ResolvedRecord};
use chrono::NaiveDate;
use ipnet::IpNet;
use std::net::IpAddr;

/// Number of columns in a data row
pub const COLUMN_COUNT: usize = 7;

/// Format of the `Allocated` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from parsing a WHOIS response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No header or data row was present
    #[error("empty response")]
    EmptyResponse,

    /// The data row had the wrong number of columns
    #[error("expected 7 columns, got {count} in '{row}'")]
    ColumnCount {
        /// Columns found
        count: usize,
        /// The offending row, trimmed
        row: String,
    },

    /// The AS column was not a number
    #[error("failed to parse '{0}' as ASN")]
    InvalidAsn(String),

    /// The Allocated column was not a `YYYY-MM-DD` date
    #[error("failed to parse '{0}' as allocation date")]
    InvalidDate(String),

    /// The IP column was not an address
    #[error("failed to parse IP '{0}'")]
    InvalidIp(String),

    /// The BGP Prefix column was not a CIDR prefix
    #[error("failed to parse prefix '{0}'")]
    InvalidPrefix(String),

    /// The IP and prefix belong to different address families
    #[error("IP '{ip}' and prefix '{prefix}' are different address families")]
    FamilyMismatch {
        /// IP column
        ip: String,
        /// BGP Prefix column
        prefix: String,
    },
}

fn split_row(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

fn column_count(fields: &[&str], line: &str) -> ParseError {
    ParseError::ColumnCount {
        count: fields.len(),
        row: line.trim().to_string(),
    }
}

/// Locate the data row: skip an optional warning line and the header, then
/// accept the next line with the right column count, looking at most one
/// line further.
fn data_row(raw: &str) -> Result<Vec<&str>, ParseError> {
    let mut lines = raw.lines();

    let first = lines.next().ok_or(ParseError::EmptyResponse)?;
    if first.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }
    if first.contains("Warning") {
        log::debug!("skipping WHOIS warning: {}", first.trim());
        // The header follows the warning
        lines.next().ok_or(ParseError::EmptyResponse)?;
    }

    let candidate = lines.next().ok_or(ParseError::EmptyResponse)?;
    let fields = split_row(candidate);
    if fields.len() == COLUMN_COUNT {
        return Ok(fields);
    }

    match lines.next() {
        Some(next) => {
            let retry = split_row(next);
            if retry.len() == COLUMN_COUNT {
                Ok(retry)
            } else {
                Err(column_count(&retry, next))
            }
        }
        None if candidate.trim().is_empty() => Err(ParseError::EmptyResponse),
        None => Err(column_count(&fields, candidate)),
    }
}

fn parse_route(ip: &str, prefix: &str) -> Result<(Option<IpAddr>, Option<IpNet>), ParseError> {
    // Not advertised, or only half of the route was reported
    if ip.is_empty() || prefix.is_empty() {
        if ip != prefix {
            log::debug!("ignoring partial route: ip '{ip}', prefix '{prefix}'");
        }
        return Ok((None, None));
    }

    let addr: IpAddr = ip
        .parse()
        .map_err(|_| ParseError::InvalidIp(ip.to_string()))?;
    let net: IpNet = prefix
        .parse()
        .map_err(|_| ParseError::InvalidPrefix(prefix.to_string()))?;
    if addr.is_ipv4() != matches!(net, IpNet::V4(_)) {
        return Err(ParseError::FamilyMismatch {
            ip: ip.to_string(),
            prefix: prefix.to_string(),
        });
    }
    Ok((Some(addr), Some(net.trunc())))
}

/// Parse a raw verbose WHOIS response into a record
pub fn parse_response(raw: &str) -> Result<ResolvedRecord, ParseError> {
    let fields = data_row(raw)?;
    let &[asn, ip, prefix, country, registry, allocated, name] = fields.as_slice() else {
        return Err(column_count(&fields, &fields.join(" | ")));
    };

    // Plain number only; the `AS` prefix and asdot are for user input
    let asn = asn
        .parse::<u32>()
        .map(Asn::new)
        .map_err(|_| ParseError::InvalidAsn(asn.to_string()))?;
    let allocated = NaiveDate::parse_from_str(allocated, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(allocated.to_string()))?;
    let (ip, prefix) = parse_route(ip, prefix)?;

    Ok(ResolvedRecord {
        asn,
        ip,
        prefix,
        country: country.parse().ok(),
        registry: Registry::from(registry),
        allocated,
        name: name.to_string(),
        from_query: true,
    })
}
