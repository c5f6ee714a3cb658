//! DNS functionality for forward and reverse lookups

pub mod lookup;
pub mod reverse;

use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use std::time::Duration;

pub use lookup::{AaaaRecord, ARecord, DnsClient, PtrRecord, RecordKind};
pub use reverse::reverse_name;

/// Error type for DNS operations
#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    /// The configured resolver address could not be used
    #[error("invalid DNS server '{server}': {reason}")]
    InvalidServer {
        /// Configured `host:port`
        server: String,
        /// Why it was rejected
        reason: String,
    },

    /// The query name is not a valid domain name
    #[error("invalid DNS name '{name}': {reason}")]
    InvalidName {
        /// Offending name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The resolver could not complete the exchange
    #[error("DNS exchange with '{server}' failed: {source}")]
    Transport {
        /// Configured `host:port`
        server: String,
        /// Underlying resolver error
        source: hickory_resolver::ResolveError,
    },

    /// The resolver did not answer in time
    #[error("DNS server '{server}' did not respond within {timeout:?}")]
    Timeout {
        /// Configured `host:port`
        server: String,
        /// Exchange timeout
        timeout: Duration,
    },

    /// The resolver answered with a code other than NOERROR
    #[error("failed to query '{name}', code {code}")]
    ResponseCode {
        /// Queried name
        name: String,
        /// Response code returned
        code: ResponseCode,
    },

    /// An answer record was not of the requested kind
    #[error("failed to read answer for '{name}' as {expected} record (got {found})")]
    TypeMismatch {
        /// Owner name of the answer
        name: String,
        /// Requested kind
        expected: RecordType,
        /// Kind actually returned
        found: RecordType,
    },
}
