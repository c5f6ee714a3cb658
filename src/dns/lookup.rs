//! Typed single-record-kind DNS queries against one recursive resolver

use super::DnsError;
use crate::config::DnsConfig;
use hickory_resolver::config::{NameServerConfig, ResolveHosts, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::TokioResolver;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

/// A DNS record kind that can be requested and extracted from an answer
pub trait RecordKind {
    /// Query type sent to the resolver
    const RECORD_TYPE: RecordType;
    /// Value extracted from each matching answer
    type Output;

    /// The answer's value, or `None` if the record is of another kind
    fn extract(data: &RData) -> Option<Self::Output>;
}

/// IPv4 address records
#[derive(Debug, Clone, Copy)]
pub struct ARecord;

impl RecordKind for ARecord {
    const RECORD_TYPE: RecordType = RecordType::A;
    type Output = Ipv4Addr;

    fn extract(data: &RData) -> Option<Ipv4Addr> {
        match data {
            RData::A(a) => Some(a.0),
            _ => None,
        }
    }
}

/// IPv6 address records
#[derive(Debug, Clone, Copy)]
pub struct AaaaRecord;

impl RecordKind for AaaaRecord {
    const RECORD_TYPE: RecordType = RecordType::AAAA;
    type Output = Ipv6Addr;

    fn extract(data: &RData) -> Option<Ipv6Addr> {
        match data {
            RData::AAAA(aaaa) => Some(aaaa.0),
            _ => None,
        }
    }
}

/// Pointer records; names are returned without the trailing dot
#[derive(Debug, Clone, Copy)]
pub struct PtrRecord;

impl RecordKind for PtrRecord {
    const RECORD_TYPE: RecordType = RecordType::PTR;
    type Output = String;

    fn extract(data: &RData) -> Option<String> {
        match data {
            RData::PTR(ptr) => Some(ptr.0.to_utf8().trim_end_matches('.').to_string()),
            _ => None,
        }
    }
}

/// DNS client bound to one configured recursive resolver
#[derive(Debug, Clone, Default)]
pub struct DnsClient {
    config: DnsConfig,
}

impl DnsClient {
    /// Create a client for the configured resolver
    pub fn new(config: DnsConfig) -> Self {
        Self { config }
    }

    /// The resolver settings in use
    pub fn config(&self) -> &DnsConfig {
        &self.config
    }

    /// Issue one recursive query for records of kind `K`.
    ///
    /// Fails on transport errors, on any response code other than
    /// `NOERROR`, and if any answer is not of kind `K`.
    pub async fn lookup<K: RecordKind>(&self, target: &str) -> Result<Vec<K::Output>, DnsError> {
        let fqdn = if target.ends_with('.') {
            target.to_string()
        } else {
            format!("{target}.")
        };
        let name = Name::from_ascii(&fqdn).map_err(|e| DnsError::InvalidName {
            name: target.to_string(),
            reason: e.to_string(),
        })?;

        let resolver = self.resolver().await?;
        log::debug!("DNS {} {} via {}", K::RECORD_TYPE, fqdn, self.config.server);

        let answer = match resolver.lookup(name, K::RECORD_TYPE).await {
            Ok(answer) => answer,
            Err(e) => return self.lookup_failed(fqdn, e).map(|()| Vec::new()),
        };

        answer
            .record_iter()
            .map(|record| {
                K::extract(record.data()).ok_or_else(|| DnsError::TypeMismatch {
                    name: record.name().to_string(),
                    expected: K::RECORD_TYPE,
                    found: record.record_type(),
                })
            })
            .collect()
    }

    /// Look up both the A and AAAA records of `host`, in that order
    pub async fn forward_lookup(
        &self,
        host: &str,
    ) -> Result<(Vec<Ipv4Addr>, Vec<Ipv6Addr>), DnsError> {
        let v4 = self.lookup::<ARecord>(host).await?;
        let v6 = self.lookup::<AaaaRecord>(host).await?;
        Ok((v4, v6))
    }

    async fn server_addr(&self) -> Result<SocketAddr, DnsError> {
        let server = &self.config.server;
        let invalid = |reason: String| DnsError::InvalidServer {
            server: server.clone(),
            reason,
        };
        tokio::net::lookup_host(server.as_str())
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no addresses found".to_string()))
    }

    /// A resolver that sends every query to the configured server only,
    /// once, with nothing cached between lookups
    async fn resolver(&self) -> Result<TokioResolver, DnsError> {
        let server = self.server_addr().await?;

        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(server, Protocol::Udp));
        // Used only when the UDP answer is truncated
        config.add_name_server(NameServerConfig::new(server, Protocol::Tcp));

        let mut opts = ResolverOpts::default();
        opts.timeout = self.config.timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = ResolveHosts::Never;
        // Keep CNAMEs in the answer so they surface as type mismatches
        opts.preserve_intermediates = true;

        Ok(
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(opts)
                .build(),
        )
    }

    /// Classify a failed lookup. An empty NOERROR answer is not a failure.
    fn lookup_failed(
        &self,
        name: String,
        err: hickory_resolver::ResolveError,
    ) -> Result<(), DnsError> {
        match err.proto().map(|e| e.kind()) {
            Some(ProtoErrorKind::NoRecordsFound { response_code, .. }) => {
                if *response_code == ResponseCode::NoError {
                    Ok(())
                } else {
                    Err(DnsError::ResponseCode {
                        name,
                        code: *response_code,
                    })
                }
            }
            Some(ProtoErrorKind::Timeout) => Err(DnsError::Timeout {
                server: self.config.server.clone(),
                timeout: self.config.timeout,
            }),
            _ => Err(DnsError::Transport {
                server: self.config.server.clone(),
                source: err,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_dns_server;
    use hickory_resolver::proto::op::{Message, MessageType, OpCode};
    use hickory_resolver::proto::rr::rdata::{A, AAAA, CNAME, PTR};
    use hickory_resolver::proto::rr::Record;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::UdpSocket;

    fn reply(query: &Message, code: ResponseCode, answers: Vec<RData>) -> Message {
        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_recursion_available(true)
            .set_response_code(code)
            .add_queries(query.queries().to_vec());
        let name = query.queries()[0].name().clone();
        for data in answers {
            response.add_answer(Record::from_rdata(name.clone(), 300, data));
        }
        response
    }

    #[tokio::test]
    async fn test_lookup_a() {
        let config = spawn_dns_server(|q| {
            assert_eq!(q.queries()[0].query_type(), RecordType::A);
            assert!(q.recursion_desired());
            reply(
                q,
                ResponseCode::NoError,
                vec![
                    RData::A(A(Ipv4Addr::new(1, 1, 1, 1))),
                    RData::A(A(Ipv4Addr::new(1, 0, 0, 1))),
                ],
            )
        })
        .await;

        let client = DnsClient::new(config);
        let addrs = client.lookup::<ARecord>("one.one.one.one").await.unwrap();
        assert_eq!(
            addrs,
            vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(1, 0, 0, 1)]
        );
    }

    #[tokio::test]
    async fn test_lookup_is_not_cached() {
        let queries = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&queries);
        let config = spawn_dns_server(move |q| {
            seen.fetch_add(1, Ordering::SeqCst);
            reply(
                q,
                ResponseCode::NoError,
                vec![RData::A(A(Ipv4Addr::new(192, 0, 2, 7)))],
            )
        })
        .await;

        let client = DnsClient::new(config);
        for _ in 0..2 {
            let addrs = client.lookup::<ARecord>("cached.example").await.unwrap();
            assert_eq!(addrs, vec![Ipv4Addr::new(192, 0, 2, 7)]);
        }
        assert_eq!(queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_empty_answer() {
        let config = spawn_dns_server(|q| reply(q, ResponseCode::NoError, vec![])).await;
        let client = DnsClient::new(config);
        let addrs = client.lookup::<AaaaRecord>("v4only.example").await.unwrap();
        assert!(addrs.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_nxdomain() {
        let config = spawn_dns_server(|q| reply(q, ResponseCode::NXDomain, vec![])).await;
        let client = DnsClient::new(config);
        match client.lookup::<ARecord>("missing.example").await {
            Err(DnsError::ResponseCode { name, code }) => {
                assert_eq!(name, "missing.example.");
                assert_eq!(code, ResponseCode::NXDomain);
            }
            other => panic!("expected response code error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_cname_is_type_mismatch() {
        let config = spawn_dns_server(|q| {
            let target = Name::from_ascii("edge.example.").unwrap();
            let mut response = reply(
                q,
                ResponseCode::NoError,
                vec![RData::CNAME(CNAME(target.clone()))],
            );
            response.add_answer(Record::from_rdata(
                target,
                300,
                RData::A(A(Ipv4Addr::new(192, 0, 2, 9))),
            ));
            response
        })
        .await;
        let client = DnsClient::new(config);
        match client.lookup::<ARecord>("alias.example").await {
            Err(DnsError::TypeMismatch {
                name,
                expected,
                found,
            }) => {
                assert_eq!(name, "alias.example.");
                assert_eq!(expected, RecordType::A);
                assert_eq!(found, RecordType::CNAME);
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_ptr_strips_trailing_dot() {
        let config = spawn_dns_server(|q| {
            let target = Name::from_ascii("one.one.one.one.").unwrap();
            reply(q, ResponseCode::NoError, vec![RData::PTR(PTR(target))])
        })
        .await;
        let client = DnsClient::new(config);
        let names = client
            .lookup::<PtrRecord>("1.1.1.1.in-addr.arpa")
            .await
            .unwrap();
        assert_eq!(names, vec!["one.one.one.one".to_string()]);
    }

    #[tokio::test]
    async fn test_forward_lookup() {
        let config = spawn_dns_server(|q| match q.queries()[0].query_type() {
            RecordType::A => reply(
                q,
                ResponseCode::NoError,
                vec![RData::A(A(Ipv4Addr::new(192, 0, 2, 1)))],
            ),
            _ => reply(
                q,
                ResponseCode::NoError,
                vec![RData::AAAA(AAAA("2001:db8::1".parse().unwrap()))],
            ),
        })
        .await;
        let client = DnsClient::new(config);
        let (v4, v6) = client.forward_lookup("host.example").await.unwrap();
        assert_eq!(v4, vec![Ipv4Addr::new(192, 0, 2, 1)]);
        assert_eq!(v6, vec!["2001:db8::1".parse::<Ipv6Addr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_forward_lookup_fails_if_either_fails() {
        let config = spawn_dns_server(|q| match q.queries()[0].query_type() {
            RecordType::A => reply(q, ResponseCode::NoError, vec![]),
            _ => reply(q, ResponseCode::ServFail, vec![]),
        })
        .await;
        let client = DnsClient::new(config);
        let result = client.forward_lookup("host.example").await;
        assert!(
            matches!(
                result,
                Err(DnsError::ResponseCode {
                    code: ResponseCode::ServFail,
                    ..
                })
            ),
            "expected SERVFAIL, got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_invalid_server() {
        let client = DnsClient::new(DnsConfig::new("not a server"));
        let result = client.lookup::<ARecord>("example.com").await;
        assert!(matches!(result, Err(DnsError::InvalidServer { .. })));
    }

    #[tokio::test]
    async fn test_invalid_name() {
        let client = DnsClient::new(DnsConfig::new("127.0.0.1:53"));
        let label = "a".repeat(64);
        let result = client.lookup::<ARecord>(&label).await;
        assert!(matches!(result, Err(DnsError::InvalidName { .. })));
    }

    #[tokio::test]
    async fn test_timeout() {
        // A bound socket that never answers
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = DnsConfig::new(silent.local_addr().unwrap().to_string())
            .with_timeout(std::time::Duration::from_millis(200));
        let client = DnsClient::new(config);
        let result = client.lookup::<ARecord>("example.com").await;
        assert!(
            matches!(result, Err(DnsError::Timeout { .. })),
            "expected timeout, got {result:?}"
        );
        drop(silent);
    }
}
