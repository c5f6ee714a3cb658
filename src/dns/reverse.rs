//! Reverse DNS lookup functionality

use super::lookup::{DnsClient, PtrRecord};
use super::DnsError;
use std::fmt::Write;
use std::net::IpAddr;

/// Build the `in-addr.arpa` / `ip6.arpa` name for an address
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa.")
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(73);
            for byte in v6.octets().iter().rev() {
                let _ = write!(name, "{:x}.{:x}.", byte & 0x0f, byte >> 4);
            }
            name.push_str("ip6.arpa.");
            name
        }
    }
}

impl DnsClient {
    /// Look up the PTR names of an address
    pub async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, DnsError> {
        self.lookup::<PtrRecord>(&reverse_name(ip)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_dns_server;
    use hickory_resolver::proto::op::{Message, MessageType, ResponseCode};
    use hickory_resolver::proto::rr::rdata::PTR;
    use hickory_resolver::proto::rr::{Name, RData, Record, RecordType};

    #[test]
    fn test_reverse_name_ipv4() {
        assert_eq!(
            reverse_name("1.2.3.4".parse().unwrap()),
            "4.3.2.1.in-addr.arpa."
        );
    }

    #[test]
    fn test_reverse_name_ipv6() {
        assert_eq!(
            reverse_name("2001:db8::567:89ab".parse().unwrap()),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa."
        );
    }

    #[tokio::test]
    async fn test_reverse_lookup() {
        let config = spawn_dns_server(|q| {
            let question = &q.queries()[0];
            assert_eq!(question.query_type(), RecordType::PTR);
            assert_eq!(question.name().to_string(), "1.1.1.1.in-addr.arpa.");

            let mut response = Message::new();
            response
                .set_id(q.id())
                .set_message_type(MessageType::Response)
                .set_response_code(ResponseCode::NoError)
                .add_queries(q.queries().to_vec());
            let target = Name::from_ascii("one.one.one.one.").unwrap();
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                300,
                RData::PTR(PTR(target)),
            ));
            response
        })
        .await;

        let client = DnsClient::new(config);
        let names = client
            .reverse_lookup("1.1.1.1".parse().unwrap())
            .await
            .unwrap();
        // Sized to exactly the answers returned
        assert_eq!(names, vec!["one.one.one.one".to_string()]);
    }

    #[tokio::test]
    async fn test_reverse_lookup_nxdomain() {
        let config = spawn_dns_server(|q| {
            let mut response = Message::new();
            response
                .set_id(q.id())
                .set_message_type(MessageType::Response)
                .set_response_code(ResponseCode::NXDomain)
                .add_queries(q.queries().to_vec());
            response
        })
        .await;

        let client = DnsClient::new(config);
        let result = client.reverse_lookup("192.0.2.1".parse().unwrap()).await;
        assert!(matches!(result, Err(DnsError::ResponseCode { .. })));
    }
}
