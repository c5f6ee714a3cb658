//! In-process fake WHOIS and DNS servers for tests

use crate::config::{DnsConfig, WhoisConfig};
use hickory_resolver::proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::Mutex;

/// A loopback WHOIS server answering every query with a canned response
pub struct FakeWhoisServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeWhoisServer {
    /// Client settings pointing at this server
    pub fn config(&self) -> WhoisConfig {
        WhoisConfig::new(self.addr.ip().to_string(), self.addr.port())
            .with_timeout(Duration::from_secs(2))
    }

    /// Request lines received so far, in arrival order
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

/// Start a WHOIS server that replies with `response` and closes
pub async fn spawn_whois_server(response: &str) -> FakeWhoisServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let response = response.to_string();

    let recorded = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let (reader, mut writer) = stream.into_split();
            let mut line = String::new();
            let mut reader = BufReader::new(reader);
            // Reachability checks close without sending anything
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                continue;
            }
            recorded.lock().await.push(line);
            let _ = writer.write_all(response.as_bytes()).await;
            let _ = writer.shutdown().await;
        }
    });

    FakeWhoisServer { addr, requests }
}

/// Start a WHOIS server that accepts queries but never answers or closes
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = stream;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });
    addr
}

/// A loopback port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr").port()
}

/// Start a UDP DNS server that answers each query with `handler(query)`
pub async fn spawn_dns_server<F>(handler: F) -> DnsConfig
where
    F: Fn(&Message) -> Message + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
    let addr = socket.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut buf = [0u8; 4096];
        while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
            let Ok(query) = Message::from_vec(&buf[..len]) else {
                continue;
            };
            let Ok(bytes) = handler(&query).to_vec() else {
                continue;
            };
            let _ = socket.send_to(&bytes, peer).await;
        }
    });
    DnsConfig::new(addr.to_string()).with_timeout(Duration::from_secs(2))
}
