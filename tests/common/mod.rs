//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A gateway stand-in that records every request body it receives.
pub struct MockGateway {
    pub url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> serde_json::Value {
        let requests = self.requests.lock().unwrap();
        serde_json::from_str(requests.last().expect("no request received")).unwrap()
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Start a programmable gateway; `respond` maps a request body to
/// `(status, body)`.
pub async fn start_gateway<F>(respond: F) -> MockGateway
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let body = read_request_body(&mut socket).await;
                        let (status, response) = respond(&body);
                        recorded.lock().unwrap().push(body);

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockGateway {
        url: format!("http://{}/", addr),
        requests,
    }
}

async fn read_request_body(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return String::new();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf[header_end..]).into_owned()
}

/// Gateway JSON for a run where every listed node reports `success`.
#[allow(dead_code)]
pub fn gateway_response(nodes: &[bool]) -> String {
    let node_responses: Vec<serde_json::Value> = nodes
        .iter()
        .enumerate()
        .map(|(i, ok)| {
            serde_json::json!({
                "body": {
                    "sender": format!("0xnode{}", i),
                    "payload": if *ok {
                        serde_json::json!({ "success": true })
                    } else {
                        serde_json::json!({ "success": false, "error_message": "slot version too old" })
                    }
                }
            })
        })
        .collect();

    serde_json::json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": {
            "body": {
                "payload": { "success": true, "node_responses": node_responses }
            }
        }
    })
    .to_string()
}
