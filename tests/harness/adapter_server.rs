//! Minimal HTTP/1.1 stand-in for the marketplace adapter service.
//!
//! Each path answers from a script of responses; the last one repeats.
//! Unknown paths answer 404.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Response {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as received: path and parsed JSON body.
#[derive(Debug, Clone)]
pub struct Received {
    pub path: String,
    pub body: Value,
}

type Scripts = Arc<Mutex<HashMap<String, Vec<Response>>>>;

pub struct AdapterServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
    task: JoinHandle<()>,
}

impl AdapterServer {
    pub async fn start(routes: Vec<(&str, Vec<Response>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind adapter");
        let addr = listener.local_addr().expect("local addr");
        let scripts: Scripts = Arc::new(Mutex::new(
            routes
                .into_iter()
                .map(|(path, responses)| (path.to_string(), responses))
                .collect(),
        ));
        let received = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let received = Arc::clone(&received);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let scripts = Arc::clone(&scripts);
                    let received = Arc::clone(&received);
                    tokio::spawn(async move {
                        let _ = serve(stream, scripts, received).await;
                    });
                }
            })
        };

        Self { addr, received, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.received.lock().iter().filter(|r| r.path == path).count()
    }
}

impl Drop for AdapterServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    scripts: Scripts,
    received: Arc<Mutex<Vec<Received>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);
    received.lock().push(Received {
        path: path.clone(),
        body,
    });

    let response = {
        let mut scripts = scripts.lock();
        match scripts.get_mut(&path) {
            Some(responses) if responses.len() > 1 => responses.remove(0),
            Some(responses) if !responses.is_empty() => responses[0].clone(),
            _ => Response::text(404, "not found"),
        }
    };
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let reply = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    stream.write_all(reply.as_bytes()).await?;
    stream.shutdown().await
}
