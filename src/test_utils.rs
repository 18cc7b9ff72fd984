use crate::api::{ApiClient, ApiConfig, ApiError, ApiRequest, ApiResult, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// In-memory transport that answers from a script and records every request.
///
/// Responses are queued per `(method, path)`; the last queued response for a
/// route keeps being returned once the others are used up. Unscripted routes
/// fail with a connection error.
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResult<Value>>>>,
    default: ApiResult<Value>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            default: Err(ApiError::NetworkError("Connection refused".to_string())),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Nothing scripted: every request fails as if the host were down.
    pub fn unreachable() -> Arc<Self> {
        Self::new()
    }

    pub fn respond(&self, method: Method, path: &str, result: ApiResult<Value>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, Ok(body));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(Arc::clone(self) as Arc<dyn Transport>)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| self.default.clone()),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| self.default.clone()),
            None => self.default.clone(),
        }
    }
}

pub fn http_error(status: u16, detail: &str) -> ApiError {
    ApiError::Http {
        status,
        detail: Some(detail.to_string()),
        body: format!(r#"{{"detail":"{}"}}"#, detail),
    }
}

/// HTTP/1.1 server on an ephemeral local port that answers every connection
/// with the raw response built from its request line. Request heads are
/// recorded. Only suitable for requests without a body.
pub struct RawServer {
    base_url: String,
    heads: Arc<Mutex<Vec<String>>>,
}

impl RawServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let heads = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&heads);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let head = read_head(&mut socket).await;
                let request_line = head.lines().next().unwrap_or_default().to_string();
                log.lock().unwrap().push(head);
                let _ = socket.write_all(respond(&request_line).as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url, heads }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url).with_timeout(Duration::from_secs(5))
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::from_config(self.config()).unwrap()
    }

    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

pub fn raw_response(status: u16, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} Test\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    )
}

/// Base URL of a local port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
