use super::auth::TokenStore;
use super::{ApiConfig, ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Transport-neutral multipart body. Converted to a `reqwest` form only at
/// send time so requests stay inspectable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn optional_text(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(mut self, field: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.files.push(FilePart {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn into_reqwest(self) -> ApiResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .map_err(|e| ApiError::InvalidInput(format!("Failed to create multipart: {}", e)))?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// One round trip to the backend. Implementations make a single attempt and
/// return the decoded JSON body of a 2xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value>;
}

pub struct HttpTransport {
    client: Client,
    config: ApiConfig,
}

impl HttpTransport {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidInput(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn handle_response(response: Response) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str::<Value>(&body)
                .map_err(|e| ApiError::parse(format!("Failed to parse response: {}", e), &body))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Http {
                status: status.as_u16(),
                detail: error_detail(&body),
                body: super::preview(&body),
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.config.url(&request.path);
        let request_id = Uuid::new_v4();
        let method = request.method;

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        info!("[{}] -> {} {}", request_id, method, url);
        let started = Instant::now();

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::from(e);
                warn!("[{}] {} {} failed: {}", request_id, method, url, error);
                return Err(error);
            }
        };

        info!(
            "[{}] <- {} {} {} ({} ms)",
            request_id,
            response.status().as_u16(),
            method,
            url,
            started.elapsed().as_millis()
        );

        let result = Self::handle_response(response).await;
        if let Err(error) = &result {
            debug!("[{}] {} {} returned error: {}", request_id, method, url, error);
        }
        result
    }
}

/// Extracts the server-provided explanation from an error body. FastAPI puts
/// it under `detail` (a string, or a list of validation errors); other
/// services use `message`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("message"))?;
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                Some(detail.to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Typed façade over a [`Transport`]. Cheap to clone; every resource module
/// holds its own copy.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            tokens: None,
        }
    }

    pub fn from_config(config: ApiConfig) -> ApiResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn token_store(&self) -> Option<&Arc<dyn TokenStore>> {
        self.tokens.as_ref()
    }

    async fn execute<T: DeserializeOwned>(&self, mut request: ApiRequest) -> ApiResult<T> {
        if request.bearer.is_none() {
            request.bearer = match &self.tokens {
                Some(tokens) => tokens.token()?,
                None => None,
            };
        }
        let value = self.transport.send(request).await?;
        decode(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::Get, endpoint)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::Get, endpoint).query(query))
            .await
    }

    pub async fn post<T: DeserializeOwned, R: Serialize>(
        &self,
        endpoint: &str,
        body: &R,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::new(Method::Post, endpoint).body(RequestBody::Json(body)))
            .await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: MultipartForm,
    ) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::Post, endpoint).body(RequestBody::Multipart(form)))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::Delete, endpoint)).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value::<T>(value.clone()).map_err(|e| {
        ApiError::parse(format!("Failed to parse response: {}", e), &value.to_string())
    })
}
