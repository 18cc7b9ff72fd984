use super::{ApiClient, ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key of the cached user profile.
pub const USER_KEY: &str = "user_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Official,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: User,
}

fn bearer() -> String {
    "bearer".to_string()
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Device-local persistence of the session. Implementations store the token
/// under [`TOKEN_KEY`] and the user under [`USER_KEY`].
pub trait TokenStore: Send + Sync {
    fn token(&self) -> ApiResult<Option<String>>;
    fn user(&self) -> ApiResult<Option<User>>;
    fn save(&self, token: &str, user: &User) -> ApiResult<()>;
    fn clear(&self) -> ApiResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<(String, User)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> ApiResult<Option<String>> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.as_ref().map(|(token, _)| token.clone()))
    }

    fn user(&self) -> ApiResult<Option<User>> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.as_ref().map(|(_, user)| user.clone()))
    }

    fn save(&self, token: &str, user: &User) -> ApiResult<()> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *session = Some((token.to_string(), user.clone()));
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *session = None;
        Ok(())
    }
}

/// JSON file holding `{ "auth_token": ..., "user_data": ... }`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform's local data directory.
    pub fn default_location() -> ApiResult<Self> {
        let dir = dirs::data_local_dir()
            .ok_or_else(|| ApiError::Storage("No local data directory available".to_string()))?;
        Ok(Self::new(dir.join("transparency-client").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ApiResult<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => Ok(map),
                _ => Ok(Map::new()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(ApiError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, content).map_err(|e| {
            ApiError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> ApiResult<Option<String>> {
        Ok(self
            .read()?
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn user(&self) -> ApiResult<Option<User>> {
        match self.read()?.remove(USER_KEY) {
            Some(value) => Ok(serde_json::from_value(value).ok()),
            None => Ok(None),
        }
    }

    fn save(&self, token: &str, user: &User) -> ApiResult<()> {
        let mut map = self.read()?;
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        map.insert(USER_KEY.to_string(), serde_json::to_value(user)?);
        self.write(&map)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        let mut map = self.read()?;
        map.remove(TOKEN_KEY);
        map.remove(USER_KEY);
        self.write(&map)
    }
}

pub struct AuthApi {
    client: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl AuthApi {
    /// The client gets the token store attached so every later request from
    /// it carries the bearer token.
    pub fn new(client: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client: client.with_token_store(Arc::clone(&tokens)),
            tokens,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: Session = self.client.post("/api/auth/login", &request).await?;
        self.persist(&session)?;
        info!("Logged in as {}", session.user.email);
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Session> {
        if request.password != request.confirm_password {
            return Err(ApiError::InvalidInput("Passwords do not match".to_string()));
        }
        let session: Session = self.client.post("/api/auth/register", request).await?;
        self.persist(&session)?;
        info!("Registered {}", session.user.email);
        Ok(session)
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.get("/api/auth/me").await
    }

    pub async fn refresh(&self) -> ApiResult<Session> {
        let session: Session = self
            .client
            .post("/api/auth/refresh", &Value::Null)
            .await?;
        self.persist(&session)?;
        Ok(session)
    }

    pub fn current_user(&self) -> ApiResult<Option<User>> {
        self.tokens.user()
    }

    pub fn is_authenticated(&self) -> ApiResult<bool> {
        Ok(self.tokens.token()?.is_some())
    }

    pub fn logout(&self) -> ApiResult<()> {
        self.tokens.clear()
    }

    fn persist(&self, session: &Session) -> ApiResult<()> {
        self.tokens.save(&session.access_token, &session.user)
    }
}
