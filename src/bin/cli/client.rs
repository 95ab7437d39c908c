use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use flashdeck::auth::AUTH_COOKIE;
use flashdeck::dto::{
    AssignFlashCardDto, CollectionDetailDto, CollectionSummaryDto, CreateCollectionDto,
    CreateFlashCardDto, CreatedFlashCardDto, LoginDto, LoginResponseDto, MessageDto, RegisterDto,
    RelationDto, SetLearnedDto, UpdateCollectionDto, UserDto,
};
use flashdeck::models::{Collection, CollectionFlashCard, FlashCard};
use flashdeck::study::{AccessError, CardRelation, ProgressStore, RelationSource};
use reqwest::{Client, Method, RequestBuilder, StatusCode};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
    /// The stored session token could not be written or removed
    Session(std::io::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
            ClientError::Session(err) => write!(f, "Could not update stored session: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Session(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

impl From<ClientError> for AccessError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Server { status: StatusCode::NOT_FOUND, .. } => AccessError::NotFound,
            ClientError::Server { status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, .. } => {
                AccessError::Forbidden
            }
            other => AccessError::Transport(other.to_string()),
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the Flashdeck server
///
/// The session token from `login` is kept in a file so later invocations
/// stay logged in; it is sent as the `auth_token` cookie.
#[derive(Clone)]
pub struct FlashdeckClient {
    /// The base URL of the server (e.g. "http://127.0.0.1:8080")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
    /// Where the session token is persisted, if anywhere
    token_path: Option<PathBuf>,
    /// The current session token
    token: Arc<RwLock<Option<String>>>,
}

impl FlashdeckClient {
    /// Creates a new FlashdeckClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the Flashdeck server
    /// * `token_path` - File holding the session token between runs
    pub fn new(base_url: String, token_path: Option<PathBuf>) -> Self {
        let token = token_path
            .as_ref()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token_path,
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Starts a request to `/api{path}`, carrying the session cookie if any
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let builder = self.client.request(method, url);

        let token = self.token.read().ok().and_then(|token| token.clone());
        match token {
            Some(token) => builder.header(reqwest::header::COOKIE, format!("{}={}", AUTH_COOKIE, token)),
            None => builder,
        }
    }

    fn store_token(&self, token: Option<String>) -> Result<(), ClientError> {
        if let Some(path) = &self.token_path {
            match &token {
                Some(token) => {
                    if let Some(dir) = path.parent() {
                        std::fs::create_dir_all(dir).map_err(ClientError::Session)?;
                    }
                    std::fs::write(path, token).map_err(ClientError::Session)?;
                }
                None if path.exists() => std::fs::remove_file(path).map_err(ClientError::Session)?,
                None => {}
            }
        }

        if let Ok(mut current) = self.token.write() {
            *current = token;
        }
        Ok(())
    }

    // ── Account endpoints ────────────────────────────────────────────

    /// Registers a new account
    pub async fn register(&self, username: String, password: String, role: Option<String>) -> Result<UserDto, ClientError> {
        let dto = RegisterDto { username, password, role };
        let response = self.request(Method::POST, "/register").json(&dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Logs in and remembers the session token
    pub async fn login(&self, username: String, password: String) -> Result<LoginResponseDto, ClientError> {
        let dto = LoginDto { username, password };
        let response = self.request(Method::POST, "/login").json(&dto).send().await.map_err(ClientError::Request)?.check().await?;
        let login: LoginResponseDto = response.json().await.map_err(ClientError::Request)?;
        self.store_token(Some(login.token.clone()))?;
        Ok(login)
    }

    /// Logs out and forgets the session token
    pub async fn logout(&self) -> Result<MessageDto, ClientError> {
        let response = self.request(Method::POST, "/logout").send().await.map_err(ClientError::Request)?.check().await?;
        let message = response.json().await.map_err(ClientError::Request)?;
        self.store_token(None)?;
        Ok(message)
    }

    /// Gets the logged-in user
    pub async fn me(&self) -> Result<UserDto, ClientError> {
        let response = self.request(Method::GET, "/me").send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Collection endpoints ─────────────────────────────────────────

    /// Lists the caller's collections
    pub async fn list_collections(&self) -> Result<Vec<CollectionSummaryDto>, ClientError> {
        let response = self.request(Method::GET, "/collections").send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Lists everyone's public collections
    pub async fn list_public_collections(&self) -> Result<Vec<CollectionSummaryDto>, ClientError> {
        let response = self.request(Method::GET, "/public-collections").send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets a collection with its cards
    pub async fn get_collection(&self, id: &str) -> Result<CollectionDetailDto, ClientError> {
        let response = self.request(Method::GET, &format!("/collections/{}", id)).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates a collection
    pub async fn create_collection(&self, dto: &CreateCollectionDto) -> Result<Collection, ClientError> {
        let response = self.request(Method::POST, "/collections").json(dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Updates the given fields of a collection
    pub async fn update_collection(&self, id: &str, dto: &UpdateCollectionDto) -> Result<Collection, ClientError> {
        let response = self.request(Method::PATCH, &format!("/collections/{}", id)).json(dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a collection
    pub async fn delete_collection(&self, id: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &format!("/collections/{}", id)).send().await.map_err(ClientError::Request)?.check().await?;
        Ok(())
    }

    // ── Cards within a collection ────────────────────────────────────

    /// Lists the card relations of a collection
    pub async fn list_collection_cards(&self, collection_id: &str) -> Result<Vec<RelationDto>, ClientError> {
        let path = format!("/collections/{}/flashcards", collection_id);
        let response = self.request(Method::GET, &path).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates a card inside a collection
    pub async fn create_card(&self, collection_id: &str, dto: &CreateFlashCardDto) -> Result<CreatedFlashCardDto, ClientError> {
        let path = format!("/collections/{}/flashcards", collection_id);
        let response = self.request(Method::POST, &path).json(dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Attaches an existing card to a collection
    pub async fn attach_card(&self, collection_id: &str, card_id: &str, priority: Option<i32>) -> Result<CollectionFlashCard, ClientError> {
        let path = format!("/collections/{}/flashcards/{}", collection_id, card_id);
        let dto = AssignFlashCardDto { priority };
        let response = self.request(Method::POST, &path).json(&dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Removes a card from a collection
    pub async fn detach_card(&self, collection_id: &str, card_id: &str) -> Result<MessageDto, ClientError> {
        let path = format!("/collections/{}/flashcards/{}", collection_id, card_id);
        let response = self.request(Method::DELETE, &path).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Sets the learned flag of a card in a collection
    pub async fn set_learned(&self, collection_id: &str, card_id: &str, is_learned: bool) -> Result<CollectionFlashCard, ClientError> {
        let path = format!("/collections/{}/flashcards/{}", collection_id, card_id);
        let dto = SetLearnedDto { is_learned };
        let response = self.request(Method::PUT, &path).json(&dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Finds cards that are not yet in a collection
    pub async fn search_collection_cards(&self, collection_id: &str, text: &str) -> Result<Vec<FlashCard>, ClientError> {
        let path = format!("/collections/{}/flashcards/search", collection_id);
        let response = self.request(Method::GET, &path).query(&[("text", text)]).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Global card endpoints ────────────────────────────────────────

    /// Lists every card
    pub async fn list_flash_cards(&self) -> Result<Vec<FlashCard>, ClientError> {
        let response = self.request(Method::GET, "/flashcards").send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Searches every card by question or answer
    pub async fn search_flash_cards(&self, text: &str) -> Result<Vec<FlashCard>, ClientError> {
        let response = self.request(Method::GET, "/flashcards/search").query(&[("text", text)]).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a card everywhere (admin only)
    pub async fn delete_flash_card(&self, id: &str) -> Result<MessageDto, ClientError> {
        let response = self.request(Method::DELETE, &format!("/flashcards/{}", id)).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }
}

impl RelationSource for FlashdeckClient {
    async fn fetch_collection_relations(&self, collection_id: &str) -> Result<Vec<CardRelation>, AccessError> {
        let relations = self.list_collection_cards(collection_id).await?;
        Ok(relations.into_iter().map(CardRelation::from).collect())
    }
}

impl ProgressStore for FlashdeckClient {
    async fn write_learned_status(&self, collection_id: &str, card_id: &str, is_learned: bool) -> Result<(), AccessError> {
        self.set_learned(collection_id, card_id, is_learned).await?;
        Ok(())
    }
}
