use crate::{
    config::Config,
    error::{ClientError, Result},
    query::{self, QueryParams},
    storage::KeyValueStore,
    types::{TokenRecord, TokenRequest, CLIENT_CREDENTIALS_GRANT},
};
use reqwest::{header, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Storage key holding the serialized [`TokenRecord`].
pub const TOKEN_STORAGE_KEY: &str = "universe-acces-data";

#[derive(Clone)]
pub struct UniverseClient {
    config: Arc<Config>,
    storage: Arc<dyn KeyValueStore>,
    http_client: reqwest::Client,
}

impl UniverseClient {
    pub fn new(config: Arc<Config>, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("universe-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(config, storage, http_client))
    }

    pub fn with_http_client(
        config: Arc<Config>,
        storage: Arc<dyn KeyValueStore>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            storage,
            http_client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Exchanges the configured client credentials for a token and persists it.
    pub async fn acquire_token(&self) -> Result<TokenRecord> {
        let token_url = self.config.token_url();
        let request = TokenRequest {
            grant_type: CLIENT_CREDENTIALS_GRANT,
            client_id: &self.config.credentials.id,
            client_secret: &self.config.credentials.secret,
        };

        debug!("Requesting access token at: {}", token_url);

        let response = self
            .http_client
            .post(&token_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = error_body(response).await?;
            error!("Token exchange failed ({}): {}", status, body);
            return Err(ClientError::AuthFailure { status, body });
        }

        let response_text = response.text().await?;
        let body: Value = serde_json::from_str(&response_text).map_err(ClientError::Decode)?;
        let record = TokenRecord::from(body);

        self.persist_token(&record)?;
        info!(
            "Access token acquired: {}... (scope: {})",
            token_prefix(record.access_token().unwrap_or_default()),
            record.scope().unwrap_or("none")
        );

        Ok(record)
    }

    /// Overwrites whatever record was stored before. The record is written
    /// as-is, with no check of its shape.
    pub fn persist_token(&self, record: &TokenRecord) -> Result<()> {
        let data = serde_json::to_string(record).map_err(ClientError::Encode)?;
        self.storage.set(TOKEN_STORAGE_KEY, data)?;
        debug!("Persisted token record under {}", TOKEN_STORAGE_KEY);
        Ok(())
    }

    pub fn read_token(&self) -> Result<Option<TokenRecord>> {
        match self.storage.get(TOKEN_STORAGE_KEY)? {
            Some(data) => serde_json::from_str(&data)
                .map(Some)
                .map_err(ClientError::CorruptToken),
            None => Ok(None),
        }
    }

    /// The stored `access_token`, if any. Expiry is not checked.
    pub fn current_token_id(&self) -> Result<Option<String>> {
        Ok(self
            .read_token()?
            .and_then(|record| record.access_token().map(str::to_string)))
    }

    /// GETs `base + endpoint + query` with the stored bearer token and returns
    /// the body as untyped JSON.
    pub async fn send_raw(&self, endpoint: &str, params: &QueryParams) -> Result<Value> {
        self.send_request(endpoint, params).await
    }

    /// Without a stored token the header is sent as `Bearer null`; the server
    /// is left to reject it.
    pub async fn send_request<T>(&self, endpoint: &str, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if endpoint.is_empty() {
            return Err(ClientError::EmptyEndpoint);
        }

        let query = query::serialize(params);
        let target_url = [self.config.base_path.as_str(), endpoint, query.as_str()].concat();

        let token = self.current_token_id()?;
        if token.is_none() {
            warn!("No stored access token, sending 'Bearer null'");
        }
        let authorization = format!("Bearer {}", token.as_deref().unwrap_or("null"));

        debug!("GET {}", target_url);
        if let Some(token) = &token {
            debug!("  authorization: Bearer {}...", token_prefix(token));
        }

        let response = self
            .http_client
            .get(&target_url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = error_body(response).await?;
            error!("Request to {} failed ({}): {}", endpoint, status, body);
            return Err(ClientError::RequestFailure { status, body });
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(ClientError::Decode)
    }

    // The endpoint helpers hand the body back in whatever form the caller
    // asks for: `Value` for the untouched payload, or one of the response
    // views in `types`.

    pub async fn get_guest_lists<T>(&self, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_request(&self.config.endpoints.guestlists, params)
            .await
    }

    pub async fn get_current_user<T>(&self, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_request(&self.config.endpoints.current_user, params)
            .await
    }

    pub async fn get_listings<T>(&self, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_request(&self.config.endpoints.listings, params)
            .await
    }
}

// Non-JSON error bodies surface as their own failure.
async fn error_body(response: Response) -> Result<Value> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| ClientError::ErrorBody { status, source })
}

fn token_prefix(token: &str) -> String {
    token.chars().take(8).collect()
}
