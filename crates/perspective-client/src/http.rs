//! Blocking HTTP implementation of [`PerspectiveApi`].
//!
//! Endpoints live under `perspective_schemas` relative to the configured
//! base URL; the API key travels as the `api_key` query parameter.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use url::Url;

use perspective_schema::{Perspective, PerspectiveStatus};

use crate::api::PerspectiveApi;
use crate::error::{Error, Result};

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://chapi.cloudhealthtech.com/v1/";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

static CREATED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Perspective (\d+) created").expect("valid regex"));

/// Connection settings for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Perspective API client (blocking)
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpClient {
    /// Build a client from settings.
    ///
    /// A missing trailing slash on the endpoint is added so relative paths
    /// resolve beneath it rather than replacing its last segment.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let mut endpoint = settings.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        let http = Client::builder()
            .user_agent(format!("perspective/{}", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: Url::parse(&endpoint)?,
            api_key: settings.api_key,
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn schema_url(&self, id: &str, query: &[(&str, &str)]) -> Result<Url> {
        self.url(&format!("perspective_schemas/{}", id), query)
    }

    fn delete_call(&self, id: &str, hard_delete: bool) -> Result<()> {
        let hard_delete = if hard_delete { "true" } else { "false" };
        let url = self.schema_url(id, &[("hard_delete", hard_delete)])?;
        let response = self.http.delete(url).send()?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::NotFound { id: id.to_string() }),
            status => Err(unexpected(status, response)),
        }
    }
}

impl PerspectiveApi for HttpClient {
    fn create(&self, perspective: &Perspective) -> Result<String> {
        tracing::info!(name = %perspective.schema.name, "Creating perspective");
        let url = self.url("perspective_schemas", &[])?;
        let response = self.http.post(url).json(perspective).send()?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body = response.text()?;
                let id = CREATED_ID
                    .captures(&body)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .ok_or_else(|| Error::UnparseableCreateResponse { body: body.clone() })?;
                tracing::debug!(%id, "Perspective created");
                Ok(id)
            }
            StatusCode::UNAUTHORIZED => Err(Error::Authentication),
            // The collection itself is missing; there is no id yet.
            StatusCode::NOT_FOUND => Err(Error::NotFound {
                id: perspective.schema.name.clone(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY => Err(Error::AlreadyExists {
                name: perspective.schema.name.clone(),
            }),
            status => Err(unexpected(status, response)),
        }
    }

    fn get(&self, id: &str) -> Result<Perspective> {
        tracing::debug!(%id, "Fetching perspective");
        let url = self.schema_url(id, &[])?;
        let response = self.http.get(url).send()?;

        match response.status() {
            StatusCode::OK => {
                let perspective: Perspective = serde_json::from_str(&response.text()?)?;
                if perspective.schema.is_empty_sentinel() {
                    tracing::debug!(%id, "Remote returned the empty placeholder schema");
                    return Err(Error::NotFound { id: id.to_string() });
                }
                Ok(perspective)
            }
            StatusCode::UNAUTHORIZED => Err(Error::Authentication),
            StatusCode::NOT_FOUND => Err(Error::NotFound { id: id.to_string() }),
            status => Err(unexpected(status, response)),
        }
    }

    fn update(&self, id: &str, perspective: &Perspective) -> Result<Perspective> {
        tracing::info!(%id, name = %perspective.schema.name, "Updating perspective");
        let url = self.schema_url(id, &[])?;
        let response = self.http.put(url).json(perspective).send()?;

        match response.status() {
            StatusCode::OK => Ok(serde_json::from_str(&response.text()?)?),
            StatusCode::UNAUTHORIZED => Err(Error::Authentication),
            StatusCode::NOT_FOUND => Err(Error::NotFound { id: id.to_string() }),
            StatusCode::UNPROCESSABLE_ENTITY => Err(Error::AlreadyExists {
                name: perspective.schema.name.clone(),
            }),
            status => Err(unexpected(status, response)),
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        tracing::info!(%id, "Deleting perspective");
        self.delete_call(id, true)
    }

    fn archive(&self, id: &str) -> Result<()> {
        tracing::info!(%id, "Archiving perspective");
        self.delete_call(id, false)
    }

    fn list(&self) -> Result<BTreeMap<String, PerspectiveStatus>> {
        let url = self.url("perspective_schemas", &[])?;
        let response = self.http.get(url).send()?;

        match response.status() {
            StatusCode::OK => Ok(serde_json::from_str(&response.text()?)?),
            StatusCode::UNAUTHORIZED => Err(Error::Authentication),
            status => Err(unexpected(status, response)),
        }
    }
}

fn unexpected(status: StatusCode, response: Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Authentication;
    }
    Error::UnexpectedStatus {
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    }
}
