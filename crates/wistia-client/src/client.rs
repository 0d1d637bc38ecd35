//! Main API client implementation

use crate::config::{ClientConfig, Format, API_USERNAME};
use crate::endpoints::{MediasApi, Resource, ResourceKind, ResourceRegistry};
use crate::error::{ApiError, ApiResult};
use crate::query;
use crate::Params;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Low-level Wistia API client
///
/// Owns the credentials, response format and HTTP transport, and exposes the
/// generic verbs every resource accessor is built on. Cloning is cheap and
/// clones share the same connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Create a client for the given API password, using JSON responses
    pub fn new(api_password: impl Into<String>) -> ApiResult<Self> {
        Self::with_config(ClientConfig::new(api_password))
    }

    /// Create a client for the given API password and response format
    pub fn with_format(api_password: impl Into<String>, format: Format) -> ApiResult<Self> {
        Self::with_config(ClientConfig::new(api_password).with_format(format))
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent is not a valid header value"))?;
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, user_agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the configured response format
    #[must_use]
    pub fn format(&self) -> Format {
        self.config.format
    }

    /// Append the format extension to a target path (`medias` -> `medias.json`)
    #[must_use]
    pub fn build_target(&self, target: &str) -> String {
        format!("{target}.{}", self.config.format)
    }

    /// Absolute URL for a target path
    #[must_use]
    pub fn build_url(&self, target: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.build_target(target).trim_start_matches('/')
        )
    }

    /// Perform a GET request, sending `params` as the query string
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn get(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.request(Method::GET, target, params).await
    }

    /// Perform a POST request, sending `params` as a JSON body
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn post(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.request(Method::POST, target, params).await
    }

    /// Perform a PUT request, sending `params` as a JSON body
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn put(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.request(Method::PUT, target, params).await
    }

    /// Perform a DELETE request, sending `params` as the query string
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn delete(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.request(Method::DELETE, target, params).await
    }

    /// Execute a single request and decode the response
    async fn request(&self, method: Method, target: &str, params: &Params) -> ApiResult<Value> {
        let url = self.build_url(target);
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let mut request = self
            .inner
            .request(method.clone(), &url)
            .header(X_REQUEST_ID, &request_id)
            .basic_auth(API_USERNAME, Some(&self.config.api_password));

        request = if sends_json_body(&method) {
            request
                .header(ACCEPT, HeaderValue::from_static("application/json"))
                .json(params)
        } else {
            request.query(&query::flatten(params))
        };

        debug!(method = %method, url = %url, "Sending request");

        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed without a response");
            ApiError::Transport(e)
        })?;

        self.handle_response(response, start).await
    }

    /// Map the HTTP status and decode the body
    async fn handle_response(&self, response: Response, start: Instant) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!(
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis(),
                "Request succeeded"
            );
            return decode_body(self.config.format, &body);
        }

        // The status is already known; an unreadable body must not hide it.
        let body = response.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "API returned an error status"
        );
        Err(ApiError::from_status(status.as_u16(), body))
    }
}

/// POST and PUT carry their parameters as JSON; everything else uses the query string
fn sends_json_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Decode a successful response body
///
/// Empty bodies decode to `null`. XML bodies are returned as a raw string.
fn decode_body(format: Format, body: &str) -> ApiResult<Value> {
    match format {
        Format::Json if body.trim().is_empty() => Ok(Value::Null),
        Format::Json => Ok(serde_json::from_str(body)?),
        Format::Xml => Ok(Value::String(body.to_string())),
    }
}

/// Wistia API client with cached resource accessors
///
/// Wraps an [`ApiClient`] and hands out one accessor per resource kind. An
/// accessor is created on first use and the same instance is returned for
/// the lifetime of this client.
pub struct WistiaClient {
    api: ApiClient,
    resources: ResourceRegistry,
}

impl WistiaClient {
    /// Create a client for the given API password, using JSON responses
    pub fn new(api_password: impl Into<String>) -> ApiResult<Self> {
        Ok(Self::from_api(ApiClient::new(api_password)?))
    }

    /// Create a client for the given API password and response format
    pub fn with_format(api_password: impl Into<String>, format: Format) -> ApiResult<Self> {
        Ok(Self::from_api(ApiClient::with_format(api_password, format)?))
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::from_api(ApiClient::with_config(config)?))
    }

    /// Create a client configured from `WISTIA_*` environment variables
    pub fn from_env() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    fn from_api(api: ApiClient) -> Self {
        Self {
            api,
            resources: ResourceRegistry::default(),
        }
    }

    /// Underlying verb client
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Whether the accessor for `kind` has been created yet
    #[must_use]
    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        self.resources.is_loaded(kind)
    }

    // -------------------------------------------------------------------------
    // Resource accessors
    // -------------------------------------------------------------------------

    /// Get the cached accessor for resource `R`, creating it on first use
    #[must_use]
    pub fn resource<R: Resource>(&self) -> Arc<R> {
        let slot = R::slot(&self.resources);
        Arc::clone(slot.get_or_init(|| {
            debug!(resource = R::KIND.name(), "Creating resource accessor");
            Arc::new(R::new(self.api.clone()))
        }))
    }

    /// Access media endpoints
    #[must_use]
    pub fn medias(&self) -> Arc<MediasApi> {
        self.resource::<MediasApi>()
    }

    // -------------------------------------------------------------------------
    // Generic verbs
    // -------------------------------------------------------------------------

    /// Perform a GET request, sending `params` as the query string
    pub async fn get(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.api.get(target, params).await
    }

    /// Perform a POST request, sending `params` as a JSON body
    pub async fn post(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.api.post(target, params).await
    }

    /// Perform a PUT request, sending `params` as a JSON body
    pub async fn put(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.api.put(target, params).await
    }

    /// Perform a DELETE request, sending `params` as the query string
    pub async fn delete(&self, target: &str, params: &Params) -> ApiResult<Value> {
        self.api.delete(target, params).await
    }
}
