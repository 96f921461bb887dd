//! Cohort Homes REST API client.
//!
//! # Architecture
//!
//! - JSON over HTTPS with `reqwest`; one shared connection pool per client
//! - The bearer token comes from the [`AuthSession`] at call time, so a
//!   login or logout elsewhere applies to the very next request
//! - Property details, blog posts and FAQs are cached in memory via `moka`
//!   (TTL from config); favorite and group mutations invalidate the
//!   affected property
//! - No automatic retries; a 401 is reported as [`ApiError::Unauthorized`]
//!   and the caller decides whether to log out
//!
//! # Example
//!
//! ```rust,ignore
//! use cohort_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api, auth.clone())?;
//! let page = api.list_properties(PageRequest::default()).await?;
//! let is_favorite = api.toggle_favorite(&page.items[0].id).await?;
//! ```

mod cache;

use std::sync::Arc;

use cohort_core::{
    BlogPost, BlogSummary, Faq, Inquiry, Page, PageRequest, Preferences, PropertyDetail,
    PropertyId, PropertySummary, SavedSearch, SiteVisit, ViewedProperty,
};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::auth::AuthSession;
use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing or rejected credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the failure is on the server or transport side rather than
    /// a client-state condition like a missing login.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) | Self::Url(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Unauthorized | Self::NotFound(_) | Self::RateLimited(_) => false,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteResponse {
    is_favorite: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipResponse {
    is_member: bool,
}

/// Client for the Cohort Homes REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth: Arc<AuthSession>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the API key is
    /// not a valid header value.
    pub fn new(config: &ApiConfig, auth: Arc<AuthSession>) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &config.api_key {
            let value = reqwest::header::HeaderValue::from_str(key.expose_secret())
                .map_err(|e| ApiError::Parse(format!("Invalid API key format: {e}")))?;
            headers.insert("X-Api-Key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                auth,
                cache,
            }),
        })
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Fetch a property detail page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, or any transport or
    /// parse error.
    #[instrument(skip(self, id), fields(property_id = %id))]
    pub async fn get_property(&self, id: &PropertyId) -> Result<PropertyDetail, ApiError> {
        let key = self.property_key(id);
        if let Some(CacheValue::Property(property)) = self.inner.cache.get(&key).await {
            debug!("Cache hit");
            return Ok(*property);
        }

        let url = self.endpoint(&format!("properties/{}", encode(id.as_str())))?;
        let property: PropertyDetail = self.send(self.request(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Property(Box::new(property.clone())))
            .await;
        Ok(property)
    }

    /// Fetch one page of the property listing.
    ///
    /// # Errors
    ///
    /// Returns any transport, status or parse error.
    #[instrument(skip(self, page), fields(page = page.page(), limit = page.limit()))]
    pub async fn list_properties(
        &self,
        page: PageRequest,
    ) -> Result<Page<PropertySummary>, ApiError> {
        let url = self.paged_endpoint("properties", page)?;
        self.send(self.request(Method::GET, url)).await
    }

    /// Flip the favorite flag on a property and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self, id), fields(property_id = %id))]
    pub async fn toggle_favorite(&self, id: &PropertyId) -> Result<bool, ApiError> {
        let url = self.endpoint(&format!("properties/{}/favorite", encode(id.as_str())))?;
        let response: FavoriteResponse = self.send(self.authed(Method::POST, url)?).await?;
        self.invalidate_property(id).await;
        Ok(response.is_favorite)
    }

    /// Join the buying group for a property and return the membership flag.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self, id), fields(property_id = %id))]
    pub async fn join_group(&self, id: &PropertyId) -> Result<bool, ApiError> {
        let url = self.endpoint(&format!("properties/{}/join-group", encode(id.as_str())))?;
        let response: MembershipResponse = self.send(self.authed(Method::POST, url)?).await?;
        self.invalidate_property(id).await;
        Ok(response.is_member)
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// # Errors
    ///
    /// Returns any transport, status or parse error.
    #[instrument(skip(self, page), fields(page = page.page(), limit = page.limit()))]
    pub async fn list_blogs(&self, page: PageRequest) -> Result<Page<BlogSummary>, ApiError> {
        let url = self.paged_endpoint("blogs", page)?;
        self.send(self.request(Method::GET, url)).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown slugs, or any transport or
    /// parse error.
    #[instrument(skip(self))]
    pub async fn get_blog(&self, slug: &str) -> Result<BlogPost, ApiError> {
        let key = CacheKey::Blog(slug.to_owned());
        if let Some(CacheValue::Blog(post)) = self.inner.cache.get(&key).await {
            return Ok(*post);
        }

        let url = self.endpoint(&format!("blogs/{}", encode(slug)))?;
        let post: BlogPost = self.send(self.request(Method::GET, url)).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Blog(Box::new(post.clone())))
            .await;
        Ok(post)
    }

    /// # Errors
    ///
    /// Returns any transport, status or parse error.
    #[instrument(skip(self))]
    pub async fn faqs(&self) -> Result<Vec<Faq>, ApiError> {
        if let Some(CacheValue::Faqs(faqs)) = self.inner.cache.get(&CacheKey::Faqs).await {
            return Ok(faqs);
        }

        let url = self.endpoint("faqs")?;
        let faqs: Vec<Faq> = self.send(self.request(Method::GET, url)).await?;
        self.inner
            .cache
            .insert(CacheKey::Faqs, CacheValue::Faqs(faqs.clone()))
            .await;
        Ok(faqs)
    }

    /// Submit a contact or NRI desk enquiry. Works signed in or out.
    ///
    /// # Errors
    ///
    /// Returns any transport or status error.
    #[instrument(skip_all)]
    pub async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), ApiError> {
        let url = self.endpoint("inquiries")?;
        let request = self.request(Method::POST, url).json(inquiry);
        self.send_unit(request).await
    }

    // =========================================================================
    // Dashboard (signed in only)
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self))]
    pub async fn favorites(&self) -> Result<Vec<PropertySummary>, ApiError> {
        self.get_authed("user/favorites").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self))]
    pub async fn viewed(&self) -> Result<Vec<ViewedProperty>, ApiError> {
        self.get_authed("user/viewed").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self))]
    pub async fn site_visits(&self) -> Result<Vec<SiteVisit>, ApiError> {
        self.get_authed("user/site-visits").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self))]
    pub async fn search_history(&self) -> Result<Vec<SavedSearch>, ApiError> {
        self.get_authed("user/search-history").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip(self))]
    pub async fn preferences(&self) -> Result<Preferences, ApiError> {
        self.get_authed("user/preferences").await
    }

    /// Save preferences and return what the server stored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when signed out.
    #[instrument(skip_all)]
    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<Preferences, ApiError> {
        let url = self.endpoint("user/preferences")?;
        self.send(self.authed(Method::PUT, url)?.json(preferences)).await
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn paged_endpoint(&self, path: &str, page: PageRequest) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("page", &page.page().to_string())
            .append_pair("limit", &page.limit().to_string());
        Ok(url)
    }

    /// Request with the bearer token attached if signed in.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match self.inner.auth.token() {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    /// Request that requires a signed-in user; fails before sending otherwise.
    fn authed(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        let token = self.inner.auth.token().ok_or(ApiError::Unauthorized)?;
        Ok(self
            .inner
            .client
            .request(method, url)
            .bearer_auth(token.expose()))
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.authed(Method::GET, url)?).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(drop)
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let resource = response.url().path().to_owned();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;
        debug!(status = status.as_u16(), %resource, "API response");
        check_status(status, retry_after.as_deref(), body, &resource)
    }

    fn property_key(&self, id: &PropertyId) -> CacheKey {
        CacheKey::Property {
            id: id.clone(),
            viewer: self.inner.auth.user().map(|u| u.id.into_inner()),
        }
    }

    async fn invalidate_property(&self, id: &PropertyId) {
        self.inner
            .cache
            .invalidate(&CacheKey::Property {
                id: id.clone(),
                viewer: None,
            })
            .await;
        self.inner.cache.invalidate(&self.property_key(id)).await;
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Map a response status to the API error taxonomy.
fn check_status(
    status: StatusCode,
    retry_after: Option<&str>,
    body: String,
    resource: &str,
) -> Result<String, ApiError> {
    match status {
        s if s.is_success() => Ok(body),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(resource.to_owned())),
        StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited(
            retry_after.and_then(|s| s.trim().parse().ok()).unwrap_or(1),
        )),
        s => Err(ApiError::Api {
            status: s.as_u16(),
            message: error_message(body),
        }),
    }
}

/// Prefer the API's `{"message": ...}` field over the raw body.
fn error_message(body: String) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.message)
}
