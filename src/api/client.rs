use std::{fmt, sync::Arc, time::Duration};

use metrics::counter;
use reqwest::{Client, Method, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;

use super::error::ApiError;
use super::session::{
    LoggingExpiryHandler, Notice, Notifier, Session, SessionExpiryHandler, TracingNotifier,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which service a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Console API: auth, communities, members, shops. Carries the session cookie.
    Console,
    /// QR record search backend (`/QRIDs`).
    Search,
}

/// One outgoing call, assembled by the endpoint modules.
#[derive(Debug)]
pub(crate) struct Request {
    backend: Backend,
    method: Method,
    path: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    anonymous: bool,
}

impl Request {
    pub(crate) fn new(backend: Backend, method: Method, path: &[&str]) -> Self {
        Self {
            backend,
            method,
            path: path.iter().map(|segment| (*segment).to_string()).collect(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub(crate) fn get(backend: Backend, path: &[&str]) -> Self {
        Self::new(backend, Method::GET, path)
    }

    pub(crate) fn post(backend: Backend, path: &[&str]) -> Self {
        Self::new(backend, Method::POST, path)
    }

    pub(crate) fn put(backend: Backend, path: &[&str]) -> Self {
        Self::new(backend, Method::PUT, path)
    }

    pub(crate) fn delete(backend: Backend, path: &[&str]) -> Self {
        Self::new(backend, Method::DELETE, path)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::validation(format!("failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without the session cookie; a 401 is then a plain rejection, not an expiry.
    pub(crate) fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// HTTP client shared by every service; cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    console_base: Url,
    search_base: Url,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    expiry: Arc<dyn SessionExpiryHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("console_base", &self.console_base.as_str())
            .field("search_base", &self.search_base.as_str())
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

pub struct ApiClientBuilder {
    console_base: Url,
    search_base: Url,
    timeout: Duration,
    session: Option<Arc<Session>>,
    notifier: Option<Arc<dyn Notifier>>,
    expiry: Option<Arc<dyn SessionExpiryHandler>>,
}

impl ApiClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn expiry_handler(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.expiry = Some(handler);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = Client::builder()
            .user_agent(ApiClient::user_agent())
            .timeout(self.timeout)
            .build()?;

        Ok(ApiClient {
            http,
            console_base: with_trailing_slash(self.console_base),
            search_base: with_trailing_slash(self.search_base),
            session: self.session.unwrap_or_default(),
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(TracingNotifier)),
            expiry: self
                .expiry
                .unwrap_or_else(|| Arc::new(LoggingExpiryHandler)),
        })
    }
}

impl ApiClient {
    pub fn builder(console_base: Url, search_base: Url) -> ApiClientBuilder {
        ApiClientBuilder {
            console_base,
            search_base,
            timeout: DEFAULT_TIMEOUT,
            session: None,
            notifier: None,
            expiry: None,
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> ApiClientBuilder {
        Self::builder(settings.base_url.clone(), settings.search_base_url.clone())
            .timeout(settings.timeout)
    }

    pub fn user_agent() -> &'static str {
        concat!("imanage/", env!("CARGO_PKG_VERSION"))
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    fn url(&self, request: &Request) -> Result<Url, ApiError> {
        let mut url = match request.backend {
            Backend::Console => self.console_base.clone(),
            Backend::Search => self.search_base.clone(),
        };
        if url.cannot_be_a_base() {
            return Err(ApiError::Url {
                message: format!("`{url}` cannot be a base"),
            });
        }
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&request.path);
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send and decode a JSON body.
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let bytes = self.send(request).await?;
        decode(&bytes)
    }

    /// Like [`ApiClient::call`] but maps 404 to `None`.
    pub(crate) async fn call_optional<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<Option<T>, ApiError> {
        match self.call(request).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn send(&self, request: Request) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&request)?;
        let mut builder = self.http.request(request.method.clone(), url.clone());

        if request.backend == Backend::Console
            && !request.anonymous
            && let Some(token) = self.session.token()
        {
            builder = builder.header(header::COOKIE, format!("token={token}"));
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();
        debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            "api request completed"
        );

        if status.is_success() {
            return Ok(bytes);
        }
        Err(self.classify(status, &bytes, request.anonymous))
    }

    fn classify(&self, status: StatusCode, body: &[u8], anonymous: bool) -> ApiError {
        let err = ApiError::from_status(status, body);
        match &err {
            ApiError::Unauthorized if anonymous => ApiError::Status {
                status: status.as_u16(),
                message: "invalid credentials".to_string(),
            },
            ApiError::Unauthorized => {
                self.expire_session();
                err
            }
            ApiError::Forbidden { message } => {
                self.notify(Notice::error("Permission Denied", message.clone()));
                err
            }
            ApiError::Server { message, .. } => {
                self.notify(Notice::error("Server Error", message.clone()));
                err
            }
            _ => err,
        }
    }

    /// Run the session-expired flow once per login, however many calls observe the 401.
    fn expire_session(&self) {
        if !self.session.begin_expiry() {
            debug!("session expiry already in progress");
            return;
        }
        counter!("imanage_session_expired_total").increment(1);
        warn!("server rejected the session token");
        self.session.clear();
        self.notify(Notice::error(
            "Session Expired",
            "Your session has expired. Please log in again.",
        ));
        self.expiry.session_expired();
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|err| ApiError::decode(err.to_string()))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
