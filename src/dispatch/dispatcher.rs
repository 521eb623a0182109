//! Dispatcher: symbolic endpoint name + payload -> concrete HTTP call.

use crate::config::{dashboard_registry, EndpointRegistry, HttpMethod};
use crate::dispatch::normalize::{ErrorNormalizer, DEFAULT_EXPECTED_LOGIN_FAILURES, SIGN_IN_ROUTE};
use crate::dispatch::upload::UploadForm;
use crate::endpoints::Endpoint;
use crate::error::ClientError;
use crate::notify::{Navigator, NoopNavigator, Notifier, TracingNotifier};
use crate::session::Session;
use crate::settings::{Settings, DEFAULT_REDIRECT_DELAY};
use crate::url::{join_url, query_pairs};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Output of [`resolve_endpoint`]: path with parameters filled in and what is left of the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRequest {
    pub path: String,
    pub method: HttpMethod,
    pub remaining: Map<String, Value>,
}

/// Look up `name` and substitute path parameters from `payload`.
/// Fails on unknown names and on placeholders the payload cannot fill.
pub fn resolve_endpoint(
    registry: &EndpointRegistry,
    name: &str,
    payload: Map<String, Value>,
) -> Result<ResolvedRequest, ClientError> {
    let endpoint = registry.require(name)?;
    let expansion = endpoint.template.expand(payload);
    if let Some(param) = expansion.unresolved.into_iter().next() {
        return Err(ClientError::MissingPathParam {
            endpoint: name.to_string(),
            param,
        });
    }
    Ok(ResolvedRequest {
        path: expansion.path,
        method: endpoint.method,
        remaining: expansion.remaining,
    })
}

/// Serialize a typed request into the payload map the dispatcher works on.
pub fn to_payload<T: Serialize + ?Sized>(request: &T) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(request).map_err(|e| ClientError::InvalidPayload(e.to_string()))? {
        Value::Object(m) => Ok(m),
        Value::Null => Ok(Map::new()),
        other => Err(ClientError::InvalidPayload(format!(
            "request must serialize to a JSON object, got {}",
            other
        ))),
    }
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    registry: Arc<EndpointRegistry>,
    session: Session,
    normalizer: ErrorNormalizer,
}

/// Cheap to clone; clones share the http client, registry and session.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

enum Body {
    Json,
    Multipart(UploadForm),
}

impl Dispatcher {
    pub fn builder(base_url: impl Into<String>) -> DispatcherBuilder {
        DispatcherBuilder::new(base_url)
    }

    /// Dispatcher wired from settings with the given registry and session.
    pub fn from_settings(
        settings: &Settings,
        registry: EndpointRegistry,
        session: Session,
    ) -> Result<Self, ClientError> {
        Dispatcher::builder(settings.api_base_url.clone())
            .registry(registry)
            .session(session)
            .redirect_delay(settings.redirect_delay)
            .build()
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.inner.registry
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn resolve(&self, name: &str, payload: Map<String, Value>) -> Result<ResolvedRequest, ClientError> {
        resolve_endpoint(&self.inner.registry, name, payload)
    }

    /// GET sends the remaining payload as query parameters; other verbs as a JSON body.
    pub async fn dispatch(&self, name: &str, payload: Map<String, Value>) -> Result<Value, ClientError> {
        let response = self.send(name, payload, Body::Json).await?;
        self.read_json(response).await
    }

    /// Same as [`dispatch`](Self::dispatch) but returns the raw body (file downloads).
    pub async fn dispatch_blob(&self, name: &str, payload: Map<String, Value>) -> Result<Vec<u8>, ClientError> {
        let response = self.send(name, payload, Body::Json).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.inner.normalizer.transport(e))?;
        Ok(bytes.to_vec())
    }

    /// Multipart upload; `form` is the body whatever the verb, the payload only fills
    /// path parameters and the query string.
    pub async fn upload(
        &self,
        name: &str,
        form: UploadForm,
        payload: Map<String, Value>,
    ) -> Result<Value, ClientError> {
        let response = self.send(name, payload, Body::Multipart(form)).await?;
        self.read_json(response).await
    }

    pub async fn call<E: Endpoint>(&self, request: &E::Request) -> Result<E::Response, ClientError> {
        let value = self.dispatch(E::NAME, to_payload(request)?).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(format!("{}: {}", E::NAME, e)))
    }

    pub async fn call_upload<E: Endpoint>(
        &self,
        form: UploadForm,
        request: &E::Request,
    ) -> Result<E::Response, ClientError> {
        let value = self.upload(E::NAME, form, to_payload(request)?).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(format!("{}: {}", E::NAME, e)))
    }

    fn headers(&self, json: bool) -> HeaderMap {
        let ctx = self.inner.session.context();
        let mut headers = HeaderMap::new();
        if json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ctx.locale.as_str()));
        if let Some(auth) = ctx.authorization() {
            match HeaderValue::from_str(&auth) {
                Ok(v) => {
                    headers.insert(AUTHORIZATION, v);
                }
                Err(_) => tracing::warn!("stored token is not a valid header value, sending without it"),
            }
        }
        headers
    }

    async fn send(&self, name: &str, payload: Map<String, Value>, body: Body) -> Result<reqwest::Response, ClientError> {
        let resolved = self.resolve(name, payload)?;
        let url = join_url(&self.inner.base_url, &resolved.path);
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, endpoint = name, method = %resolved.method, url = %url, "dispatch");

        let builder = self
            .inner
            .client
            .request(resolved.method.to_reqwest(), &url);
        let builder = match body {
            Body::Multipart(form) => with_query(builder, &resolved.remaining)
                .headers(self.headers(false))
                .multipart(form.into_multipart()?),
            Body::Json if resolved.method == HttpMethod::Get => {
                with_query(builder.headers(self.headers(true)), &resolved.remaining)
            }
            Body::Json => builder
                .headers(self.headers(true))
                .json(&Value::Object(resolved.remaining)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.inner.normalizer.transport(e))?;
        let status = response.status();
        tracing::debug!(%request_id, %status, "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            Err(e) => {
                tracing::warn!(%request_id, %status, error = %e, "could not read error response body");
                Value::Null
            }
        };
        Err(self.inner.normalizer.server(status, body))
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.inner.normalizer.transport(e))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn with_query(builder: reqwest::RequestBuilder, payload: &Map<String, Value>) -> reqwest::RequestBuilder {
    if payload.is_empty() {
        builder
    } else {
        builder.query(&query_pairs(payload))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.inner.base_url)
            .field("endpoints", &self.inner.registry.len())
            .field("session", &self.inner.session)
            .finish()
    }
}

pub struct DispatcherBuilder {
    base_url: String,
    registry: Option<EndpointRegistry>,
    session: Session,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    expected_login_failures: Vec<String>,
    redirect_delay: Duration,
    sign_in_route: String,
    timeout: Option<Duration>,
}

impl DispatcherBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        DispatcherBuilder {
            base_url: base_url.into(),
            registry: None,
            session: Session::new(),
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(NoopNavigator),
            expected_login_failures: DEFAULT_EXPECTED_LOGIN_FAILURES.iter().map(|s| s.to_string()).collect(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            sign_in_route: SIGN_IN_ROUTE.into(),
            timeout: None,
        }
    }

    /// Defaults to the built-in dashboard registry.
    pub fn registry(mut self, registry: EndpointRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn expected_login_failures<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_login_failures = messages.into_iter().map(Into::into).collect();
        self
    }

    pub fn redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn sign_in_route(mut self, route: impl Into<String>) -> Self {
        self.sign_in_route = route.into();
        self
    }

    /// No timeout unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Dispatcher, ClientError> {
        let registry = match self.registry {
            Some(r) => r,
            None => dashboard_registry()?,
        };
        let mut client = reqwest::Client::builder();
        if let Some(t) = self.timeout {
            client = client.timeout(t);
        }
        let client = client.build().map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Dispatcher {
            inner: Arc::new(Inner {
                client,
                base_url: self.base_url,
                registry: Arc::new(registry),
                session: self.session.clone(),
                normalizer: ErrorNormalizer {
                    session: self.session,
                    notifier: self.notifier,
                    navigator: self.navigator,
                    expected_login_failures: self.expected_login_failures,
                    redirect_delay: self.redirect_delay,
                    sign_in_route: self.sign_in_route,
                },
            }),
        })
    }
}
