//! Authenticated KYPO client and its request pipeline.
//!
//! Every API call goes through [`Client::execute`]: the refresh prologue
//! ([`Client::ensure_fresh_token`]) runs first, the request is sent with the bearer token and a
//! JSON content type, and a `401` answer triggers one re-login plus one retry when the client
//! holds a username and password.

// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	config::{ClientConfig, Credentials},
	error::ParseError,
	flows::RefreshMetrics,
	http::{self, ReqwestHttpClient, ResponseSnapshot},
	obs::{self, FlowKind},
};

const APPLICATION_JSON: &str = "application/json";

/// Client for the KYPO REST services.
///
/// Cloning is cheap; clones share the session, the single-flight guard, and the metrics, so a
/// clone handed to a background worker observes token renewals made by its origin.
#[derive(Clone)]
pub struct Client {
	/// HTTP clients used for API calls and login attempts.
	pub http_client: ReqwestHttpClient,
	/// Validated configuration.
	pub config: Arc<ClientConfig>,
	/// Shared counters for re-authentication outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	pub(crate) session: Arc<RwLock<Session>>,
	pub(crate) refresh_guard: Arc<AsyncMutex<()>>,
}
impl Client {
	/// Builds the HTTP clients and establishes a session.
	///
	/// A static token is adopted as-is. Username/password credentials go through
	/// [`Client::login`], so construction fails when the platform rejects them.
	pub async fn connect(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(&config.http)?;

		Self::connect_with_http_client(config, http_client).await
	}

	/// Same as [`Client::connect`] but reuses a caller-provided transport.
	pub async fn connect_with_http_client(
		config: ClientConfig,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let client = Self::unauthenticated(config, http_client);

		match &client.config.credentials {
			Credentials::Token(token) => client.set_session(Session::new(token.clone())),
			Credentials::Password { .. } => client.authenticate().await?,
		}

		Ok(client)
	}

	/// Builds a client without contacting the platform; the session starts empty.
	pub fn unauthenticated(config: ClientConfig, http_client: ReqwestHttpClient) -> Self {
		Self {
			http_client,
			config: Arc::new(config),
			refresh_metrics: Default::default(),
			session: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Returns a copy of the current session.
	pub fn session(&self) -> Session {
		self.session.read().clone()
	}

	/// Replaces the current session, e.g. to restore a token obtained elsewhere.
	pub fn set_session(&self, session: Session) {
		*self.session.write() = session;
	}

	/// Returns the bearer token currently held, without checking its expiry.
	pub fn current_token(&self) -> TokenSecret {
		self.session.read().token.clone()
	}

	/// Sends an authenticated request and drains the response.
	pub async fn execute(
		&self,
		operation: &'static str,
		request: &ApiRequest,
	) -> Result<ResponseSnapshot> {
		let token = self.ensure_fresh_token().await?;
		let snapshot = self.dispatch(request, &token).await?;

		if !snapshot.is(StatusCode::UNAUTHORIZED) || !self.config.credentials.can_reauthenticate()
		{
			return Ok(snapshot);
		}

		obs::stage_event(FlowKind::Refresh, "rejected", &operation);

		let token = self.reauthenticate_after_rejection(&token).await?;

		self.dispatch(request, &token).await
	}

	async fn dispatch(&self, request: &ApiRequest, token: &TokenSecret) -> Result<ResponseSnapshot> {
		let mut builder = self
			.http_client
			.as_ref()
			.request(request.method.clone(), request.url.clone())
			.bearer_auth(token.expose())
			.header(CONTENT_TYPE, APPLICATION_JSON);

		if let Some(accept) = request.accept {
			builder = builder.header(ACCEPT, accept);
		}
		if let Some(body) = &request.body {
			builder = builder.body(body.clone());
		}

		http::send(builder).await
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoint", &self.config.endpoint.as_str())
			.field("client_id", &self.config.client_id)
			.field("session", &*self.session.read())
			.finish()
	}
}

/// Replayable description of an authenticated API request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Optional raw body.
	pub body: Option<String>,
	/// Optional `Accept` header value.
	pub accept: Option<&'static str>,
}
impl ApiRequest {
	/// Creates a request without a body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, body: None, accept: None }
	}

	/// `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// `DELETE` request.
	pub fn delete(url: Url) -> Self {
		Self::new(Method::DELETE, url)
	}

	/// Attaches a raw body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Attaches a JSON-encoded body.
	pub fn with_json<T>(self, operation: &'static str, payload: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_string(payload)
			.map_err(|source| ParseError::Encode { operation, source })?;

		Ok(self.with_body(body))
	}

	/// Overrides the `Accept` header.
	pub fn with_accept(mut self, accept: &'static str) -> Self {
		self.accept = Some(accept);

		self
	}
}
