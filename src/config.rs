//! Client configuration: endpoint, credentials, service path layout, and timing.
//!
//! Configurations are assembled through [`ClientConfigBuilder`] (validated on
//! [`build`](ClientConfigBuilder::build)) or loaded from `KYPO_*` environment variables with
//! [`ClientConfig::from_env`].

/// Builder API for assembling client configurations.
pub mod builder;
/// Environment variable loading.
pub mod env;

pub use builder::*;
pub use env::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Credentials used to obtain bearer tokens.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
	/// Username and password, exchanged through the password grant or the interactive login.
	Password {
		/// Account name.
		username: String,
		/// Account password.
		password: TokenSecret,
	},
	/// Pre-issued bearer token used as-is.
	Token(TokenSecret),
}
impl Credentials {
	/// Convenience constructor for username/password credentials.
	pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self::Password { username: username.into(), password: TokenSecret::new(password) }
	}

	/// Returns the username/password pair, or an error naming the operation that needed it.
	pub fn password_pair(&self, operation: &'static str) -> Result<(&str, &TokenSecret)> {
		match self {
			Self::Password { username, password } => Ok((username, password)),
			Self::Token(_) => Err(ConfigError::PasswordRequired { operation }.into()),
		}
	}

	/// Returns `true` when the client can log in again on its own.
	pub fn can_reauthenticate(&self) -> bool {
		matches!(self, Self::Password { .. })
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Password { username, .. } => f
				.debug_struct("Credentials::Password")
				.field("username", username)
				.field("password", &"<redacted>")
				.finish(),
			Self::Token(_) => f.debug_tuple("Credentials::Token").field(&"<redacted>").finish(),
		}
	}
}

/// Path prefixes of the platform's services, relative to the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePaths {
	/// OIDC issuer serving the browser login pages.
	pub issuer: String,
	/// Keycloak realm serving `protocol/openid-connect/token`.
	pub sso_realm: String,
	/// Sandbox service API root.
	pub sandbox_service: String,
	/// Linear training service API root.
	pub training_service: String,
	/// Adaptive training service API root.
	pub adaptive_training_service: String,
}
impl Default for ServicePaths {
	fn default() -> Self {
		Self {
			issuer: "csirtmu-dummy-issuer-server".into(),
			sso_realm: "keycloak/realms/KYPO".into(),
			sandbox_service: "kypo-sandbox-service/api/v1".into(),
			training_service: "kypo-rest-training/api/v1".into(),
			adaptive_training_service: "kypo-adaptive-training/api/v1".into(),
		}
	}
}

/// Refresh margin and poll cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
	/// Tokens expiring within this margin are renewed before a request is sent.
	pub refresh_margin: Duration,
	/// Poll cadence while awaiting allocation requests.
	pub allocation_poll_interval: StdDuration,
	/// Poll cadence while awaiting cleanup requests.
	pub cleanup_poll_interval: StdDuration,
}
impl Default for Timing {
	fn default() -> Self {
		Self {
			refresh_margin: Duration::seconds(10),
			allocation_poll_interval: StdDuration::from_secs(5),
			cleanup_poll_interval: StdDuration::from_secs(3),
		}
	}
}

/// Transport knobs applied to every reqwest client the library builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpSettings {
	/// Per-request timeout; `None` leaves requests unbounded.
	pub request_timeout: Option<StdDuration>,
	/// Accepts self-signed certificates (lab ranges and tests only).
	pub accept_invalid_certs: bool,
	/// User agent sent on every request.
	pub user_agent: String,
}
impl Default for HttpSettings {
	fn default() -> Self {
		Self {
			request_timeout: Some(StdDuration::from_secs(60)),
			accept_invalid_certs: false,
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}
}

/// Immutable, validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL of the KYPO deployment; also used as the OIDC redirect URI.
	pub endpoint: Url,
	/// OIDC client identifier.
	pub client_id: String,
	/// Credentials used to obtain tokens.
	pub credentials: Credentials,
	/// Service path layout.
	pub paths: ServicePaths,
	/// Transport settings.
	pub http: HttpSettings,
	/// Refresh margin and poll cadence.
	pub timing: Timing,
}
impl ClientConfig {
	/// Creates a new builder for the provided endpoint.
	pub fn builder(endpoint: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(endpoint)
	}

	/// Endpoint without a trailing slash, as sent in `redirect_uri`.
	pub fn endpoint_base(&self) -> &str {
		self.endpoint.as_str().trim_end_matches('/')
	}

	/// Resolves `{endpoint}/{segments...}`.
	pub fn url(&self, segments: &[&str]) -> Result<Url> {
		let mut raw = self.endpoint_base().to_owned();

		for segment in segments {
			raw.push('/');
			raw.push_str(segment.trim_matches('/'));
		}

		Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source }.into())
	}

	/// Issuer page URL, e.g. `{endpoint}/{issuer}/authorize`.
	pub fn issuer_url(&self, page: &str) -> Result<Url> {
		self.url(&[self.paths.issuer.as_str(), page])
	}

	/// Keycloak token endpoint.
	pub fn token_url(&self) -> Result<Url> {
		self.url(&[self.paths.sso_realm.as_str(), "protocol/openid-connect/token"])
	}

	/// Sandbox service URL for the provided resource path.
	pub fn sandbox_url(&self, path: &str) -> Result<Url> {
		self.url(&[self.paths.sandbox_service.as_str(), path])
	}
}
