// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{ClientConfig, ClientConfigBuilder, Credentials},
	error::ConfigError,
};

/// Environment variable holding the deployment URL.
pub const ENV_ENDPOINT: &str = "KYPO_ENDPOINT";
/// Environment variable holding the OIDC client identifier.
pub const ENV_CLIENT_ID: &str = "KYPO_CLIENT_ID";
/// Environment variable holding the account name.
pub const ENV_USERNAME: &str = "KYPO_USERNAME";
/// Environment variable holding the account password.
pub const ENV_PASSWORD: &str = "KYPO_PASSWORD";
/// Environment variable holding a pre-issued bearer token.
pub const ENV_TOKEN: &str = "KYPO_TOKEN";

impl ClientConfig {
	/// Loads a configuration from the `KYPO_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::env_builder(|name| std::env::var(name).ok())?.build()
	}

	/// Loads a configuration through `lookup`, which resolves variable names to values.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		Self::env_builder(lookup)?.build()
	}

	/// Seeds a builder from environment-style variables so callers can override fields.
	///
	/// A username/password pair wins over a token when both are present.
	pub fn env_builder<F>(lookup: F) -> Result<ClientConfigBuilder, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| {
			lookup(name).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
		};
		let raw_endpoint = read(ENV_ENDPOINT).ok_or(ConfigError::MissingEndpoint)?;
		let endpoint = Url::parse(&raw_endpoint)
			.map_err(|source| ConfigError::InvalidUrl { url: raw_endpoint.clone(), source })?;
		let credentials = match (read(ENV_USERNAME), read(ENV_PASSWORD), read(ENV_TOKEN)) {
			(Some(username), Some(password), _) => Credentials::password(username, password),
			(_, _, Some(token)) => Credentials::Token(TokenSecret::new(token)),
			_ => return Err(ConfigError::MissingCredentials),
		};
		let mut builder = ClientConfig::builder(endpoint).credentials(credentials);

		if let Some(client_id) = read(ENV_CLIENT_ID) {
			builder = builder.client_id(client_id);
		}

		Ok(builder)
	}
}
