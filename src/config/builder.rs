// self
use crate::{
	_prelude::*,
	config::{ClientConfig, Credentials, HttpSettings, ServicePaths, Timing},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Base URL of the deployment.
	pub endpoint: Url,
	/// OIDC client identifier.
	pub client_id: Option<String>,
	/// Credentials used to obtain tokens.
	pub credentials: Option<Credentials>,
	/// Service path layout.
	pub paths: ServicePaths,
	/// Transport settings.
	pub http: HttpSettings,
	/// Refresh margin and poll cadence.
	pub timing: Timing,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided endpoint.
	pub fn new(endpoint: Url) -> Self {
		Self {
			endpoint,
			client_id: None,
			credentials: None,
			paths: ServicePaths::default(),
			http: HttpSettings::default(),
			timing: Timing::default(),
		}
	}

	/// Sets the OIDC client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the credentials.
	pub fn credentials(mut self, credentials: Credentials) -> Self {
		self.credentials = Some(credentials);

		self
	}

	/// Overrides the service path layout.
	pub fn paths(mut self, paths: ServicePaths) -> Self {
		self.paths = paths;

		self
	}

	/// Overrides the transport settings.
	pub fn http(mut self, http: HttpSettings) -> Self {
		self.http = http;

		self
	}

	/// Overrides the refresh margin and poll cadence.
	pub fn timing(mut self, timing: Timing) -> Self {
		self.timing = timing;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let client_id = self.client_id.unwrap_or_default();
		let credentials = self.credentials.ok_or(ConfigError::MissingCredentials)?;
		let config = ClientConfig {
			endpoint: self.endpoint,
			client_id,
			credentials,
			paths: self.paths,
			http: self.http,
			timing: self.timing,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.endpoint.cannot_be_a_base() || self.endpoint.host_str().is_none() {
			return Err(ConfigError::MissingEndpoint);
		}
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		validate_credentials(&self.credentials)?;
		validate_interval("allocation", self.timing.allocation_poll_interval)?;
		validate_interval("cleanup", self.timing.cleanup_poll_interval)?;

		Ok(())
	}
}

fn validate_credentials(credentials: &Credentials) -> Result<(), ConfigError> {
	let empty = match credentials {
		Credentials::Password { username, password } =>
			username.is_empty() || password.is_empty(),
		Credentials::Token(token) => token.is_empty(),
	};

	if empty { Err(ConfigError::MissingCredentials) } else { Ok(()) }
}

fn validate_interval(name: &'static str, interval: StdDuration) -> Result<(), ConfigError> {
	if interval.is_zero() { Err(ConfigError::ZeroPollInterval { name }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenSecret;

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder(Url::parse("https://kypo.example").expect("Failed to parse URL."))
	}

	#[test]
	fn rejects_missing_client_id_and_credentials() {
		let err = builder()
			.credentials(Credentials::password("user", "pass"))
			.build()
			.expect_err("Builder should reject a missing client identifier.");

		assert!(matches!(err, ConfigError::MissingClientId));

		let err = builder()
			.client_id("client")
			.build()
			.expect_err("Builder should reject missing credentials.");

		assert!(matches!(err, ConfigError::MissingCredentials));

		let err = builder()
			.client_id("client")
			.credentials(Credentials::Token(TokenSecret::new("")))
			.build()
			.expect_err("Builder should reject an empty token.");

		assert!(matches!(err, ConfigError::MissingCredentials));
	}

	#[test]
	fn rejects_zero_poll_interval() {
		let timing = Timing { cleanup_poll_interval: StdDuration::ZERO, ..Timing::default() };
		let err = builder()
			.client_id("client")
			.credentials(Credentials::password("user", "pass"))
			.timing(timing)
			.build()
			.expect_err("Builder should reject a zero poll interval.");

		assert!(matches!(err, ConfigError::ZeroPollInterval { name: "cleanup" }));
	}

	#[test]
	fn defaults_match_platform_layout() {
		let config = builder()
			.client_id("client")
			.credentials(Credentials::password("user", "pass"))
			.build()
			.expect("Builder should succeed with defaults.");

		assert_eq!(config.paths.issuer, "csirtmu-dummy-issuer-server");
		assert_eq!(config.paths.sso_realm, "keycloak/realms/KYPO");
		assert_eq!(config.timing.refresh_margin, Duration::seconds(10));
		assert_eq!(config.timing.allocation_poll_interval, StdDuration::from_secs(5));
		assert_eq!(config.timing.cleanup_poll_interval, StdDuration::from_secs(3));
		assert!(!config.http.accept_invalid_certs);
	}
}
