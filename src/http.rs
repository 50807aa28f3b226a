//! Transport primitives shared by the login flows and authenticated API calls.
//!
//! [`ReqwestHttpClient`] owns the API client and mints a fresh cookie-jar client per
//! interactive login. Every response is drained into a [`ResponseSnapshot`] so status checks,
//! final-URL inspection, and JSON decoding work on owned data.

// std
use std::ops::Deref;
// crates.io
use reqwest::{ClientBuilder, RequestBuilder, Response, redirect::Policy};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::HttpSettings,
	error::{ConfigError, ParseError, TransportError},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The API client never follows redirects: token and REST endpoints answer directly, and a
/// redirect there means the deployment is misconfigured. Browser-session clients follow
/// redirects because the issuer hands the token back through a redirect fragment.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	api: ReqwestClient,
	settings: HttpSettings,
}
impl ReqwestHttpClient {
	/// Builds the API client from transport settings.
	pub fn new(settings: &HttpSettings) -> Result<Self, ConfigError> {
		let api = base_builder(settings).redirect(Policy::none()).build()?;

		Ok(Self { api, settings: settings.clone() })
	}

	/// Wraps an existing reqwest [`ReqwestClient`] for API calls.
	///
	/// Configure the client to disable redirect following.
	pub fn with_client(client: ReqwestClient, settings: HttpSettings) -> Self {
		Self { api: client, settings }
	}

	/// Builds a client with an empty cookie jar for one interactive login attempt.
	///
	/// The issuer binds CSRF tokens to its session cookie, so all stages of one attempt must
	/// share the returned client and a new attempt must start with a new one.
	pub fn browser_session(&self) -> Result<ReqwestClient, ConfigError> {
		Ok(base_builder(&self.settings).cookie_store(true).redirect(Policy::limited(10)).build()?)
	}

	/// Transport settings the clients were built with.
	pub fn settings(&self) -> &HttpSettings {
		&self.settings
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.api
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.api
	}
}

/// Status, final URL, and body of a fully-read response.
#[derive(Clone, Debug)]
pub struct ResponseSnapshot {
	/// HTTP status code.
	pub status: StatusCode,
	/// Final URL after redirects, including any fragment carried by the last `Location`.
	pub url: Url,
	/// Decoded response body.
	pub body: String,
}
impl ResponseSnapshot {
	/// Drains a reqwest response.
	pub async fn read(response: Response) -> Result<Self> {
		let status = response.status();
		let url = response.url().clone();
		let body = response.text().await.map_err(TransportError::from)?;

		Ok(Self { status, url, body })
	}

	/// Returns `true` when the status equals `expected`.
	pub fn is(&self, expected: StatusCode) -> bool {
		self.status == expected
	}

	/// Passes the snapshot through when its status is one of `expected`.
	pub fn expect_status(self, operation: &'static str, expected: &[StatusCode]) -> Result<Self> {
		if expected.contains(&self.status) { Ok(self) } else { Err(self.unexpected(operation)) }
	}

	/// Maps a `404` answer to [`Error::NotFound`] for the named resource.
	pub fn not_found_as(self, resource: &'static str, identifier: impl Display) -> Result<Self> {
		if self.is(StatusCode::NOT_FOUND) {
			return Err(Error::NotFound { resource, identifier: identifier.to_string() });
		}

		Ok(self)
	}

	/// Converts the snapshot into [`Error::UnexpectedStatus`].
	pub fn unexpected(self, operation: &'static str) -> Error {
		Error::UnexpectedStatus { operation, status: self.status.as_u16(), body: self.body }
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self, operation: &'static str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ParseError::Json { operation, source }.into())
	}
}

/// Sends a request and drains the response.
pub(crate) async fn send(request: RequestBuilder) -> Result<ResponseSnapshot> {
	let response = request.send().await?;

	ResponseSnapshot::read(response).await
}

fn base_builder(settings: &HttpSettings) -> ClientBuilder {
	let mut builder = ReqwestClient::builder()
		.user_agent(settings.user_agent.clone())
		.danger_accept_invalid_certs(settings.accept_invalid_certs);

	if let Some(timeout) = settings.request_timeout {
		builder = builder.timeout(timeout);
	}

	builder
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn snapshot(status: StatusCode, body: &str) -> ResponseSnapshot {
		ResponseSnapshot {
			status,
			url: Url::parse("https://kypo.example/").expect("Failed to parse snapshot URL."),
			body: body.into(),
		}
	}

	#[derive(Debug, Deserialize)]
	struct Probe {
		#[allow(dead_code)]
		id: i64,
	}

	#[test]
	fn expect_status_reports_operation_and_body() {
		let err = snapshot(StatusCode::CONFLICT, "locked")
			.expect_status("delete_sandbox_pool", &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND])
			.expect_err("Unexpected statuses must fail.");

		assert!(matches!(
			err,
			Error::UnexpectedStatus { operation: "delete_sandbox_pool", status: 409, ref body } if body == "locked"
		));
		assert!(
			snapshot(StatusCode::NOT_FOUND, "")
				.not_found_as("sandbox pool", 12)
				.expect_err("404 must map to NotFound.")
				.is_not_found()
		);
		assert!(
			snapshot(StatusCode::NOT_FOUND, "")
				.expect_status("delete_sandbox_pool", &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND])
				.is_ok()
		);
	}

	#[test]
	fn json_errors_name_the_failing_path() {
		let err = snapshot(StatusCode::OK, r#"{"id":"seven"}"#)
			.json::<Probe>("get_sandbox_pool")
			.expect_err("Type mismatches must fail.");

		match err {
			Error::Parse(ParseError::Json { operation, source }) => {
				assert_eq!(operation, "get_sandbox_pool");
				assert_eq!(source.path().to_string(), "id");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn builds_api_and_browser_clients() {
		let http = ReqwestHttpClient::new(&HttpSettings::default())
			.expect("API client should build with default settings.");

		assert!(http.browser_session().is_ok());
		assert_eq!(http.settings().request_timeout, Some(StdDuration::from_secs(60)));
	}
}
