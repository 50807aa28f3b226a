//! Keycloak resource-owner password grant.

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	client::Client,
	error::{ConfigError, ParseError},
	http,
	obs::{self, FlowKind},
};

/// Resource name reported when the deployment has no token endpoint.
pub const TOKEN_ENDPOINT: &str = "token endpoint";

const OPERATION: &str = "password_grant";

#[derive(Debug, Deserialize)]
struct PasswordGrantResponse {
	access_token: String,
	expires_in: i64,
}

impl Client {
	/// Exchanges the configured username and password for a bearer token.
	///
	/// A `404` or `405` answer means the deployment has no Keycloak token endpoint and yields
	/// [`Error::NotFound`] with resource [`TOKEN_ENDPOINT`], which [`Client::login`] treats as a
	/// cue to use the interactive flow. The returned session expires `expires_in` seconds after
	/// the request was sent.
	pub async fn exchange_password_grant(&self) -> Result<Session> {
		obs::observe(FlowKind::PasswordGrant, "exchange_password_grant", async move {
			let (username, password) = self.config.credentials.password_pair(OPERATION)?;
			let url = self.config.token_url()?;
			let form = [
				("username", username),
				("password", password.expose()),
				("client_id", self.config.client_id.as_str()),
				("grant_type", "password"),
			];
			let issued_at = OffsetDateTime::now_utc();
			let snapshot = http::send(self.http_client.post(url.clone()).form(&form)).await?;

			match snapshot.status {
				StatusCode::OK => {},
				StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED =>
					return Err(Error::NotFound {
						resource: TOKEN_ENDPOINT,
						identifier: url.to_string(),
					}),
				_ => return Err(snapshot.unexpected(OPERATION)),
			}

			let response = snapshot.json::<PasswordGrantResponse>(OPERATION)?;

			if response.access_token.is_empty() {
				return Err(ParseError::EmptyToken { stage: OPERATION }.into());
			}
			if response.expires_in <= 0 {
				return Err(ConfigError::NonPositiveExpiresIn.into());
			}

			Ok(Session::issued(
				TokenSecret::new(response.access_token),
				issued_at,
				Duration::seconds(response.expires_in),
			))
		})
		.await
	}
}
