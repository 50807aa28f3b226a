//! Browser-style login against the platform's OIDC issuer.
//!
//! The flow walks three pages with one cookie jar: the authorize page hands out a CSRF token,
//! the login form accepts the credentials, and the consent page (skipped when consent was
//! remembered) releases the token through the redirect fragment. A CSRF token is single-use and
//! bound to the session cookie, so a failed attempt restarts from the authorize page.

// self
use crate::{
	_prelude::*,
	auth::{self, TokenSecret},
	client::Client,
	error::ParseError,
	http::{self, ResponseSnapshot},
	obs::{self, FlowKind},
};

/// Pages visited by [`Client::interactive_login`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginStage {
	/// `GET {issuer}/authorize`, yielding the first CSRF token.
	Authorize,
	/// `POST {issuer}/login` with the credentials.
	Login,
	/// `POST {issuer}/authorize` granting first-time consent.
	Consent,
}
impl LoginStage {
	/// Label reported in errors and trace events.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginStage::Authorize => "authorize",
			LoginStage::Login => "login",
			LoginStage::Consent => "authorize_consent",
		}
	}

	fn expect_ok(self, snapshot: ResponseSnapshot) -> Result<ResponseSnapshot> {
		snapshot.expect_status(self.as_str(), &[StatusCode::OK])
	}
}
impl Display for LoginStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

enum LoginOutcome {
	Token(TokenSecret),
	ConsentRequired { csrf: String },
}

impl Client {
	/// Runs the authorize/login/consent sequence and returns the issued bearer token.
	///
	/// The token carries no expiry information. Any non-`200` page fails with
	/// [`Error::UnexpectedStatus`] naming the [`LoginStage`].
	pub async fn interactive_login(&self) -> Result<TokenSecret> {
		obs::observe(FlowKind::InteractiveLogin, "interactive_login", async move {
			let (username, password) =
				self.config.credentials.password_pair(FlowKind::InteractiveLogin.as_str())?;
			let browser = self.http_client.browser_session()?;
			let csrf = self.open_authorize_page(&browser).await?;

			match self.submit_credentials(&browser, username, password, &csrf).await? {
				LoginOutcome::Token(token) => Ok(token),
				LoginOutcome::ConsentRequired { csrf } => self.grant_consent(&browser, &csrf).await,
			}
		})
		.await
	}

	async fn open_authorize_page(&self, browser: &ReqwestClient) -> Result<String> {
		const STAGE: LoginStage = LoginStage::Authorize;

		let url = self.config.issuer_url("authorize")?;
		let query = [
			("response_type", "id_token token"),
			("client_id", self.config.client_id.as_str()),
			("scope", "openid email profile"),
			("redirect_uri", self.config.endpoint_base()),
		];
		let snapshot = STAGE.expect_ok(http::send(browser.get(url).query(&query)).await?)?;

		obs::stage_event(FlowKind::InteractiveLogin, STAGE.as_str(), &snapshot.status);

		Ok(auth::extract_csrf(&snapshot.body)?)
	}

	async fn submit_credentials(
		&self,
		browser: &ReqwestClient,
		username: &str,
		password: &TokenSecret,
		csrf: &str,
	) -> Result<LoginOutcome> {
		const STAGE: LoginStage = LoginStage::Login;

		let url = self.config.issuer_url("login")?;
		let form = [
			("username", username),
			("password", password.expose()),
			("_csrf", csrf),
			("submit", "Login"),
		];
		let snapshot = STAGE.expect_ok(http::send(browser.post(url).form(&form)).await?)?;

		obs::stage_event(FlowKind::InteractiveLogin, STAGE.as_str(), &snapshot.status);

		// Remembered consent redirects straight to the fragment.
		if let Some(token) = auth::access_token_from_fragment(&snapshot.url) {
			return Ok(LoginOutcome::Token(token));
		}

		Ok(LoginOutcome::ConsentRequired { csrf: auth::extract_csrf(&snapshot.body)? })
	}

	async fn grant_consent(&self, browser: &ReqwestClient, csrf: &str) -> Result<TokenSecret> {
		const STAGE: LoginStage = LoginStage::Consent;

		let url = self.config.issuer_url("authorize")?;
		let form = [
			("scope_openid", "openid"),
			("scope_profile", "profile"),
			("scope_email", "email"),
			("remember", "until-revoked"),
			("user_oauth_approval", "true"),
			("authorize", "Authorize"),
			("_csrf", csrf),
		];
		let snapshot = STAGE.expect_ok(http::send(browser.post(url).form(&form)).await?)?;

		obs::stage_event(FlowKind::InteractiveLogin, STAGE.as_str(), &snapshot.status);

		auth::access_token_from_fragment(&snapshot.url)
			.ok_or_else(|| ParseError::EmptyToken { stage: STAGE.as_str() }.into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stage_labels_are_stable() {
		assert_eq!(LoginStage::Authorize.to_string(), "authorize");
		assert_eq!(LoginStage::Login.to_string(), "login");
		assert_eq!(LoginStage::Consent.to_string(), "authorize_consent");
	}
}
