//! Login flows and the token freshness scheduler, implemented on [`Client`].
//!
//! [`Client::login`] prefers the Keycloak password grant and falls back to the browser-style
//! issuer login when the deployment has no token endpoint.

pub mod interactive;
pub mod password;
pub mod refresh;

pub use interactive::*;
pub use password::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::Session,
	client::Client,
	obs::{self, FlowKind},
};

impl Client {
	/// Obtains a new session without installing it.
	///
	/// The password grant runs first; a missing token endpoint switches to
	/// [`Client::interactive_login`], whose token carries no expiry.
	pub async fn login(&self) -> Result<Session> {
		match self.exchange_password_grant().await {
			Err(Error::NotFound { resource: TOKEN_ENDPOINT, identifier }) => {
				obs::stage_event(FlowKind::InteractiveLogin, "fallback", &identifier);

				Ok(Session::new(self.interactive_login().await?))
			},
			result => result,
		}
	}

	/// Logs in and installs the new session.
	///
	/// Holds the single-flight guard, so concurrent refreshes wait for this login.
	pub async fn authenticate(&self) -> Result<()> {
		let _singleflight = self.refresh_guard.lock().await;
		let session = self.login().await?;

		self.set_session(session);

		Ok(())
	}
}
