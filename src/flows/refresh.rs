//! Token freshness scheduler with a single-flight guard.
//!
//! [`Client::ensure_fresh_token`] runs before every authenticated request. Sessions with a known
//! expiry are renewed through the password grant once they enter the refresh margin; concurrent
//! callers queue on one guard so a burst of requests causes at most one token exchange.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Session, SessionStatus, TokenSecret},
	client::Client,
	config::Credentials,
	obs::{self, FlowKind},
};

impl Client {
	/// Returns a token that stays valid beyond the refresh margin, renewing it when needed.
	///
	/// Tokens without an expiry (static or interactive) are returned unchanged. An empty session
	/// is filled first: a static token is adopted, username/password credentials log in.
	pub async fn ensure_fresh_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.fresh_token() {
			return Ok(token);
		}

		obs::observe(FlowKind::Refresh, "ensure_fresh_token", async move {
			let _singleflight = self.refresh_guard.lock().await;

			// Another caller may have renewed the session while this one waited.
			if let Some(token) = self.fresh_token() {
				self.refresh_metrics.record_success();

				return Ok(token);
			}

			self.renew_session().await
		})
		.await
	}

	/// Logs in again after the API rejected `rejected`, unless a concurrent caller already
	/// replaced it.
	pub(crate) async fn reauthenticate_after_rejection(
		&self,
		rejected: &TokenSecret,
	) -> Result<TokenSecret> {
		obs::observe(FlowKind::Refresh, "reauthenticate_after_rejection", async move {
			let _singleflight = self.refresh_guard.lock().await;

			{
				let session = self.session.read();

				if session.token != *rejected {
					return Ok(session.token.clone());
				}
			}

			self.renew_session().await
		})
		.await
	}

	// Caller must hold the single-flight guard.
	async fn renew_session(&self) -> Result<TokenSecret> {
		self.refresh_metrics.record_attempt();

		let renewed = match &self.config.credentials {
			Credentials::Token(token) => Ok(Session::new(token.clone())),
			Credentials::Password { .. } => self.login().await,
		};

		match renewed {
			Ok(session) => {
				let token = session.token.clone();

				self.set_session(session);
				self.refresh_metrics.record_success();

				Ok(token)
			},
			Err(e) => {
				self.refresh_metrics.record_failure();

				Err(e)
			},
		}
	}

	fn fresh_token(&self) -> Option<TokenSecret> {
		let session = self.session.read();

		match session.status_at(OffsetDateTime::now_utc(), self.config.timing.refresh_margin) {
			SessionStatus::Fresh | SessionStatus::Unbounded => Some(session.token.clone()),
			SessionStatus::Unauthenticated | SessionStatus::Expiring => None,
		}
	}
}
