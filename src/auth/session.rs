//! In-memory bearer session owned by a [`Client`](crate::Client).

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Freshness of a session relative to the refresh margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
	/// No token has been issued yet.
	Unauthenticated,
	/// Token carries no expiry (static token or interactive login); it is used until rejected.
	Unbounded,
	/// Token remains valid beyond the refresh margin.
	Fresh,
	/// Token expires within the refresh margin and must be renewed before use.
	Expiring,
}

/// Current bearer token plus the expiry reported by the token endpoint.
///
/// `expires_at` is only known when the token came from the password grant; tokens obtained
/// through the interactive login or supplied statically carry `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
	/// Bearer token presented on authenticated requests.
	pub token: TokenSecret,
	/// Expiry instant, when known.
	pub expires_at: Option<OffsetDateTime>,
}
impl Session {
	/// Creates a session without expiry information.
	pub fn new(token: TokenSecret) -> Self {
		Self { token, expires_at: None }
	}

	/// Creates a session expiring `expires_in` after `issued_at`.
	pub fn issued(token: TokenSecret, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self { token, expires_at: Some(issued_at + expires_in) }
	}

	/// Sets an absolute expiry instant.
	pub fn with_expiry(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Computes the session status at `now` with the provided safety margin.
	pub fn status_at(&self, now: OffsetDateTime, margin: Duration) -> SessionStatus {
		if self.token.is_empty() {
			return SessionStatus::Unauthenticated;
		}

		match self.expires_at {
			None => SessionStatus::Unbounded,
			Some(expires_at) if now + margin >= expires_at => SessionStatus::Expiring,
			Some(_) => SessionStatus::Fresh,
		}
	}

	/// Returns `true` when the token must be renewed before the next request.
	pub fn needs_refresh_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		matches!(self.status_at(now, margin), SessionStatus::Expiring)
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
