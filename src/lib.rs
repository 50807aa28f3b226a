//! Async client for the KYPO cyber range: browser-style OIDC login, Keycloak password grants with
//! single-flight refresh, and cancellable polling of sandbox provisioning jobs.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod poll;
pub mod sandbox;
pub mod training;

pub use client::Client;

#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		Client,
		auth::TokenSecret,
		config::{ClientConfig, Credentials, Timing},
		http::ReqwestHttpClient,
	};

	/// Client identifier used by mocked identity providers.
	pub const TEST_CLIENT_ID: &str = "kypo-test-client";
	/// Username submitted by password-based test configurations.
	pub const TEST_USERNAME: &str = "kypo-admin";
	/// Password submitted by password-based test configurations.
	pub const TEST_PASSWORD: &str = "kypo-password";

	/// Parses a mock server base URL.
	pub fn test_endpoint(base: &str) -> Url {
		Url::parse(base).expect("Mock server base URL should parse.")
	}

	/// Builds a password-based configuration pointed at a mock server with short poll intervals.
	pub fn password_test_config(base: &str) -> ClientConfig {
		ClientConfig::builder(test_endpoint(base))
			.client_id(TEST_CLIENT_ID)
			.credentials(Credentials::password(TEST_USERNAME, TEST_PASSWORD))
			.timing(fast_timing())
			.build()
			.expect("Password test configuration should build.")
	}

	/// Builds a static-token configuration pointed at a mock server with short poll intervals.
	pub fn token_test_config(base: &str, token: &str) -> ClientConfig {
		ClientConfig::builder(test_endpoint(base))
			.client_id(TEST_CLIENT_ID)
			.credentials(Credentials::Token(TokenSecret::new(token)))
			.timing(fast_timing())
			.build()
			.expect("Token test configuration should build.")
	}

	/// Builds a client for `config` without logging in.
	pub fn test_client(config: ClientConfig) -> Client {
		let http = ReqwestHttpClient::new(&config.http).expect("Test HTTP client should build.");

		Client::unauthenticated(config, http)
	}

	/// Renders a login page carrying one CSRF field.
	pub fn csrf_page(csrf: &str) -> String {
		format!(
			r#"<html><body><form method="post"><input type="hidden" name="_csrf" value="{csrf}"/></form></body></html>"#
		)
	}

	/// Poll intervals short enough for integration tests against a local mock server.
	pub fn fast_timing() -> Timing {
		Timing {
			allocation_poll_interval: StdDuration::from_millis(20),
			cleanup_poll_interval: StdDuration::from_millis(20),
			..Timing::default()
		}
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
