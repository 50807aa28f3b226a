//! Access token extraction from implicit-flow redirect fragments.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Reads `access_token` from the URL fragment, decoding it as a query string.
///
/// Returns `None` when the URL has no fragment, the fragment lacks the parameter, or the value
/// is empty.
pub fn access_token_from_fragment(url: &Url) -> Option<TokenSecret> {
	let fragment = url.fragment()?;

	form_urlencoded::parse(fragment.as_bytes())
		.find(|(key, _)| key == "access_token")
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.is_empty())
		.map(TokenSecret::new)
}
