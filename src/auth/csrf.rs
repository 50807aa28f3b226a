//! CSRF token scraping for the issuer's login and consent pages.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::{_prelude::*, error::ParseError};

static CSRF_INPUT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<input type="hidden" name="_csrf" value="([^"]+)" */?>"#)
		.expect("CSRF input pattern must compile.")
});

/// Extracts the value of the page's single hidden `_csrf` input.
///
/// Pages with no candidate and pages with several candidates are both rejected, so a changed
/// login page fails loudly instead of submitting the wrong token.
pub fn extract_csrf(body: &str) -> Result<String, ParseError> {
	let mut values = CSRF_INPUT
		.captures_iter(body)
		.filter_map(|captures| captures.get(1).map(|value| value.as_str().to_owned()));

	match (values.next(), values.next()) {
		(Some(value), None) => Ok(value),
		(None, _) => Err(ParseError::Csrf { matches: 0 }),
		(Some(_), Some(_)) => Err(ParseError::Csrf { matches: 2 + values.count() }),
	}
}
