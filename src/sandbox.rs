//! Sandbox service resources: definitions, pools, allocation units, and their provisioning jobs.

pub mod allocation_unit;
pub mod definition;
pub mod pool;
pub mod request;

pub use allocation_unit::*;
pub use definition::*;
pub use pool::*;
pub use request::*;

// self
use crate::_prelude::*;

/// Platform account that created a resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Numeric account identifier.
	pub id: i64,
	/// OIDC subject.
	pub sub: String,
	/// Display name.
	pub full_name: String,
	/// Given name.
	pub given_name: String,
	/// Family name.
	pub family_name: String,
	/// Contact e-mail.
	pub mail: String,
}
