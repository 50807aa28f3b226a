//! Sandbox definitions: Git repositories describing a sandbox topology.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, Client},
	sandbox::User,
};

const RESOURCE: &str = "sandbox definition";

/// Sandbox definition registered with the sandbox service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxDefinition {
	/// Identifier.
	pub id: i64,
	/// Git URL of the definition repository.
	pub url: String,
	/// Definition name.
	pub name: String,
	/// Git revision.
	pub rev: String,
	/// Account that registered the definition.
	pub created_by: User,
}

#[derive(Debug, Serialize)]
struct SandboxDefinitionRequest<'a> {
	url: &'a str,
	rev: &'a str,
}

impl Client {
	/// Fetches a sandbox definition; `404` yields [`Error::NotFound`].
	pub async fn get_sandbox_definition(&self, definition_id: i64) -> Result<SandboxDefinition> {
		const OPERATION: &str = "get_sandbox_definition";

		let url = self.config.sandbox_url(&format!("definitions/{definition_id}"))?;

		self.execute(OPERATION, &ApiRequest::get(url))
			.await?
			.not_found_as(RESOURCE, definition_id)?
			.expect_status(OPERATION, &[StatusCode::OK])?
			.json(OPERATION)
	}

	/// Registers a definition from a Git URL and revision.
	pub async fn create_sandbox_definition(&self, url: &str, rev: &str) -> Result<SandboxDefinition> {
		const OPERATION: &str = "create_sandbox_definition";

		let request = ApiRequest::post(self.config.sandbox_url("definitions")?)
			.with_json(OPERATION, &SandboxDefinitionRequest { url, rev })?;

		self.execute(OPERATION, &request)
			.await?
			.expect_status(OPERATION, &[StatusCode::CREATED])?
			.json(OPERATION)
	}

	/// Deletes a definition; deleting a missing definition succeeds.
	pub async fn delete_sandbox_definition(&self, definition_id: i64) -> Result<()> {
		const OPERATION: &str = "delete_sandbox_definition";

		let url = self.config.sandbox_url(&format!("definitions/{definition_id}"))?;

		self.execute(OPERATION, &ApiRequest::delete(url))
			.await?
			.expect_status(OPERATION, &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND])?;

		Ok(())
	}
}
