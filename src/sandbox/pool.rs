//! Sandbox pools: capacity reserved for one sandbox definition.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, Client},
	sandbox::{SandboxDefinition, User},
};

const RESOURCE: &str = "sandbox pool";

/// Pool of sandboxes built from one definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxPool {
	/// Identifier.
	pub id: i64,
	/// Number of allocated sandboxes.
	pub size: i64,
	/// Upper bound on allocated sandboxes.
	pub max_size: i64,
	/// Lock held on the pool, `0` when unlocked.
	#[serde(default)]
	pub lock_id: i64,
	/// Definition revision the pool was built from.
	pub rev: String,
	/// Commit hash of that revision.
	pub rev_sha: String,
	/// Account that created the pool.
	pub created_by: User,
	/// Cloud resources consumed by the pool.
	pub hardware_usage: HardwareUsage,
	/// Definition the pool serves.
	pub definition: SandboxDefinition,
}

/// Cloud quota consumption, reported by the platform as formatted strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareUsage {
	/// Virtual CPUs.
	pub vcpu: String,
	/// Memory.
	pub ram: String,
	/// Instances.
	pub instances: String,
	/// Networks.
	pub network: String,
	/// Subnets.
	pub subnet: String,
	/// Ports.
	pub port: String,
}

#[derive(Debug, Serialize)]
struct SandboxPoolRequest {
	definition_id: i64,
	max_size: i64,
}

impl Client {
	/// Fetches a pool; `404` yields [`Error::NotFound`].
	pub async fn get_sandbox_pool(&self, pool_id: i64) -> Result<SandboxPool> {
		const OPERATION: &str = "get_sandbox_pool";

		let url = self.config.sandbox_url(&format!("pools/{pool_id}"))?;

		self.execute(OPERATION, &ApiRequest::get(url))
			.await?
			.not_found_as(RESOURCE, pool_id)?
			.expect_status(OPERATION, &[StatusCode::OK])?
			.json(OPERATION)
	}

	/// Creates a pool for `definition_id` holding at most `max_size` sandboxes.
	pub async fn create_sandbox_pool(&self, definition_id: i64, max_size: i64) -> Result<SandboxPool> {
		const OPERATION: &str = "create_sandbox_pool";

		let request = ApiRequest::post(self.config.sandbox_url("pools")?)
			.with_json(OPERATION, &SandboxPoolRequest { definition_id, max_size })?;

		self.execute(OPERATION, &request)
			.await?
			.expect_status(OPERATION, &[StatusCode::CREATED])?
			.json(OPERATION)
	}

	/// Deletes a pool; deleting a missing pool succeeds.
	pub async fn delete_sandbox_pool(&self, pool_id: i64) -> Result<()> {
		const OPERATION: &str = "delete_sandbox_pool";

		let url = self.config.sandbox_url(&format!("pools/{pool_id}"))?;

		self.execute(OPERATION, &ApiRequest::delete(url))
			.await?
			.expect_status(OPERATION, &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND])?;

		Ok(())
	}

	/// Requests cleanup of every allocation unit in the pool.
	///
	/// The platform only accepts the request (`202`); completion is not awaited.
	pub async fn cleanup_sandbox_pool(&self, pool_id: i64, force: bool) -> Result<()> {
		const OPERATION: &str = "cleanup_sandbox_pool";

		let mut url = self.config.sandbox_url(&format!("pools/{pool_id}/cleanup-requests"))?;

		url.query_pairs_mut().append_pair("force", if force { "true" } else { "false" });

		self.execute(OPERATION, &ApiRequest::post(url))
			.await?
			.expect_status(OPERATION, &[StatusCode::ACCEPTED])?;

		Ok(())
	}
}
