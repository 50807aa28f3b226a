//! Allocation units: one sandbox inside a pool, with its build and teardown jobs.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, Client},
	error::ParseError,
	poll,
	sandbox::{RequestKind, SandboxRequest, User},
};

const RESOURCE: &str = "sandbox allocation unit";

/// One sandbox slot in a pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxAllocationUnit {
	/// Identifier.
	pub id: i64,
	/// Pool owning the unit.
	pub pool_id: i64,
	/// Build job, absent until the platform schedules it.
	#[serde(default)]
	pub allocation_request: Option<SandboxRequest>,
	/// Teardown job, absent until cleanup is requested.
	#[serde(default)]
	pub cleanup_request: Option<SandboxRequest>,
	/// Account that allocated the unit.
	pub created_by: User,
	/// Whether a training instance holds the unit.
	#[serde(default)]
	pub locked: bool,
}

impl Client {
	/// Fetches an allocation unit; `404` yields [`Error::NotFound`].
	pub async fn get_sandbox_allocation_unit(&self, unit_id: i64) -> Result<SandboxAllocationUnit> {
		const OPERATION: &str = "get_sandbox_allocation_unit";

		let url = self.config.sandbox_url(&format!("sandbox-allocation-units/{unit_id}"))?;

		self.execute(OPERATION, &ApiRequest::get(url))
			.await?
			.not_found_as(RESOURCE, unit_id)?
			.expect_status(OPERATION, &[StatusCode::OK])?
			.json(OPERATION)
	}

	/// Allocates `count` units in a pool without waiting for their builds.
	pub async fn create_sandbox_allocation_units(
		&self,
		pool_id: i64,
		count: u32,
	) -> Result<Vec<SandboxAllocationUnit>> {
		const OPERATION: &str = "create_sandbox_allocation_units";

		let mut url =
			self.config.sandbox_url(&format!("pools/{pool_id}/sandbox-allocation-units"))?;

		url.query_pairs_mut().append_pair("count", &count.to_string());

		self.execute(OPERATION, &ApiRequest::post(url))
			.await?
			.expect_status(OPERATION, &[StatusCode::CREATED])?
			.json(OPERATION)
	}

	/// Allocates one unit and waits until its build job is terminal.
	///
	/// The returned unit carries the final build job, which may contain failed stages.
	pub async fn create_sandbox_allocation_unit_await(
		&self,
		pool_id: i64,
		cancel: &CancellationToken,
	) -> Result<SandboxAllocationUnit> {
		const OPERATION: &str = "create_sandbox_allocation_unit_await";

		let units = self.create_sandbox_allocation_units(pool_id, 1).await?;
		let [mut unit] = <[SandboxAllocationUnit; 1]>::try_from(units).map_err(|units| {
			ParseError::UnexpectedCount { operation: OPERATION, expected: 1, actual: units.len() }
		})?;
		let kind = RequestKind::Allocation;
		let request = self
			.poll_request_finished(unit.id, kind, kind.poll_interval(&self.config.timing), cancel)
			.await?;

		unit.allocation_request = Some(request);

		Ok(unit)
	}

	/// [`Client::create_sandbox_allocation_unit_await`] bounded by `timeout`.
	///
	/// On timeout the background poll is cancelled and [`Error::Timeout`] names the pool.
	pub async fn create_sandbox_allocation_unit_await_timeout(
		&self,
		pool_id: i64,
		timeout: StdDuration,
	) -> Result<SandboxAllocationUnit> {
		let client = self.clone();

		poll::await_with_timeout(
			"creating sandbox allocation unit",
			pool_id.to_string(),
			timeout,
			|cancel| async move { client.create_sandbox_allocation_unit_await(pool_id, &cancel).await },
		)
		.await
	}

	/// Requests teardown of a unit; `404` yields [`Error::NotFound`].
	pub async fn create_sandbox_cleanup_request(&self, unit_id: i64) -> Result<SandboxRequest> {
		const OPERATION: &str = "create_sandbox_cleanup_request";

		let url = self
			.config
			.sandbox_url(&format!("sandbox-allocation-units/{unit_id}/cleanup-request"))?;

		self.execute(OPERATION, &ApiRequest::post(url))
			.await?
			.not_found_as(RESOURCE, unit_id)?
			.expect_status(OPERATION, &[StatusCode::CREATED])?
			.json(OPERATION)
	}

	/// Tears a unit down and waits until the platform has removed it.
	///
	/// The cleanup job disappears together with the unit, so a `404` while polling counts as
	/// success.
	pub async fn delete_sandbox_allocation_unit(
		&self,
		unit_id: i64,
		cancel: &CancellationToken,
	) -> Result<()> {
		self.create_sandbox_cleanup_request(unit_id).await?;

		let kind = RequestKind::Cleanup;

		match self
			.poll_request_finished(unit_id, kind, kind.poll_interval(&self.config.timing), cancel)
			.await
		{
			Ok(_) => Ok(()),
			Err(e) if e.is_not_found() => Ok(()),
			Err(e) => Err(e),
		}
	}

	/// [`Client::delete_sandbox_allocation_unit`] bounded by `timeout`.
	pub async fn delete_sandbox_allocation_unit_with_timeout(
		&self,
		unit_id: i64,
		timeout: StdDuration,
	) -> Result<()> {
		let client = self.clone();

		poll::await_with_timeout(
			"deleting sandbox allocation unit",
			unit_id.to_string(),
			timeout,
			|cancel| async move { client.delete_sandbox_allocation_unit(unit_id, &cancel).await },
		)
		.await
	}
}
