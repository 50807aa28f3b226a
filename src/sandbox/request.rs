//! Allocation and cleanup jobs attached to an allocation unit.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, Client},
	config::Timing,
	poll::{self, JobStatus},
};

/// Progress of one stage of a provisioning job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StageStatus {
	/// Waiting for a worker.
	InQueue,
	/// Being executed.
	Running,
	/// Completed successfully.
	Finished,
	/// Completed with an error.
	Failed,
	/// Label this client does not know; treated as terminal.
	Other(String),
}
impl StageStatus {
	/// Returns `true` for [`StageStatus::InQueue`] and [`StageStatus::Running`].
	pub fn is_pending(&self) -> bool {
		matches!(self, Self::InQueue | Self::Running)
	}

	/// Wire label of the status.
	pub fn as_str(&self) -> &str {
		match self {
			Self::InQueue => "IN_QUEUE",
			Self::Running => "RUNNING",
			Self::Finished => "FINISHED",
			Self::Failed => "FAILED",
			Self::Other(label) => label,
		}
	}
}
impl From<String> for StageStatus {
	fn from(label: String) -> Self {
		match label.as_str() {
			"IN_QUEUE" => Self::InQueue,
			"RUNNING" => Self::Running,
			"FINISHED" => Self::Finished,
			"FAILED" => Self::Failed,
			_ => Self::Other(label),
		}
	}
}
impl From<StageStatus> for String {
	fn from(status: StageStatus) -> Self {
		match status {
			StageStatus::Other(label) => label,
			known => known.as_str().to_owned(),
		}
	}
}
impl Display for StageStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Server-side job tracked through its ordered stage list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxRequest {
	/// Job identifier.
	pub id: i64,
	/// Allocation unit the job belongs to.
	pub allocation_unit_id: i64,
	/// Creation timestamp, as reported by the platform.
	#[serde(default)]
	pub created: String,
	/// Stage statuses in execution order.
	#[serde(default)]
	pub stages: Vec<StageStatus>,
}
impl SandboxRequest {
	/// Returns `true` when any stage failed.
	pub fn has_failed(&self) -> bool {
		self.stages.contains(&StageStatus::Failed)
	}
}
impl JobStatus for SandboxRequest {
	/// Pending while a stage is queued or running, and while no stage has been reported yet.
	fn is_pending(&self) -> bool {
		self.stages.is_empty() || self.stages.iter().any(StageStatus::is_pending)
	}
}

/// Kind of job attached to an allocation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Sandbox build.
	Allocation,
	/// Sandbox teardown.
	Cleanup,
}
impl RequestKind {
	/// Label used in the job's URL.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Allocation => "allocation",
			RequestKind::Cleanup => "cleanup",
		}
	}

	/// Configured poll cadence for this kind of job.
	pub fn poll_interval(self, timing: &Timing) -> StdDuration {
		match self {
			RequestKind::Allocation => timing.allocation_poll_interval,
			RequestKind::Cleanup => timing.cleanup_poll_interval,
		}
	}

	fn path(self, unit_id: i64) -> String {
		format!("sandbox-allocation-units/{unit_id}/{}-request", self.as_str())
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

impl Client {
	/// Fetches the current state of a unit's job; `404` yields [`Error::NotFound`].
	pub async fn get_sandbox_request(&self, unit_id: i64, kind: RequestKind) -> Result<SandboxRequest> {
		const OPERATION: &str = "get_sandbox_request";

		let url = self.config.sandbox_url(&kind.path(unit_id))?;

		self.execute(OPERATION, &ApiRequest::get(url))
			.await?
			.not_found_as("sandbox request", unit_id)?
			.expect_status(OPERATION, &[StatusCode::OK])?
			.json(OPERATION)
	}

	/// Polls a unit's job every `interval` until no stage is queued or running.
	///
	/// A `404` ends the loop with [`Error::NotFound`]; after cleanup this means the unit is gone.
	pub async fn poll_request_finished(
		&self,
		unit_id: i64,
		kind: RequestKind,
		interval: StdDuration,
		cancel: &CancellationToken,
	) -> Result<SandboxRequest> {
		poll::poll_until_finished(interval, cancel, || self.get_sandbox_request(unit_id, kind)).await
	}
}
