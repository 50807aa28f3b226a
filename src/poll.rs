//! Polling of long-running platform jobs and the deadline race around it.
//!
//! [`poll_until_finished`] fetches a job's status on a fixed cadence until it leaves the pending
//! set. [`await_with_timeout`] runs such a loop on its own task and races it against a timer;
//! when the timer wins, the worker's [`CancellationToken`] fires so the loop stops and drops its
//! in-flight request.

// crates.io
use tokio::time::{self, Instant, MissedTickBehavior};
// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind},
};

/// Status of a remote job observed by the poller.
pub trait JobStatus {
	/// Returns `true` while the job still has work queued or running.
	fn is_pending(&self) -> bool;
}

/// Fetches the job status every `interval` until it is no longer pending.
///
/// The first fetch happens one interval after the call. Fetches are strictly sequential; a slow
/// fetch delays the next tick instead of overlapping it. Errors from `fetch` (including
/// [`Error::NotFound`]) propagate immediately, and `cancel` is honoured both between ticks and
/// during a fetch, yielding [`Error::Cancelled`].
pub async fn poll_until_finished<T, F, Fut>(
	interval: StdDuration,
	cancel: &CancellationToken,
	mut fetch: F,
) -> Result<T>
where
	T: JobStatus,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut ticker = time::interval_at(Instant::now() + interval, interval);

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	let mut ticks = 0_u64;

	loop {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			_ = ticker.tick() => {},
		}

		ticks += 1;

		let status = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			status = fetch() => status?,
		};

		if !status.is_pending() {
			obs::stage_event(FlowKind::Poll, "finished", &ticks);

			return Ok(status);
		}

		obs::stage_event(FlowKind::Poll, "pending", &ticks);
	}
}

/// Runs `work` on a spawned task and waits at most `timeout` for its result.
///
/// `work` receives a token that is cancelled when the deadline fires or when the returned future
/// is dropped. Only one outcome reaches the caller: the worker's result or
/// [`Error::Timeout`] carrying `action`, `identifier`, and `timeout`.
pub async fn await_with_timeout<T, F, Fut>(
	action: &'static str,
	identifier: impl Into<String>,
	timeout: StdDuration,
	work: F,
) -> Result<T>
where
	T: 'static + Send,
	F: FnOnce(CancellationToken) -> Fut,
	Fut: 'static + Send + Future<Output = Result<T>>,
{
	let identifier = identifier.into();

	obs::observe(FlowKind::Await, action, async move {
		let cancel = CancellationToken::new();
		let _stop_worker = cancel.clone().drop_guard();
		let mut worker = tokio::spawn(work(cancel.child_token()));

		tokio::select! {
			biased;
			joined = &mut worker => joined.map_err(|source| Error::Worker { action, source })?,
			_ = time::sleep(timeout) => {
				obs::stage_event(FlowKind::Await, action, &identifier);

				Err(Error::Timeout { action, identifier, duration: timeout })
			},
		}
	})
	.await
}
