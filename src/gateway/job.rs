//! Async job polling for long-running Cloud Controller operations.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	gateway::{Gateway, decode_json},
	http::HttpTransport,
	obs::{self, CallKind},
};

/// Path fragment identifying a job resource URL.
pub const JOB_PATH_MARKER: &str = "/jobs/";

/// Time source consulted by the poller; swap it out in tests.
pub trait Clock
where
	Self: 'static + Send + Sync,
{
	/// Current instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Job lifecycle reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
	/// Accepted, not started.
	Queued,
	/// In progress.
	Running,
	/// Completed successfully.
	Finished,
	/// Completed with an error.
	Failed,
	/// Any state this crate does not know; polling continues.
	#[default]
	#[serde(other)]
	Unknown,
}
impl JobState {
	/// Whether polling stops at this state.
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Finished | Self::Failed)
	}

	/// Lowercase label as sent by the server.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Queued => "queued",
			Self::Running => "running",
			Self::Finished => "finished",
			Self::Failed => "failed",
			Self::Unknown => "unknown",
		}
	}
}

/// `{entity: {status, error_details: {description}}}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobResource {
	/// Job entity.
	#[serde(default)]
	pub entity: JobEntity,
}

/// Body of a [`JobResource`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobEntity {
	/// Current state.
	#[serde(default)]
	pub status: JobState,
	/// Failure details, present once the job failed.
	#[serde(default)]
	pub error_details: JobErrorDetails,
}

/// Failure details of a job.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobErrorDetails {
	/// Human-readable failure description.
	#[serde(default)]
	pub description: String,
}

/// `{metadata: {url}}` returned by async-capable mutations.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AsyncResource {
	/// Resource metadata.
	#[serde(default)]
	pub metadata: AsyncMetadata,
}
impl AsyncResource {
	/// Job URL appended to the API `endpoint`, when the metadata points at a job.
	///
	/// The server answers with an endpoint-relative path, so an endpoint mounted under a path
	/// prefix keeps it. Absolute URLs are taken as they are.
	pub fn job_url(&self, endpoint: &str) -> Option<Url> {
		let url = self.metadata.url.as_deref()?;

		if !url.contains(JOB_PATH_MARKER) {
			return None;
		}
		if let Ok(absolute) = Url::parse(url) {
			return Some(absolute);
		}

		Url::parse(&format!("{}{url}", endpoint.trim_end_matches('/'))).ok()
	}
}

/// Metadata of an [`AsyncResource`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AsyncMetadata {
	/// Job (or resource) URL.
	#[serde(default)]
	pub url: Option<String>,
}

impl<T> Gateway<T>
where
	T: HttpTransport,
{
	/// Polls `job_url` until it finishes, fails, or `timeout` elapses.
	///
	/// A zero timeout waits forever. The elapsed time is checked before each poll, so a
	/// timeout never costs an extra request. Every poll carries the `Authorization` value the
	/// previous poll ended with, which keeps long jobs alive across token refreshes.
	pub async fn wait_for_job(
		&self,
		job_url: &str,
		access_token: &str,
		timeout: Duration,
	) -> Result<()> {
		obs::observe_call(CallKind::JobPoll, "wait_for_job", async move {
			let started = self.clock.now();
			let mut access_token = access_token.to_owned();

			loop {
				if timeout.is_positive() && self.clock.now() - started > timeout {
					return Err(Error::AsyncTimeout { job_url: job_url.to_owned() });
				}

				let mut request = self.build_request(Method::GET, job_url, &access_token, None)?;
				let response = self.perform_request(&mut request).await?;
				let JobResource { entity } = decode_json(&response)?;

				obs::job_polled(job_url, entity.status.as_str());

				match entity.status {
					JobState::Finished => return Ok(()),
					JobState::Failed =>
						return Err(Error::JobFailed {
							description: entity.error_details.description,
						}),
					JobState::Queued | JobState::Running | JobState::Unknown => {},
				}

				if let Some(latest) = request.access_token() {
					latest.clone_into(&mut access_token);
				}

				self.pause().await;
			}
		})
		.await
	}

	async fn pause(&self) {
		let throttle = self.config.polling_throttle_std();

		if !throttle.is_zero() {
			tokio::time::sleep(throttle).await;
		}
	}
}
