//! Gateway tuning knobs with environment overrides.

// self
use crate::_prelude::*;

/// Environment variable overriding the connect timeout, in whole seconds.
pub const DIAL_TIMEOUT_ENV: &str = "CF_DIAL_TIMEOUT";
/// Environment variable enabling strict warning mode (`true` or `1`).
pub const FAIL_ON_WARNINGS_ENV: &str = "CF_FAIL_ON_WARNINGS";

/// Runtime configuration for a [`Gateway`](crate::gateway::Gateway).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	/// Whether async-capable mutations wait for their job to finish.
	pub polling_enabled: bool,
	/// Pause between two job status polls.
	pub polling_throttle: Duration,
	/// Upper bound for establishing a TCP/TLS connection.
	pub dial_timeout: Duration,
	/// Total attempts for requests that never reached the server.
	pub max_connect_attempts: u32,
	/// Turn any server warning into a fatal error on flush.
	pub fail_on_warnings: bool,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl GatewayConfig {
	/// Default pause between job polls.
	pub const DEFAULT_POLLING_THROTTLE: Duration = Duration::seconds(5);
	/// Default connect timeout.
	pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::seconds(5);
	/// Default number of connect attempts.
	pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;

	/// Builds a configuration from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds a configuration from an arbitrary variable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let mut config = Self::default();

		if let Some(secs) = lookup(DIAL_TIMEOUT_ENV).and_then(|raw| raw.trim().parse::<i64>().ok())
		{
			config.dial_timeout = Duration::seconds(secs);
		}
		if let Some(raw) = lookup(FAIL_ON_WARNINGS_ENV) {
			config.fail_on_warnings = matches!(raw.trim(), "1" | "true" | "TRUE" | "True");
		}

		config
	}

	/// Overrides the job polling throttle.
	pub fn with_polling_throttle(mut self, throttle: Duration) -> Self {
		self.polling_throttle = if throttle.is_negative() { Duration::ZERO } else { throttle };

		self
	}

	/// Enables or disables async job polling.
	pub fn with_polling(mut self, enabled: bool) -> Self {
		self.polling_enabled = enabled;

		self
	}

	/// Overrides the connect timeout.
	pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
		self.dial_timeout = timeout;

		self
	}

	/// Overrides the number of connect attempts (at least one).
	pub fn with_max_connect_attempts(mut self, attempts: u32) -> Self {
		self.max_connect_attempts = attempts.max(1);

		self
	}

	/// Enables or disables strict warning mode.
	pub fn with_fail_on_warnings(mut self, strict: bool) -> Self {
		self.fail_on_warnings = strict;

		self
	}

	pub(crate) fn polling_throttle_std(&self) -> StdDuration {
		StdDuration::try_from(self.polling_throttle).unwrap_or_default()
	}

	pub(crate) fn dial_timeout_std(&self) -> StdDuration {
		StdDuration::try_from(self.dial_timeout).unwrap_or(StdDuration::from_secs(5))
	}
}
impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			polling_enabled: true,
			polling_throttle: Self::DEFAULT_POLLING_THROTTLE,
			dial_timeout: Self::DEFAULT_DIAL_TIMEOUT,
			max_connect_attempts: Self::DEFAULT_CONNECT_ATTEMPTS,
			fail_on_warnings: false,
			user_agent: default_user_agent(),
		}
	}
}

/// `cf-gateway <version> / <os>`.
pub fn default_user_agent() -> String {
	format!("{} {} / {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), std::env::consts::OS)
}
