//! Authenticated HTTP gateway for Cloud Foundry style control APIs: transparent
//! re-authentication with safe body replay, async job polling, warning collection, and a typed
//! error taxonomy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod classify;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod request;
pub mod store;
pub mod warnings;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::{
		collections::VecDeque,
		io,
		sync::atomic::{AtomicUsize, Ordering},
	};
	// self
	pub use crate::store::MemoryCredentialStore;
	use crate::{
		auth::{RefreshFuture, TokenRefresher},
		classify::{CloudControllerClassifier, UaaClassifier},
		config::GatewayConfig,
		error::{AuthError, SslReason, TransportError},
		gateway::{Clock, Gateway},
		http::{HttpTransport, RawRequest, RawResponse, TransportFuture, TrustedCert},
		store::{CredentialStore, Credentials, TokenSecret},
	};

	/// One scripted transport outcome.
	#[derive(Clone, Debug)]
	pub enum Scripted {
		/// A received response.
		Respond(RawResponse),
		/// The connection was refused before any response.
		ConnectionRefused,
		/// The connect phase ran into the dial timeout.
		ConnectTimeout,
		/// The TLS handshake rejected the certificate.
		Tls(SslReason),
	}

	/// Transport replaying a script and recording every request it was handed.
	#[derive(Clone, Debug, Default)]
	pub struct FakeTransport {
		script: Arc<Mutex<VecDeque<Scripted>>>,
		sent: Arc<Mutex<Vec<RawRequest>>>,
		trusted: Arc<Mutex<Vec<TrustedCert>>>,
	}
	impl FakeTransport {
		/// Creates a transport answering with `script`, in order.
		pub fn new(script: Vec<Scripted>) -> Self {
			Self { script: Arc::new(Mutex::new(script.into())), ..Self::default() }
		}

		/// Appends an outcome to the script.
		pub fn push(&self, outcome: Scripted) {
			self.script.lock().push_back(outcome);
		}

		/// Requests sent so far.
		pub fn sent(&self) -> Vec<RawRequest> {
			self.sent.lock().clone()
		}

		/// Trusted roots installed through [`HttpTransport::set_trusted_certs`].
		pub fn trusted_certs(&self) -> Vec<TrustedCert> {
			self.trusted.lock().clone()
		}
	}
	impl HttpTransport for FakeTransport {
		fn send(&self, request: RawRequest) -> TransportFuture<'_> {
			self.sent.lock().push(request);

			let next = self.script.lock().pop_front();

			Box::pin(async move {
				match next {
					Some(Scripted::Respond(response)) => Ok(response),
					Some(Scripted::ConnectionRefused) => Err(TransportError::connect(io::Error::new(
						io::ErrorKind::ConnectionRefused,
						"connection refused",
					))),
					Some(Scripted::Tls(reason)) => Err(TransportError::Tls {
						reason,
						source: Box::new(io::Error::other("invalid peer certificate")),
					}),
					Some(Scripted::ConnectTimeout) => Err(TransportError::connect(io::Error::new(
						io::ErrorKind::TimedOut,
						"connect timed out",
					))),
					None => Err(TransportError::network(io::Error::other("script exhausted"))),
				}
			})
		}

		fn set_trusted_certs(&mut self, certs: Vec<TrustedCert>) -> Result<()> {
			*self.trusted.lock() = certs;

			Ok(())
		}
	}

	/// Refresher that counts calls and either stores a fixed token or fails.
	#[derive(Debug)]
	pub struct FakeRefresher {
		store: Arc<MemoryCredentialStore>,
		token: Option<String>,
		calls: AtomicUsize,
	}
	impl FakeRefresher {
		/// Refreshes successfully to `token`.
		pub fn succeeding(store: Arc<MemoryCredentialStore>, token: &str) -> Self {
			Self { store, token: Some(token.to_owned()), calls: AtomicUsize::new(0) }
		}

		/// Fails every refresh with an expired session.
		pub fn failing(store: Arc<MemoryCredentialStore>) -> Self {
			Self { store, token: None, calls: AtomicUsize::new(0) }
		}

		/// Number of refreshes performed.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenRefresher for FakeRefresher {
		fn refresh_auth_token(&self) -> RefreshFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				match &self.token {
					Some(token) => {
						self.store.save_tokens(token.clone(), "refreshed-refresh".into());

						Ok(token.clone())
					},
					None => Err(AuthError::SessionExpired.into()),
				}
			})
		}
	}

	/// Clock advancing by a fixed step on every read.
	#[derive(Debug)]
	pub struct StepClock {
		step: Duration,
		ticks: Mutex<i32>,
	}
	impl StepClock {
		/// Creates a clock whose first read is the epoch.
		pub fn new(step: Duration) -> Self {
			Self { step, ticks: Mutex::new(0) }
		}
	}
	impl Clock for StepClock {
		fn now(&self) -> OffsetDateTime {
			let mut ticks = self.ticks.lock();
			let now = OffsetDateTime::UNIX_EPOCH + self.step * *ticks;

			*ticks += 1;

			now
		}
	}

	/// Credentials pointing at `api.example.com` and `uaa.example.com`.
	pub fn fixture_store() -> Arc<MemoryCredentialStore> {
		Arc::new(MemoryCredentialStore::new(Credentials {
			access_token: TokenSecret::new("bearer old-access"),
			refresh_token: TokenSecret::new("old-refresh"),
			api_endpoint: "https://api.example.com".into(),
			auth_endpoint: "https://uaa.example.com".into(),
			uaa_endpoint: "https://uaa.example.com".into(),
			..Credentials::default()
		}))
	}

	/// Default configuration without a polling pause.
	pub fn test_config() -> GatewayConfig {
		GatewayConfig::default().with_polling_throttle(Duration::ZERO)
	}

	/// Cloud Controller gateway over a scripted transport.
	pub fn cc_gateway(
		script: Vec<Scripted>,
	) -> (Gateway<FakeTransport>, FakeTransport, Arc<MemoryCredentialStore>) {
		scripted_gateway(script, Arc::new(CloudControllerClassifier))
	}

	/// Identity-service gateway over a scripted transport.
	pub fn uaa_gateway(
		script: Vec<Scripted>,
	) -> (Gateway<FakeTransport>, FakeTransport, Arc<MemoryCredentialStore>) {
		scripted_gateway(script, Arc::new(UaaClassifier))
	}

	fn scripted_gateway(
		script: Vec<Scripted>,
		classifier: Arc<dyn crate::classify::ErrorClassifier>,
	) -> (Gateway<FakeTransport>, FakeTransport, Arc<MemoryCredentialStore>) {
		let store = fixture_store();
		let transport = FakeTransport::new(script);
		let shared: Arc<dyn CredentialStore> = store.clone();
		let gateway = Gateway::with_transport(transport.clone(), classifier, shared, test_config());

		(gateway, transport, store)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
