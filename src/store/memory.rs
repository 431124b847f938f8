//! Thread-safe in-memory [`CredentialStore`] for tests, demos, and embedding callers.

// self
use crate::{
	_prelude::*,
	store::{CredentialStore, Credentials, TokenSecret},
};

/// Credential store that keeps the session in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore(Arc<RwLock<Credentials>>);
impl MemoryCredentialStore {
	/// Creates a store seeded with the provided credentials.
	pub fn new(credentials: Credentials) -> Self {
		Self(Arc::new(RwLock::new(credentials)))
	}

	/// Applies an arbitrary mutation, e.g. to retarget endpoints.
	pub fn update(&self, f: impl FnOnce(&mut Credentials)) {
		f(&mut self.0.write());
	}

	/// Returns the stored refresh token.
	pub fn refresh_token(&self) -> String {
		self.0.read().refresh_token.expose().to_owned()
	}
}
impl CredentialStore for MemoryCredentialStore {
	fn credentials(&self) -> Credentials {
		self.0.read().clone()
	}

	fn save_tokens(&self, access_token: String, refresh_token: String) {
		let mut guard = self.0.write();

		guard.access_token = TokenSecret::new(access_token);
		guard.refresh_token = TokenSecret::new(refresh_token);
	}

	fn save_uaa_endpoint(&self, endpoint: String) {
		self.0.write().uaa_endpoint = endpoint;
	}
}
