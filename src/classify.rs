//! Backend-specific reduction of error responses into the gateway taxonomy.
//!
//! The Cloud Controller and the identity service describe failures with different JSON
//! shapes. Each backend gets its own [`ErrorClassifier`], chosen when the gateway is
//! constructed, so the gateway itself never inspects error bodies.

// self
use crate::{_prelude::*, error::HttpError};

/// Cloud Controller error code for a rejected access token.
pub const CC_INVALID_TOKEN_CODE: i64 = 1000;
/// Identity-service error for a rejected access token.
pub const UAA_INVALID_TOKEN: &str = "invalid_token";

const BODY_PREVIEW_LIMIT: usize = 256;

/// Strategy turning a non-2xx response into a classified [`Error`].
pub trait ErrorClassifier
where
	Self: 'static + Send + Sync,
{
	/// Classifies a response with the provided status and raw body.
	fn classify(&self, status: u16, body: &[u8]) -> Error;
}

/// Classifier for Cloud Controller `{code, description}` bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloudControllerClassifier;
impl ErrorClassifier for CloudControllerClassifier {
	fn classify(&self, status: u16, body: &[u8]) -> Error {
		#[derive(Deserialize)]
		struct CcErrorBody {
			code: Option<i64>,
			description: Option<String>,
		}

		match serde_json::from_slice::<CcErrorBody>(body) {
			Ok(CcErrorBody { code: Some(CC_INVALID_TOKEN_CODE), description }) =>
				Error::InvalidToken { description: description.unwrap_or_default() },
			Ok(CcErrorBody { code, description }) => HttpError::new(
				status,
				code.map(|code| code.to_string()).unwrap_or_default(),
				description.unwrap_or_else(|| body_preview(body)),
			)
			.into(),
			Err(_) => unknown(status, body),
		}
	}
}

/// Classifier for identity-service `{error, error_description}` bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct UaaClassifier;
impl ErrorClassifier for UaaClassifier {
	fn classify(&self, status: u16, body: &[u8]) -> Error {
		#[derive(Deserialize)]
		struct UaaErrorBody {
			error: Option<String>,
			error_description: Option<String>,
		}

		match serde_json::from_slice::<UaaErrorBody>(body) {
			Ok(UaaErrorBody { error: Some(error), error_description })
				if error == UAA_INVALID_TOKEN =>
				Error::InvalidToken { description: error_description.unwrap_or_default() },
			Ok(UaaErrorBody { error, error_description }) => HttpError::new(
				status,
				error.unwrap_or_default(),
				error_description.unwrap_or_else(|| body_preview(body)),
			)
			.into(),
			Err(_) => unknown(status, body),
		}
	}
}

fn unknown(status: u16, body: &[u8]) -> Error {
	HttpError::new(status, "", body_preview(body)).into()
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.chars().count() <= BODY_PREVIEW_LIMIT {
		return trimmed.to_owned();
	}

	trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
}
