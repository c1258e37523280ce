//! The typed error surface every workflow, repository, and port returns.
//!
//! Each variant corresponds to one of the kinds in the error-handling
//! design: a caller that only cares about the HTTP-ish status maps through
//! [`Error::status_hint`]; a caller that cares about the domain detail
//! matches on the variant.

use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Constructor/DTO validation failed (field constraints, formats).
	#[error("validation failed: {0}")]
	Validation(String),

	/// An entity transition was attempted from a state that forbids it.
	/// Carries the current state so the caller can render it.
	#[error("invalid state: {message} (current state: {current_state})")]
	InvalidState {
		message: String,
		current_state: String,
	},

	/// A repository lookup found nothing.
	#[error("{entity} not found: {id}")]
	NotFound { entity: &'static str, id: Uuid },

	/// A unique-constraint-shaped conflict (duplicate registration, room
	/// name collision, seat already taken, etc).
	#[error("duplicate: {0}")]
	DuplicateKey(String),

	/// No subject attached to the request.
	#[error("unauthenticated")]
	Unauthenticated,

	/// Subject is known but lacks the role, or is inactive, or doesn't own
	/// the resource it's trying to touch.
	#[error("forbidden: {0}")]
	Forbidden(String),

	/// Rate limiter rejected the request.
	#[error("rate limited, retry after {retry_after_secs}s")]
	RateLimited { retry_after_secs: u64 },

	/// Transient failure in a dependency (DB, object store) that a caller
	/// may retry.
	#[error("retryable I/O error: {0}")]
	RetryableIo(String),

	/// Programmer error or misconfiguration; not meant to be handled.
	#[error("internal error: {0}")]
	Fatal(String),
}

impl Error {
	/// The HTTP status an outer transport layer would use for this kind.
	/// The core never emits HTTP itself (out of scope); this exists so a
	/// thin transport adapter has something authoritative to map onto.
	pub fn status_hint(&self) -> u16 {
		match self {
			Error::Validation(_) => 422,
			Error::InvalidState { .. } => 400,
			Error::NotFound { .. } => 404,
			Error::DuplicateKey(_) => 409,
			Error::Unauthenticated => 401,
			Error::Forbidden(_) => 403,
			Error::RateLimited { .. } => 429,
			Error::RetryableIo(_) => 500,
			Error::Fatal(_) => 500,
		}
	}

	pub fn not_found(entity: &'static str, id: Uuid) -> Self {
		Error::NotFound { entity, id }
	}

	pub fn invalid_state(message: impl Into<String>, current_state: impl Into<String>) -> Self {
		Error::InvalidState {
			message: message.into(),
			current_state: current_state.into(),
		}
	}
}
